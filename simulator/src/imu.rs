//! Scripted accelerometer.
//!
//! Replays a tilt profile over simulated time: the panel sits level, is
//! tipped over to the left (upside down), wobbles once near the threshold
//! and is turned back. Every 25th read fails, like a flaky I2C bus.

use homewind_ui::{Accelerometer, Error};

use crate::timing::SimClock;

/// X-axis reading (g) from the given simulated time onward.
const TILT_PROFILE: &[(u64, f32)] = &[
    (0, 0.05),
    (12_000, -1.6),
    // Single wobble back across the threshold band
    (14_000, -0.9),
    (14_250, -1.5),
    (40_000, 1.5),
    (44_000, 0.1),
];

const FAILURE_PERIOD: u32 = 25;

pub struct SimulatedImu {
    clock: SimClock,
    present: bool,
    reads: u32,
}

impl SimulatedImu {
    pub const fn new(clock: SimClock, present: bool) -> Self {
        Self {
            clock,
            present,
            reads: 0,
        }
    }
}

/// Reading at simulated time `t_ms`.
fn tilt_at(t_ms: u64) -> f32 {
    TILT_PROFILE
        .iter()
        .take_while(|(from, _)| *from <= t_ms)
        .last()
        .map_or(0.0, |(_, x)| *x)
}

impl Accelerometer for SimulatedImu {
    fn probe(&mut self) -> Result<(), Error> {
        if self.present { Ok(()) } else { Err(Error::ImuNotDetected) }
    }

    fn read_x(&mut self) -> Result<f32, Error> {
        self.reads += 1;
        if self.reads % FAILURE_PERIOD == 0 {
            return Err(Error::Accelerometer);
        }
        Ok(tilt_at(self.clock.now_ms()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup() {
        assert_eq!(tilt_at(0), 0.05);
        assert_eq!(tilt_at(11_999), 0.05);
        assert_eq!(tilt_at(12_000), -1.6);
        assert_eq!(tilt_at(14_100), -0.9);
        assert_eq!(tilt_at(100_000), 0.1);
    }

    #[test]
    fn test_absent_imu_fails_probe() {
        let mut imu = SimulatedImu::new(SimClock::new(1), false);
        assert_eq!(imu.probe(), Err(Error::ImuNotDetected));
    }

    #[test]
    fn test_periodic_read_failure() {
        let mut imu = SimulatedImu::new(SimClock::new(1), true);
        let failures = (0..50).filter(|_| imu.read_x().is_err()).count();
        assert_eq!(failures, 2);
    }
}

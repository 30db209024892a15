//! Timing for the simulator.
//!
//! Wall time comes from the `embassy-time` std driver. The library itself
//! never reads a clock, so these live here rather than in its `config`
//! module.

use embassy_time::{Duration, Instant, Timer};

/// Interval between tick pumps (~50 Hz).
pub const FRAME_TIME: Duration = Duration::from_millis(20);

/// Longest the orientation task waits for the UI lock.
pub const IMU_LOCK_WAIT_MS: u32 = 50;

/// Delay between the fan controller receiving a request and confirming it.
pub const FAN_CONTROLLER_LATENCY_MS: u64 = 400;

/// Pumps between two statistics lines in the log.
pub const PUMP_REPORT_INTERVAL: u64 = 500;

/// Simulated monotonic clock.
///
/// Simulated time runs `speed` times faster than wall time, so the 20 s
/// powersave timeout can be watched without waiting for it.
#[derive(Clone, Copy, Debug)]
pub struct SimClock {
    start: Instant,
    speed: u32,
}

impl SimClock {
    pub fn new(speed: u32) -> Self {
        Self {
            start: Instant::now(),
            speed: speed.max(1),
        }
    }

    /// Milliseconds of simulated time since start.
    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() * u64::from(self.speed)
    }

    /// Sleep for `ms` of simulated time.
    pub async fn sleep_ms(&self, ms: u64) {
        Timer::after_millis(ms / u64::from(self.speed)).await;
    }

    /// Sleep until simulated time reaches `at_ms`.
    pub async fn sleep_until(&self, at_ms: u64) {
        let now = self.now_ms();
        if at_ms > now {
            self.sleep_ms(at_ms - now).await;
        }
    }
}

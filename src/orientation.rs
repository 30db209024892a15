//! Automatic 0/180 degree rotation from an accelerometer.
//!
//! The device can be mounted either way up. The X axis of the
//! accelerometer tells which way gravity points, and the UI flips when the
//! reading crosses a threshold.
//!
//! # Hysteresis
//!
//! The two directions use different thresholds, each widened by
//! [`IMU_HYSTERESIS`]:
//!
//! - at 0 degrees, flip to 180 only when `x < left - 0.3`
//! - at 180 degrees, flip back only when `x > right + 0.3`
//!
//! # Debounce
//!
//! A candidate rotation must be seen on [`IMU_STABLE_COUNT`] consecutive
//! samples. A sample agreeing with the current rotation resets the count.
//!
//! # Commit
//!
//! [`Orientation::observe`] only proposes a rotation. The caller applies it
//! to the display and then calls [`Orientation::commit`]. If applying fails
//! (for example the UI lock was busy) the candidate stays pending and is
//! proposed again on the next sample.

use log::{debug, info, warn};

use crate::config::{IMU_HYSTERESIS, IMU_STABLE_COUNT, TILT_LEFT_THRESHOLD, TILT_RIGHT_THRESHOLD};
use crate::error::Error;

/// Display rotation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg180,
}

impl Rotation {
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg180 => 180,
        }
    }
}

/// Accelerometer used for orientation sensing.
pub trait Accelerometer {
    /// Check that the sensor is present and configure it.
    fn probe(&mut self) -> Result<(), Error>;

    /// X-axis acceleration in the sensor's native units.
    fn read_x(&mut self) -> Result<f32, Error>;
}

/// Tilt thresholds for the two flip directions.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TiltThresholds {
    /// Reading above which a 180 degree display returns to 0 (plus hysteresis).
    pub right: f32,
    /// Reading below which a 0 degree display flips to 180 (minus hysteresis).
    pub left: f32,
}

impl Default for TiltThresholds {
    fn default() -> Self {
        Self {
            right: TILT_RIGHT_THRESHOLD,
            left: TILT_LEFT_THRESHOLD,
        }
    }
}

/// Hysteresis and debounce state for automatic rotation.
#[derive(Clone, Debug, Default)]
pub struct Orientation {
    current: Rotation,
    pending: Rotation,
    stable_count: u8,
    thresholds: TiltThresholds,
}

impl Orientation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe the accelerometer. Returns `false` when auto-rotation is unavailable.
    pub fn start<A: Accelerometer>(&mut self, accel: &mut A) -> bool {
        match accel.probe() {
            Ok(()) => {
                info!("IMU detected, auto-rotation enabled");
                true
            }
            Err(e) => {
                warn!("Auto-rotation disabled: {e}");
                false
            }
        }
    }

    /// Rotation currently applied to the display.
    #[inline]
    pub const fn current(&self) -> Rotation {
        self.current
    }

    /// Consecutive samples agreeing with the pending candidate.
    #[inline]
    pub const fn stable_count(&self) -> u8 {
        self.stable_count
    }

    #[inline]
    pub const fn thresholds(&self) -> TiltThresholds {
        self.thresholds
    }

    /// Replace the tilt thresholds. Non-finite values are rejected.
    pub fn set_thresholds(&mut self, right: f32, left: f32) -> bool {
        if !right.is_finite() || !left.is_finite() {
            warn!("Ignoring non-finite tilt thresholds");
            return false;
        }
        self.thresholds = TiltThresholds { right, left };
        true
    }

    /// Feed one X-axis reading. Returns a rotation ready to apply.
    pub fn observe(&mut self, x: f32) -> Option<Rotation> {
        let target = match self.current {
            Rotation::Deg0 if x < self.thresholds.left - IMU_HYSTERESIS => Rotation::Deg180,
            Rotation::Deg180 if x > self.thresholds.right + IMU_HYSTERESIS => Rotation::Deg0,
            current => current,
        };

        if target == self.current {
            self.stable_count = 0;
            return None;
        }

        if target == self.pending {
            self.stable_count = self.stable_count.saturating_add(1);
        } else {
            self.pending = target;
            self.stable_count = 1;
        }

        (self.stable_count >= IMU_STABLE_COUNT).then_some(target)
    }

    /// Read the accelerometer and feed the sample.
    ///
    /// A failed read is logged and skipped.
    pub fn sample<A: Accelerometer>(&mut self, accel: &mut A) -> Option<Rotation> {
        match accel.read_x() {
            Ok(x) => self.observe(x),
            Err(e) => {
                debug!("Accelerometer sample skipped: {e}");
                None
            }
        }
    }

    /// Record that `rotation` is now applied to the display.
    pub fn commit(&mut self, rotation: Rotation) {
        self.current = rotation;
        self.stable_count = 0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

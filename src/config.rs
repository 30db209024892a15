//! Compile-time configuration for the display UI layer.
//!
//! Every timing value is expressed in milliseconds of the caller-supplied
//! monotonic clock (`now_ms`). Brightness levels are raw 8-bit backlight
//! duty values as understood by the panel driver.
//!
//! # Power Timeline
//!
//! ```text
//! last activity ──8 s──▶ Dimmed (120) ──20 s total──▶ Soft powersave (80..120 breathing)
//! ```
//!
//! The thresholds are measured from the *same* activity timestamp, so the
//! dimmed phase lasts roughly 12 seconds before the soft powersave screen
//! is shown.

// =============================================================================
// Power Management
// =============================================================================

/// Idle time after which the backlight is dimmed.
pub const DIM_TIMEOUT_MS: u64 = 8_000;

/// Idle time after which the soft powersave screen is entered.
pub const SOFT_TIMEOUT_MS: u64 = 20_000;

/// Cadence of the inactivity check, independent of the tick rate.
pub const INACTIVITY_POLL_MS: u64 = 500;

/// Backlight level while the user is interacting.
pub const BRIGHTNESS_FULL: u8 = 255;

/// Backlight level in the dimmed state.
pub const BRIGHTNESS_DIMMED: u8 = 120;

/// Lower bound of the breathing oscillation.
pub const BRIGHTNESS_SOFT_MIN: u8 = 80;

/// Upper bound of the breathing oscillation.
pub const BRIGHTNESS_SOFT_MAX: u8 = 120;

// =============================================================================
// Animations
// =============================================================================

/// Length of one full breathing cycle (inhale, hold, exhale).
pub const BREATHING_PERIOD_MS: u64 = 6_000;

/// Duration of the fan pill background cross-fade.
pub const FAN_FADE_MS: u64 = 300;

/// Fixed-point scale shared by the easing curves (1.0 == 1024).
pub const EASE_SCALE: u32 = 1024;

// =============================================================================
// Sensors and Widgets
// =============================================================================

/// Number of fan slots shown on the main screen.
pub const MAX_FANS: usize = 4;

/// Maximum stored sensor name length in bytes (longer names are truncated).
pub const SENSOR_NAME_CAPACITY: usize = 31;

/// Capacity of widget label strings (name plus status line).
pub const LABEL_CAPACITY: usize = 48;

/// Capacity of short numeric labels ("142", "2/3", "--").
pub const SHORT_LABEL_CAPACITY: usize = 8;

/// Maximum length of the provisioning URL encoded in the QR code.
pub const QR_URL_CAPACITY: usize = 127;

/// Depth of the deferred task queue.
pub const TASK_QUEUE_DEPTH: usize = 4;

// =============================================================================
// Orientation
// =============================================================================

/// Interval between accelerometer samples.
pub const IMU_SAMPLE_INTERVAL_MS: u64 = 200;

/// Delay before the orientation worker takes its first sample.
pub const IMU_STARTUP_DELAY_MS: u64 = 2_000;

/// Extra tilt (in g) beyond the threshold required before a flip is considered.
pub const IMU_HYSTERESIS: f32 = 0.3;

/// Consecutive samples that must agree before a rotation is committed.
pub const IMU_STABLE_COUNT: u8 = 2;

/// Default right-tilt threshold (g) for returning to 0 degrees.
pub const TILT_RIGHT_THRESHOLD: f32 = 1.0;

/// Default left-tilt threshold (g) for flipping to 180 degrees.
pub const TILT_LEFT_THRESHOLD: f32 = -1.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeouts_ordered() {
        assert!(DIM_TIMEOUT_MS < SOFT_TIMEOUT_MS);
        assert!(INACTIVITY_POLL_MS < DIM_TIMEOUT_MS);
    }

    #[test]
    fn test_brightness_levels_ordered() {
        assert!(BRIGHTNESS_SOFT_MIN < BRIGHTNESS_SOFT_MAX);
        assert!(BRIGHTNESS_SOFT_MAX <= BRIGHTNESS_DIMMED);
        assert!(BRIGHTNESS_DIMMED < BRIGHTNESS_FULL);
    }

    #[test]
    fn test_fan_mask_fits_u8() {
        // ColorTransition::update reports changed fans as a u8 bitmask
        assert!(MAX_FANS <= 8);
    }
}

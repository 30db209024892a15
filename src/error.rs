//! Error type shared by the UI layer and its hardware collaborators.
//!
//! Every public operation of the UI context is infallible: collaborator
//! failures are logged and the state machine carries on. The error type
//! exists for the collaborator traits ([`crate::Backlight`],
//! [`crate::Accelerometer`]) and for platform glue such as the simulator's
//! bounded UI lock.

use thiserror::Error;

/// Failures reported by display collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The backlight driver rejected a brightness write.
    #[error("backlight write failed")]
    Backlight,

    /// The accelerometer did not return a sample.
    #[error("accelerometer read failed")]
    Accelerometer,

    /// No accelerometer answered the startup probe.
    #[error("IMU not detected")]
    ImuNotDetected,

    /// The UI lock was not acquired within the given number of milliseconds.
    #[error("UI lock not acquired within {0} ms")]
    LockTimeout(u32),
}

//! Async tasks of the simulator.
//!
//! All of them run on one embassy executor and share the UI lock:
//! - `pump`: tick pump
//! - `orientation`: accelerometer sampling and panel rotation
//! - `fan_controller`: answers fan switch requests from the touch screen

pub mod fan_controller;
pub mod orientation;
pub mod pump;

pub use fan_controller::{FAN_HANDLER, fan_controller_task};
pub use orientation::{ROTATION_WAITS, orientation_task};
pub use pump::{PUMP_METRICS, tick_pump_task};

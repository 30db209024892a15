//! HomeWind display UI layer.
//!
//! Power management and widget update logic for the HomeWind AMOLED
//! display: heart rate, cadence and fan widgets, a settings modal, and a
//! three-stage power state machine (active, dimmed, soft powersave with a
//! breathing backlight).
//!
//! The crate never touches hardware. Everything platform-specific sits
//! behind the collaborator traits in [`display`] and [`orientation`]:
//!
//! - [`colors`]: Rgb565 palette
//! - [`config`]: timing, brightness and capacity constants
//! - [`sensor_state`]: latest sensor values
//! - [`widgets`]: state to visual mapping
//! - [`render`]: per-widget dirty tracking
//! - [`screens`]: active screen and the visibility gate
//! - [`power`]: inactivity state machine
//! - [`breathing`]: easing curves and the breathing animator
//! - [`animations`]: fan pill cross-fade
//! - [`scheduler`]: run-on-next-tick queue
//! - [`orientation`]: accelerometer-driven rotation
//! - [`ui`]: the [`HomeWind`] context tying it together
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while firmware builds stay `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animations;
pub mod breathing;
pub mod colors;
pub mod config;
pub mod display;
pub mod error;
pub mod orientation;
pub mod power;
pub mod render;
pub mod scheduler;
pub mod screens;
pub mod sensor_state;
pub mod ui;
pub mod widgets;

// Re-export commonly used items
pub use breathing::{BreathingCurves, Ease};
pub use display::{Backlight, FanToggleHandler, Renderer};
pub use error::Error;
pub use orientation::{Accelerometer, Orientation, Rotation, TiltThresholds};
pub use power::PowerState;
pub use screens::Screen;
pub use sensor_state::{CscState, FanState, HrState};
pub use ui::HomeWind;
pub use widgets::{CscVisual, FanVisual, HrVisual, SlotVisual, SummarySlot};

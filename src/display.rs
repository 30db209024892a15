//! Collaborator interfaces consumed by the UI context.
//!
//! The core never touches hardware. It drives three seams:
//!
//! - [`Backlight`]: a single 8-bit brightness output
//! - [`Renderer`]: screen loads and widget visual updates
//! - [`FanToggleHandler`]: notification when the user switches a fan
//!
//! Renderer methods are infallible. A backend that can fail internally is
//! expected to log and carry on, matching the core's policy of degrading to
//! "no visual change this cycle".

use embedded_graphics::pixelcolor::Rgb565;

use crate::error::Error;
use crate::orientation::Rotation;
use crate::screens::Screen;
use crate::widgets::{CscVisual, FanVisual, HrVisual, SlotVisual, SummarySlot};

/// Panel backlight.
pub trait Backlight {
    /// Set the backlight duty, 0 (off) to 255 (full).
    fn set_brightness(&mut self, level: u8) -> Result<(), Error>;
}

/// Rendering backend for the four screens and the settings modal.
pub trait Renderer {
    /// Build the retained objects for `screen`. Called once per screen.
    fn create_screen(&mut self, screen: Screen);

    /// Make `screen` the visible one.
    fn load_screen(&mut self, screen: Screen);

    /// Show or hide the settings modal over the main screen.
    fn set_modal_visible(&mut self, visible: bool);

    fn apply_hr(&mut self, visual: &HrVisual);

    fn apply_csc(&mut self, visual: &CscVisual);

    /// Apply a complete fan pill visual.
    fn apply_fan(&mut self, index: u8, visual: &FanVisual);

    /// Update only the pill background. Used by the cross-fade.
    fn set_fan_background(&mut self, index: u8, color: Rgb565);

    /// A background fade from `from` to `to` started on pill `index`.
    ///
    /// The frames arrive through [`set_fan_background`](Self::set_fan_background).
    fn fan_fade_started(&mut self, index: u8, from: Rgb565, to: Rgb565) {
        let _ = (index, from, to);
    }

    fn apply_summary(&mut self, slot: SummarySlot, visual: &SlotVisual);

    /// Replace the provisioning QR code on the AP screen.
    fn set_qr_code(&mut self, url: &str);

    fn set_rotation(&mut self, rotation: Rotation);
}

/// Receives fan switch requests made on the touch screen.
///
/// Only one handler is registered at a time. Handlers run on the UI thread
/// while the UI lock is held, so they must not block.
pub trait FanToggleHandler {
    fn on_fan_toggle(&self, index: u8, is_on: bool);
}

impl<F> FanToggleHandler for F
where
    F: Fn(u8, bool),
{
    #[inline]
    fn on_fan_toggle(&self, index: u8, is_on: bool) {
        self(index, is_on);
    }
}

//! Color tokens for the HomeWind display.
//!
//! The design palette is specified as 24-bit hex values. They are converted
//! to the panel's native Rgb565 at compile time with [`hex`], so widget code
//! can compare colors directly without any runtime conversion.
//!
//! ## Rgb565 Color Format
//!
//! 5 bits red, 6 bits green, 5 bits blue. Converting from 24-bit drops the
//! low bits of each channel, so two hex values may map to the same token.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

/// Convert a `0xRRGGBB` literal to Rgb565 by truncating each channel.
#[inline]
pub const fn hex(rgb: u32) -> Rgb565 {
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    Rgb565::new(r >> 3, g >> 2, b >> 3)
}

// =============================================================================
// Standard Colors
// =============================================================================

/// Screen background behind every widget.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white. Idle fan pills and text on dark or saturated fills.
pub const WHITE: Rgb565 = Rgb565::WHITE;

// =============================================================================
// Palette
// =============================================================================

/// Brand accent (#F00F66). Heart icon, error pill background.
pub const ACCENT: Rgb565 = hex(0xF0_0F66);

/// Cadence sensor highlight (#25ADD3).
pub const CSC: Rgb565 = hex(0x25_ADD3);

/// Background of fan pills that have no fan assigned (#303132).
pub const FAN_UNCONFIGURED: Rgb565 = hex(0x30_3132);

/// Dark label text on white pills (#516682).
pub const TEXT_DARK: Rgb565 = hex(0x51_6682);

/// Success green used by the pill toggle knob and summary icons (#25C46B).
pub const SUCCESS_ICON: Rgb565 = hex(0x25_C46B);

/// Background of a fan pill that is switched on (#06BB60).
pub const FAN_ACTIVE_ON: Rgb565 = hex(0x06_BB60);

/// Grey for disconnected or unknown readings (#999999).
pub const DISCONNECTED: Rgb565 = hex(0x99_9999);

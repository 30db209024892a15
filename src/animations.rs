//! Background cross-fade for the fan pills.
//!
//! When a fan is switched, its pill background does not jump between white
//! and green. It fades over [`FAN_FADE_MS`] with an ease-in-out curve,
//! starting from whatever color is currently on screen. Starting from the
//! displayed color means a toggle that interrupts a running fade reverses
//! smoothly instead of snapping back first.
//!
//! # Time Based
//!
//! Progress is computed from the fade's start timestamp on each tick rather
//! than stepped per frame, so the fade has the same duration at any tick
//! rate.
//!
//! # Performance Considerations
//!
//! - Color interpolation uses fixed-point integer math (1.0 == 1024)
//! - State is tracked per fan with fixed-size arrays (no heap allocation)

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

use crate::breathing::Ease;
use crate::colors::BLACK;
use crate::config::{EASE_SCALE, FAN_FADE_MS, MAX_FANS};

/// Curve used by the pill fade.
const FADE_EASE: Ease = Ease::QuadraticInOut;

/// A running fade between two colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fade {
    from: Rgb565,
    to: Rgb565,
    started_at: u64,
}

// =============================================================================
// Color Transition State
// =============================================================================

/// Tracks the displayed background of every fan pill.
pub struct ColorTransition {
    /// Color currently on screen for each pill.
    current: [Rgb565; MAX_FANS],

    /// Running fade per pill, if any.
    fades: [Option<Fade>; MAX_FANS],
}

impl ColorTransition {
    /// All pills start black with no fade running.
    pub const fn new() -> Self {
        Self {
            current: [BLACK; MAX_FANS],
            fades: [None; MAX_FANS],
        }
    }

    /// Color currently displayed for pill `index`.
    #[inline]
    pub fn current(&self, index: usize) -> Rgb565 {
        self.current.get(index).copied().unwrap_or(BLACK)
    }

    /// Whether pill `index` is mid-fade.
    #[inline]
    pub fn is_fading(&self, index: usize) -> bool {
        matches!(self.fades.get(index), Some(Some(_)))
    }

    /// Jump straight to `color`, cancelling any running fade.
    pub fn snap(&mut self, index: usize, color: Rgb565) {
        if let (Some(current), Some(fade)) =
            (self.current.get_mut(index), self.fades.get_mut(index))
        {
            *current = color;
            *fade = None;
        }
    }

    /// Start fading pill `index` from its displayed color toward `target`.
    ///
    /// Returns `true` if a fade was started. Nothing starts when the pill
    /// already shows `target`.
    pub fn start(&mut self, index: usize, target: Rgb565, now_ms: u64) -> bool {
        let (Some(current), Some(fade)) = (self.current.get(index), self.fades.get_mut(index))
        else {
            return false;
        };
        if *current == target {
            *fade = None;
            return false;
        }
        *fade = Some(Fade {
            from: *current,
            to: target,
            started_at: now_ms,
        });
        true
    }

    /// Advance all running fades to `now_ms`.
    ///
    /// Returns a bitmask of pills whose displayed color changed.
    pub fn update(&mut self, now_ms: u64) -> u8 {
        let mut changed: u8 = 0;

        for (i, (current, slot)) in self.current.iter_mut().zip(self.fades.iter_mut()).enumerate() {
            let Some(fade) = *slot else {
                continue;
            };

            let elapsed = now_ms.saturating_sub(fade.started_at);
            let color = if elapsed >= FAN_FADE_MS {
                *slot = None;
                fade.to
            } else {
                let t = (elapsed * u64::from(EASE_SCALE) / FAN_FADE_MS) as u32;
                lerp_rgb565(fade.from, fade.to, FADE_EASE.apply(t))
            };

            if color != *current {
                *current = color;
                changed |= 1 << i;
            }
        }

        changed
    }
}

impl Default for ColorTransition {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Color Interpolation Helpers
// =============================================================================

/// Linear interpolation between two Rgb565 colors.
///
/// `t` is fixed-point progress where 0 returns `from` and 1024 returns `to`.
fn lerp_rgb565(from: Rgb565, to: Rgb565, t: u32) -> Rgb565 {
    let t = t.min(EASE_SCALE) as i32;
    let scale = EASE_SCALE as i32;
    let channel = |a: u8, b: u8| -> u8 {
        let a = i32::from(a);
        let b = i32::from(b);
        (a + (b - a) * t / scale) as u8
    };

    Rgb565::new(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

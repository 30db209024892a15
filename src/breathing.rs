//! Breathing backlight effect for the soft powersave state.
//!
//! While the powersave screen is shown, the backlight slowly oscillates
//! between [`BRIGHTNESS_SOFT_MIN`] and [`BRIGHTNESS_SOFT_MAX`] to signal that
//! the device is still alive.
//!
//! # Waveform
//!
//! One cycle lasts [`BREATHING_PERIOD_MS`] and has three phases:
//!
//! ```text
//! 0%          40%   50%                     100%
//! | inhale    | hold |        exhale         |
//! | MIN → MAX | MAX  |       MAX → MIN       |
//! ```
//!
//! Inhale and exhale each use their own [`Ease`] curve. All math is done in
//! integer fixed point where 1.0 == [`EASE_SCALE`] (1024).
//!
//! # Restart Safety
//!
//! The level is recomputed from `(now - start) % period` on every tick, so
//! missed or irregular ticks never drift the phase. Writes to the backlight
//! only happen when the integer level differs from the previous write.

use log::warn;

use crate::config::{BREATHING_PERIOD_MS, BRIGHTNESS_SOFT_MAX, BRIGHTNESS_SOFT_MIN, EASE_SCALE};
use crate::display::Backlight;

/// Inhale ends at 40% of the cycle (410/1024).
const INHALE_END: u32 = 410;

/// Hold ends and exhale starts at 50% of the cycle.
const HOLD_END: u32 = 512;

// =============================================================================
// Easing
// =============================================================================

/// Easing curves selectable for the inhale and exhale phases.
///
/// The three `Sine*` variants are quadratic substitutes, not trigonometric
/// curves. Enabling the `true-sine` feature evaluates real sine curves
/// instead, which changes the waveform shape.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ease {
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    QuadraticInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
}

impl Ease {
    /// Map progress `t` in `0..=1024` onto eased progress in `0..=1024`.
    pub fn apply(self, t: u32) -> u32 {
        const S: u64 = EASE_SCALE as u64;
        const HALF: u64 = S / 2;

        let t = u64::from(t.min(EASE_SCALE));
        let inv = S - t;

        let eased = match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t / S,
            Self::QuadraticOut => S - inv * inv / S,
            Self::QuadraticInOut => {
                if t < HALF {
                    t * t * 2 / S
                } else {
                    S.saturating_sub(inv * inv * 2 / S)
                }
            }
            Self::CubicIn => t * t * t / (S * S),
            Self::CubicOut => S - inv * inv * inv / (S * S),
            Self::CubicInOut => {
                if t < HALF {
                    t * t * t * 4 / (S * S)
                } else {
                    S.saturating_sub(inv * inv * inv * 4 / (S * S))
                }
            }
            #[cfg(not(feature = "true-sine"))]
            Self::SineIn => S - inv * inv / S,
            #[cfg(not(feature = "true-sine"))]
            Self::SineOut => t * t / S,
            #[cfg(not(feature = "true-sine"))]
            Self::SineInOut => {
                if t < HALF {
                    t * t / HALF
                } else {
                    S.saturating_sub(inv * inv / HALF)
                }
            }
            #[cfg(feature = "true-sine")]
            Self::SineIn | Self::SineOut | Self::SineInOut => return trig::apply(self, t as u32),
        };

        eased.min(S) as u32
    }
}

#[cfg(feature = "true-sine")]
mod trig {
    use core::f32::consts::{FRAC_PI_2, PI};

    use micromath::F32Ext;

    use super::{Ease, EASE_SCALE};

    pub(super) fn apply(ease: Ease, t: u32) -> u32 {
        if t == 0 || t >= EASE_SCALE {
            return t.min(EASE_SCALE);
        }
        let x = t as f32 / EASE_SCALE as f32;
        let y = match ease {
            Ease::SineIn => 1.0 - (x * FRAC_PI_2).cos(),
            Ease::SineOut => (x * FRAC_PI_2).sin(),
            _ => (1.0 - (x * PI).cos()) / 2.0,
        };
        let scaled = (y * EASE_SCALE as f32 + 0.5) as i32;
        scaled.clamp(0, EASE_SCALE as i32) as u32
    }
}

/// Curve pair used by the breathing effect.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BreathingCurves {
    pub inhale: Ease,
    pub exhale: Ease,
}

impl BreathingCurves {
    pub const fn new(inhale: Ease, exhale: Ease) -> Self {
        Self { inhale, exhale }
    }
}

impl Default for BreathingCurves {
    fn default() -> Self {
        Self::new(Ease::QuadraticIn, Ease::QuadraticOut)
    }
}

// =============================================================================
// Waveform
// =============================================================================

/// Position along the breathing path (0 = dimmest, 1024 = brightest).
pub fn breathing_path(elapsed_in_cycle_ms: u64, curves: BreathingCurves) -> u32 {
    let t_norm = (elapsed_in_cycle_ms * u64::from(EASE_SCALE) / BREATHING_PERIOD_MS)
        .min(u64::from(EASE_SCALE)) as u32;

    if t_norm < INHALE_END {
        curves.inhale.apply(t_norm * EASE_SCALE / INHALE_END)
    } else if t_norm < HOLD_END {
        EASE_SCALE
    } else {
        let exhale_t = (t_norm - HOLD_END) * EASE_SCALE / (EASE_SCALE - HOLD_END);
        EASE_SCALE - curves.exhale.apply(exhale_t)
    }
}

/// Backlight level for a position within the cycle.
pub fn breathing_level(elapsed_in_cycle_ms: u64, curves: BreathingCurves) -> u8 {
    let path = breathing_path(elapsed_in_cycle_ms, curves);
    let span = u32::from(BRIGHTNESS_SOFT_MAX - BRIGHTNESS_SOFT_MIN);
    BRIGHTNESS_SOFT_MIN + (span * path / EASE_SCALE) as u8
}

// =============================================================================
// Animator
// =============================================================================

/// Drives the backlight along the breathing waveform.
#[derive(Debug, Default)]
pub struct BreathingAnimator {
    curves: BreathingCurves,
    started_at: Option<u64>,
    last_written: Option<u8>,
}

impl BreathingAnimator {
    pub fn new(curves: BreathingCurves) -> Self {
        Self {
            curves,
            started_at: None,
            last_written: None,
        }
    }

    #[inline]
    pub const fn curves(&self) -> BreathingCurves {
        self.curves
    }

    #[inline]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Begin a new cycle at `now_ms`, replacing any running one.
    ///
    /// The minimum level is written immediately so the cycle starts dark.
    pub fn start<B: Backlight>(&mut self, now_ms: u64, backlight: &mut B) {
        self.stop();
        self.started_at = Some(now_ms);
        self.write(BRIGHTNESS_SOFT_MIN, backlight);
    }

    /// Stop writing to the backlight.
    pub fn stop(&mut self) {
        self.started_at = None;
        self.last_written = None;
    }

    /// Replace the curves, restarting the cycle if one is running.
    pub fn set_curves<B: Backlight>(
        &mut self,
        curves: BreathingCurves,
        now_ms: u64,
        backlight: &mut B,
    ) {
        self.curves = curves;
        if self.is_running() {
            self.start(now_ms, backlight);
        }
    }

    /// Advance to `now_ms`. Returns the level written, if any.
    pub fn tick<B: Backlight>(&mut self, now_ms: u64, backlight: &mut B) -> Option<u8> {
        let start = self.started_at?;
        let elapsed = now_ms.saturating_sub(start) % BREATHING_PERIOD_MS;
        let level = breathing_level(elapsed, self.curves);
        self.write(level, backlight)
    }

    fn write<B: Backlight>(&mut self, level: u8, backlight: &mut B) -> Option<u8> {
        if self.last_written == Some(level) {
            return None;
        }
        match backlight.set_brightness(level) {
            Ok(()) => {
                self.last_written = Some(level);
                Some(level)
            }
            Err(e) => {
                // Retried on the next tick since last_written is unchanged
                warn!("Breathing backlight write failed: {e}");
                None
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

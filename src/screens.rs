//! Screens and the visibility gate in front of the main widgets.
//!
//! Four screens share the panel:
//!
//! - [`Screen::Boot`]: splash while the firmware starts
//! - [`Screen::Ap`]: provisioning QR code while in access-point mode
//! - [`Screen::Main`]: heart rate, cadence and fan widgets
//! - [`Screen::Powersave`]: low-information summary shown while breathing
//!
//! The settings modal is an overlay on the main screen, not a screen of
//! its own.
//!
//! # Gate
//!
//! Every widget update asks [`ScreenGate::check`] before touching the
//! renderer. The decision only depends on the active screen, the modal
//! flag and the current power state:
//!
//! | Active screen | Modal | Power state | Decision |
//! |---------------|-------|-------------|----------|
//! | not Main | - | SoftPowersave | [`GateDecision::Summary`] |
//! | not Main | - | other | [`GateDecision::Skip`] |
//! | Main | open | - | [`GateDecision::Pending`] |
//! | Main | closed | - | [`GateDecision::Render`] |

use crate::power::PowerState;

/// Screens that can be loaded on the panel.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    Boot,
    Ap,
    Main,
    Powersave,
}

/// Outcome of a gate check.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GateDecision {
    /// Main screen visible and unobstructed; widgets may render.
    Render,
    /// Modal is open; the update was recorded as pending.
    Pending,
    /// Soft powersave owns the panel; only the summary may update.
    Summary,
    /// Boot or AP screen owns the panel; drop the update.
    Skip,
}

/// Tracks the active screen and the settings modal overlay.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenGate {
    active: Option<Screen>,
    modal_visible: bool,
    refresh_pending: bool,
}

impl ScreenGate {
    pub const fn new() -> Self {
        Self {
            active: None,
            modal_visible: false,
            refresh_pending: false,
        }
    }

    /// Screen currently loaded, `None` before the first load.
    #[inline]
    pub const fn active(&self) -> Option<Screen> {
        self.active
    }

    #[inline]
    pub const fn is_modal_visible(&self) -> bool {
        self.modal_visible
    }

    /// Whether updates were suppressed while the modal was open.
    #[inline]
    pub const fn is_refresh_pending(&self) -> bool {
        self.refresh_pending
    }

    /// Record a screen load.
    #[inline]
    pub fn set_active(&mut self, screen: Screen) {
        self.active = Some(screen);
    }

    /// Decide whether a main-screen widget update may reach the renderer.
    pub fn check(&mut self, power: PowerState) -> GateDecision {
        if self.active != Some(Screen::Main) {
            return if power == PowerState::SoftPowersave {
                GateDecision::Summary
            } else {
                GateDecision::Skip
            };
        }
        if self.modal_visible {
            self.refresh_pending = true;
            return GateDecision::Pending;
        }
        GateDecision::Render
    }

    /// Mark the modal as shown. Starts with nothing pending.
    pub fn open_modal(&mut self) {
        self.modal_visible = true;
        self.refresh_pending = false;
    }

    /// Mark the modal as closed.
    ///
    /// Returns `true` if updates were suppressed while it was open and the
    /// caller must run a full refresh.
    pub fn close_modal(&mut self) -> bool {
        self.modal_visible = false;
        core::mem::take(&mut self.refresh_pending)
    }
}

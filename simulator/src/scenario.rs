//! Scripted session: provisioning, a ride with live sensor data, the
//! settings modal, an idle period long enough for soft powersave, and a
//! wake-up.
//!
//! Times are simulated milliseconds since start.

use homewind_ui::{CscState, Ease, FanState, HrState};
use log::info;

use crate::SimUi;

/// Provisioning page encoded in the QR code.
pub const SETUP_URL: &str = "http://192.168.4.1/setup";

/// One inbound operation of the UI context.
#[derive(Clone, Copy, Debug)]
pub enum Action {
    ShowAp,
    ShowMain,
    Hr(HrState, Option<&'static str>, u16),
    HrValue(u16),
    HrState(HrState),
    Csc(CscState, Option<&'static str>, u16),
    Cadence(u16),
    CscState(CscState),
    Fan(u8, FanState, bool),
    FanToggle(u8, bool),
    Tap(u8),
    OpenSettings,
    CloseSettings,
    Touch,
    Breathing(Ease, Ease),
}

pub const SCRIPT: &[(u64, Action)] = &[
    (1_500, Action::ShowAp),
    (4_000, Action::ShowMain),
    (4_200, Action::Hr(HrState::Active, Some("Polar H10"), 0)),
    (4_400, Action::Csc(CscState::Active, Some("Wahoo RPM"), 82)),
    (4_600, Action::Fan(0, FanState::Active, false)),
    (4_600, Action::Fan(1, FanState::Active, true)),
    (4_600, Action::Fan(2, FanState::Error, false)),
    (5_000, Action::HrValue(118)),
    (6_000, Action::Tap(0)),
    (7_000, Action::Tap(2)),
    (7_500, Action::HrValue(121)),
    (8_000, Action::OpenSettings),
    (8_500, Action::HrValue(124)),
    (9_000, Action::Cadence(85)),
    (10_000, Action::CloseSettings),
    (11_000, Action::HrValue(127)),
    (14_000, Action::HrValue(131)),
    (18_000, Action::HrValue(129)),
    // Dimmed from ~16.5 s, soft powersave from ~28.5 s
    (24_000, Action::Cadence(88)),
    (30_000, Action::HrValue(122)),
    (32_000, Action::Breathing(Ease::CubicIn, Ease::CubicOut)),
    (34_000, Action::FanToggle(1, false)),
    (38_000, Action::Touch),
    (39_000, Action::HrState(HrState::Inactive)),
    (41_000, Action::CscState(CscState::Inactive)),
    (42_000, Action::Tap(1)),
];

/// Simulated time at which the session ends.
pub const END_MS: u64 = 46_000;

/// Run `action` against the context at `now_ms`.
pub fn apply(ui: &mut SimUi, action: Action, now_ms: u64) {
    info!("@{:>6} ms  {action:?}", now_ms);
    match action {
        Action::ShowAp => {
            ui.show_ap_screen();
            ui.set_qr_code_url(SETUP_URL);
        }
        Action::ShowMain => ui.show_main_screen(),
        Action::Hr(state, name, value) => ui.set_hr(state, name, value),
        Action::HrValue(value) => ui.set_hr_value(value),
        Action::HrState(state) => ui.set_hr_state(state),
        Action::Csc(state, name, cadence) => ui.set_csc(state, name, cadence),
        Action::Cadence(cadence) => ui.set_csc_cadence(cadence),
        Action::CscState(state) => ui.set_csc_state(state),
        Action::Fan(index, state, is_on) => ui.set_fan(index, state, is_on),
        Action::FanToggle(index, is_on) => ui.set_fan_toggle(index, is_on),
        Action::Tap(index) => ui.tap_fan(index, now_ms),
        Action::OpenSettings => ui.open_settings_modal(now_ms),
        Action::CloseSettings => ui.close_settings_modal(),
        Action::Touch => ui.notify_user_activity(now_ms),
        Action::Breathing(inhale, exhale) => ui.configure_breathing(inhale, exhale),
    }
}

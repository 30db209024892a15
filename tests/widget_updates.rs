//! Integration tests for widget updates, the settings modal and fan taps.

mod common;

use std::sync::Mutex;

use common::{Call, advance, run_until_soft_powersave, ui_on_main};
use homewind_ui::colors::{FAN_ACTIVE_ON, WHITE};
use homewind_ui::config::QR_URL_CAPACITY;
use homewind_ui::widgets::CscIcon;
use homewind_ui::{CscState, FanState, HrState, Rotation, Screen, SummarySlot};

fn fan_calls(calls: &[Call], index: u8) -> Vec<homewind_ui::FanVisual> {
    calls
        .iter()
        .filter_map(|c| match c {
            Call::Fan(i, v) if *i == index => Some(*v),
            _ => None,
        })
        .collect()
}

#[test]
fn identical_hr_update_renders_once() {
    let mut ui = ui_on_main(0);
    ui.set_hr(HrState::Active, Some("Polar H10"), 120);
    ui.set_hr(HrState::Active, Some("Polar H10"), 120);
    ui.set_hr_value(120);
    ui.set_hr_state(HrState::Active);

    assert_eq!(ui.renderer().count(|c| matches!(c, Call::Hr(_))), 1);
}

#[test]
fn hr_value_changes_render_new_text() {
    let mut ui = ui_on_main(0);
    ui.set_hr(HrState::Active, Some("Polar H10"), 120);
    ui.set_hr_value(121);

    let Some(Call::Hr(visual)) = ui.renderer().calls.last() else {
        panic!("no HR render");
    };
    assert_eq!(visual.value.as_deref(), Some("121"));
    assert_eq!(visual.caption.as_str(), "Polar H10");
}

#[test]
fn csc_update_renders_cadence() {
    let mut ui = ui_on_main(0);
    ui.set_csc(CscState::Active, Some("Crank"), 85);

    let Some(Call::Csc(visual)) = ui.renderer().calls.last() else {
        panic!("no CSC render");
    };
    assert_eq!(visual.icon, CscIcon::Checkmark);
    assert_eq!(visual.name.as_str(), "Crank");
    assert_eq!(visual.status.as_str(), "85 RPM");

    ui.set_csc_state(CscState::Inactive);
    let Some(Call::Csc(visual)) = ui.renderer().calls.last() else {
        panic!("no CSC render");
    };
    assert_eq!(visual.icon, CscIcon::Error);
    assert_eq!(visual.status.as_str(), "Not Connected");
}

#[test]
fn modal_defers_updates_until_closed() {
    let mut ui = ui_on_main(0);
    ui.open_settings_modal(100);
    assert!(ui.is_modal_visible());

    ui.set_hr(HrState::Active, None, 90);
    ui.set_hr_value(95);
    ui.set_fan(1, FanState::Active, true);
    assert!(ui.is_refresh_pending());
    assert_eq!(ui.renderer().calls, vec![Call::Modal(true)]);

    ui.renderer_mut().clear();
    ui.close_settings_modal();
    assert!(!ui.is_modal_visible());
    assert!(!ui.is_refresh_pending());

    let calls = &ui.renderer().calls;
    assert_eq!(calls.first(), Some(&Call::Modal(false)));
    assert_eq!(ui.renderer().count(|c| matches!(c, Call::Hr(_))), 1);
    assert_eq!(ui.renderer().count(|c| matches!(c, Call::Csc(_))), 1);
    assert_eq!(ui.renderer().count(|c| matches!(c, Call::Fan(..))), 4);
    // Full refresh draws the latest value, not every intermediate one
    let hr = calls.iter().find_map(|c| match c {
        Call::Hr(v) => v.value.clone(),
        _ => None,
    });
    assert_eq!(hr.as_deref(), Some("95"));
}

#[test]
fn closing_modal_without_updates_does_not_redraw() {
    let mut ui = ui_on_main(0);
    ui.open_settings_modal(100);
    ui.close_settings_modal();
    ui.close_settings_modal();

    assert_eq!(ui.renderer().calls, vec![Call::Modal(true), Call::Modal(false)]);
}

#[test]
fn modal_only_opens_over_main_screen() {
    let mut ui = ui_on_main(0);
    ui.show_ap_screen();
    ui.renderer_mut().clear();

    ui.open_settings_modal(100);
    assert!(!ui.is_modal_visible());
    assert!(ui.renderer().calls.is_empty());
}

#[test]
fn opening_modal_counts_as_activity() {
    let mut ui = ui_on_main(0);
    advance(&mut ui, 0, 7_000);
    ui.open_settings_modal(7_000);
    assert_eq!(ui.last_activity(), 7_000);

    advance(&mut ui, 7_000, 14_000);
    assert_eq!(ui.power_state(), homewind_ui::PowerState::Active);
}

#[test]
fn tap_toggles_active_fan_and_fades() {
    let events = Mutex::new(Vec::new());
    let handler = |index: u8, is_on: bool| events.lock().unwrap().push((index, is_on));

    let mut ui = ui_on_main(0);
    ui.register_fan_toggle_handler(&handler);
    ui.set_fan(0, FanState::Active, false);
    ui.renderer_mut().clear();

    ui.tap_fan(0, 1_000);
    assert_eq!(*events.lock().unwrap(), vec![(0, true)]);
    assert!(ui.sensors().fan(0).is_some_and(|f| f.is_on));
    assert!(ui.is_fan_fading(0));
    assert_eq!(ui.renderer().count(|c| matches!(c, Call::FadeStarted(..))), 1);
    assert!(ui.renderer().calls.contains(&Call::FadeStarted(0, WHITE, FAN_ACTIVE_ON)));

    // Pill is redrawn with the on-state text over the old background
    let pills = fan_calls(&ui.renderer().calls, 0);
    assert_eq!(pills.len(), 1);
    assert_eq!(pills[0].background, WHITE);
    assert_eq!(pills[0].text.map(|(t, _)| t), Some("On"));

    ui.renderer_mut().clear();
    advance(&mut ui, 1_000, 1_500);
    assert!(!ui.is_fan_fading(0));

    let backgrounds: Vec<_> = ui
        .renderer()
        .calls
        .iter()
        .filter_map(|c| match c {
            Call::FanBackground(0, color) => Some(*color),
            _ => None,
        })
        .collect();
    assert!(backgrounds.len() >= 2, "fade should take several ticks");
    assert_eq!(backgrounds.last(), Some(&FAN_ACTIVE_ON));
}

#[test]
fn tap_twice_switches_back_off() {
    let events = Mutex::new(Vec::new());
    let handler = |index: u8, is_on: bool| events.lock().unwrap().push((index, is_on));

    let mut ui = ui_on_main(0);
    ui.register_fan_toggle_handler(&handler);
    ui.set_fan(3, FanState::Active, false);

    ui.tap_fan(3, 1_000);
    ui.tap_fan(3, 1_100);
    assert_eq!(*events.lock().unwrap(), vec![(3, true), (3, false)]);
    assert!(ui.sensors().fan(3).is_some_and(|f| !f.is_on));
}

#[test]
fn tap_on_unswitchable_fans_does_nothing() {
    let events = Mutex::new(Vec::new());
    let handler = |index: u8, is_on: bool| events.lock().unwrap().push((index, is_on));

    let mut ui = ui_on_main(0);
    ui.register_fan_toggle_handler(&handler);
    ui.set_fan(1, FanState::Inactive, false);
    ui.renderer_mut().clear();

    ui.tap_fan(0, 1_000);
    ui.tap_fan(1, 1_000);
    assert!(events.lock().unwrap().is_empty());
    assert!(ui.renderer().calls.is_empty());
    assert!(!ui.is_fan_fading(1));
}

#[test]
fn tap_on_error_fan_reports_off() {
    let events = Mutex::new(Vec::new());
    let handler = |index: u8, is_on: bool| events.lock().unwrap().push((index, is_on));

    let mut ui = ui_on_main(0);
    ui.register_fan_toggle_handler(&handler);
    ui.set_fan(2, FanState::Error, false);
    ui.renderer_mut().clear();

    ui.tap_fan(2, 1_000);
    assert_eq!(*events.lock().unwrap(), vec![(2, false)]);
    assert_eq!(ui.sensors().fan(2).map(|f| f.state), Some(FanState::Error));
    assert!(ui.renderer().calls.is_empty());
}

#[test]
fn last_registered_handler_wins() {
    let first = Mutex::new(Vec::new());
    let second = Mutex::new(Vec::new());
    let h1 = |index: u8, is_on: bool| first.lock().unwrap().push((index, is_on));
    let h2 = |index: u8, is_on: bool| second.lock().unwrap().push((index, is_on));

    let mut ui = ui_on_main(0);
    ui.set_fan(0, FanState::Active, false);
    ui.register_fan_toggle_handler(&h1);
    ui.register_fan_toggle_handler(&h2);
    ui.tap_fan(0, 1_000);

    assert!(first.lock().unwrap().is_empty());
    assert_eq!(*second.lock().unwrap(), vec![(0, true)]);

    // Without a handler the toggle still happens
    ui.clear_fan_toggle_handler();
    ui.tap_fan(0, 1_100);
    assert_eq!(second.lock().unwrap().len(), 1);
    assert!(ui.sensors().fan(0).is_some_and(|f| !f.is_on));
}

#[test]
fn tap_out_of_range_is_ignored() {
    let mut ui = ui_on_main(0);
    ui.tap_fan(9, 1_000);
    ui.set_fan(9, FanState::Active, true);
    ui.set_fan_toggle(9, true);

    assert!(ui.renderer().calls.is_empty());
    assert_eq!(ui.last_activity(), 1_000);
}

#[test]
fn tap_behind_modal_only_counts_as_activity() {
    let events = Mutex::new(Vec::new());
    let handler = |index: u8, is_on: bool| events.lock().unwrap().push((index, is_on));

    let mut ui = ui_on_main(0);
    ui.register_fan_toggle_handler(&handler);
    ui.set_fan(0, FanState::Active, false);
    ui.open_settings_modal(500);

    ui.tap_fan(0, 1_000);
    assert!(events.lock().unwrap().is_empty());
    assert!(ui.sensors().fan(0).is_some_and(|f| !f.is_on));
    assert_eq!(ui.last_activity(), 1_000);
}

#[test]
fn tap_in_soft_powersave_only_wakes() {
    let events = Mutex::new(Vec::new());
    let handler = |index: u8, is_on: bool| events.lock().unwrap().push((index, is_on));

    let mut ui = ui_on_main(0);
    ui.register_fan_toggle_handler(&handler);
    ui.set_fan(0, FanState::Active, false);
    let now = run_until_soft_powersave(&mut ui, 0);

    ui.tap_fan(0, now + 10);
    assert_eq!(ui.active_screen(), Some(Screen::Main));
    assert!(events.lock().unwrap().is_empty());
    assert!(ui.sensors().fan(0).is_some_and(|f| !f.is_on));
}

#[test]
fn external_toggle_fades() {
    let mut ui = ui_on_main(0);
    ui.set_fan(2, FanState::Active, false);
    assert!(!ui.is_fan_fading(2));

    ui.set_fan_toggle(2, true);
    assert!(ui.is_fan_fading(2));
    let last = fan_calls(&ui.renderer().calls, 2);
    assert_eq!(last.last().map(|v| v.background), Some(WHITE));
}

#[test]
fn direct_fan_updates_snap() {
    let mut ui = ui_on_main(0);
    ui.set_fan(1, FanState::Active, true);
    assert!(!ui.is_fan_fading(1));

    let pills = fan_calls(&ui.renderer().calls, 1);
    assert_eq!(pills.last().map(|v| v.background), Some(FAN_ACTIVE_ON));
}

#[test]
fn toggle_ignored_unless_active() {
    let mut ui = ui_on_main(0);
    ui.set_fan(1, FanState::Inactive, false);
    ui.renderer_mut().clear();

    ui.set_fan_toggle(1, true);
    assert!(ui.renderer().calls.is_empty());
    assert!(ui.sensors().fan(1).is_some_and(|f| !f.is_on));
}

#[test]
fn leaving_active_state_forces_fan_off() {
    let mut ui = ui_on_main(0);
    ui.set_fan(0, FanState::Active, true);
    ui.set_fan_state(0, FanState::Inactive);
    assert!(ui.sensors().fan(0).is_some_and(|f| !f.is_on));

    let pills = fan_calls(&ui.renderer().calls, 0);
    assert_eq!(pills.last().and_then(|v| v.text).map(|(t, _)| t), Some("Off"));

    // Coming back does not restore the old flag
    ui.set_fan_state(0, FanState::Active);
    assert!(ui.sensors().fan(0).is_some_and(|f| !f.is_on));
}

#[test]
fn summary_tracks_fans_in_soft_powersave() {
    let mut ui = ui_on_main(0);
    ui.set_fan(0, FanState::Active, true);
    ui.set_fan(1, FanState::Active, false);
    run_until_soft_powersave(&mut ui, 0);
    ui.renderer_mut().clear();

    ui.set_fan_toggle(1, true);
    let calls = &ui.renderer().calls;
    assert_eq!(calls.len(), 1, "{calls:?}");
    match &calls[0] {
        Call::Summary(SummarySlot::Fans, v) => assert_eq!(v.text.as_str(), "2/2"),
        other => panic!("unexpected call {other:?}"),
    }
    // Main widgets are untouched until wake
    assert!(!ui.is_fan_fading(1));
}

#[test]
fn ap_screen_drops_updates_until_main_returns() {
    let mut ui = ui_on_main(0);
    ui.show_ap_screen();
    ui.renderer_mut().clear();

    ui.set_hr(HrState::Active, None, 77);
    ui.set_fan(0, FanState::Error, false);
    assert!(ui.renderer().calls.is_empty());

    ui.show_main_screen();
    let calls = &ui.renderer().calls;
    assert_eq!(calls.first(), Some(&Call::LoadScreen(Screen::Main)));
    let hr = calls.iter().find_map(|c| match c {
        Call::Hr(v) => v.value.clone(),
        _ => None,
    });
    assert_eq!(hr.as_deref(), Some("77"));
    assert_eq!(fan_calls(calls, 0).len(), 1);
}

#[test]
fn boot_sequence_loads_screens_in_order() {
    let mut ui = homewind_ui::HomeWind::new(
        common::RecordingRenderer::default(),
        common::RecordingBacklight::default(),
    );
    ui.create_screens();
    ui.create_screens();
    ui.show_ap_screen();

    assert_eq!(
        ui.renderer().calls,
        vec![
            Call::CreateScreen(Screen::Boot),
            Call::CreateScreen(Screen::Ap),
            Call::CreateScreen(Screen::Main),
            Call::LoadScreen(Screen::Boot),
            Call::LoadScreen(Screen::Ap),
        ]
    );
}

#[test]
fn qr_code_url_is_truncated() {
    let mut ui = ui_on_main(0);
    let url = format!("http://192.168.4.1/setup?token={}", "a".repeat(200));
    ui.set_qr_code_url(&url);

    assert_eq!(ui.qr_code_url().len(), QR_URL_CAPACITY);
    assert!(url.starts_with(ui.qr_code_url()));
    let Some(Call::QrCode(sent)) = ui.renderer().calls.last() else {
        panic!("QR code not updated");
    };
    assert_eq!(sent.as_str(), ui.qr_code_url());
}

#[test]
fn qr_code_ignored_before_screens_exist() {
    let mut ui = homewind_ui::HomeWind::new(
        common::RecordingRenderer::default(),
        common::RecordingBacklight::default(),
    );
    ui.set_qr_code_url("http://192.168.4.1");
    ui.apply_rotation(Rotation::Deg180);

    assert_eq!(ui.qr_code_url(), "");
    assert!(ui.renderer().calls.is_empty());
}

#[test]
fn rotation_is_forwarded() {
    let mut ui = ui_on_main(0);
    ui.apply_rotation(Rotation::Deg180);
    ui.apply_rotation(Rotation::Deg0);

    assert_eq!(
        ui.renderer().calls,
        vec![Call::Rotation(Rotation::Deg180), Call::Rotation(Rotation::Deg0)]
    );
}

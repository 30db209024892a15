//! Recording collaborators shared by the integration tests.

#![allow(dead_code)]

use embedded_graphics::pixelcolor::Rgb565;
use homewind_ui::{
    Backlight, CscVisual, Error, FanVisual, HomeWind, HrVisual, PowerState, Renderer, Rotation,
    Screen, SlotVisual, SummarySlot,
};

/// Tick spacing used when advancing time.
pub const TICK_MS: u64 = 100;

/// One renderer call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateScreen(Screen),
    LoadScreen(Screen),
    Modal(bool),
    Hr(HrVisual),
    Csc(CscVisual),
    Fan(u8, FanVisual),
    FanBackground(u8, Rgb565),
    FadeStarted(u8, Rgb565, Rgb565),
    Summary(SummarySlot, SlotVisual),
    QrCode(String),
    Rotation(Rotation),
}

#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub calls: Vec<Call>,
}

impl RecordingRenderer {
    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn create_screen(&mut self, screen: Screen) {
        self.calls.push(Call::CreateScreen(screen));
    }

    fn load_screen(&mut self, screen: Screen) {
        self.calls.push(Call::LoadScreen(screen));
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.calls.push(Call::Modal(visible));
    }

    fn apply_hr(&mut self, visual: &HrVisual) {
        self.calls.push(Call::Hr(visual.clone()));
    }

    fn apply_csc(&mut self, visual: &CscVisual) {
        self.calls.push(Call::Csc(visual.clone()));
    }

    fn apply_fan(&mut self, index: u8, visual: &FanVisual) {
        self.calls.push(Call::Fan(index, *visual));
    }

    fn set_fan_background(&mut self, index: u8, color: Rgb565) {
        self.calls.push(Call::FanBackground(index, color));
    }

    fn fan_fade_started(&mut self, index: u8, from: Rgb565, to: Rgb565) {
        self.calls.push(Call::FadeStarted(index, from, to));
    }

    fn apply_summary(&mut self, slot: SummarySlot, visual: &SlotVisual) {
        self.calls.push(Call::Summary(slot, visual.clone()));
    }

    fn set_qr_code(&mut self, url: &str) {
        self.calls.push(Call::QrCode(url.to_owned()));
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.calls.push(Call::Rotation(rotation));
    }
}

#[derive(Debug, Default)]
pub struct RecordingBacklight {
    pub levels: Vec<u8>,
}

impl RecordingBacklight {
    pub fn last(&self) -> Option<u8> {
        self.levels.last().copied()
    }
}

impl Backlight for RecordingBacklight {
    fn set_brightness(&mut self, level: u8) -> Result<(), Error> {
        self.levels.push(level);
        Ok(())
    }
}

pub type TestUi<'a> = HomeWind<'a, RecordingRenderer, RecordingBacklight>;

/// Context with screens created, powersave started at `now` and the main
/// screen shown. Recorded calls and levels are cleared.
pub fn ui_on_main<'a>(now: u64) -> TestUi<'a> {
    let mut ui = HomeWind::new(RecordingRenderer::default(), RecordingBacklight::default());
    ui.create_screens();
    ui.powersave_init(now);
    ui.show_main_screen();
    ui.renderer_mut().clear();
    ui.backlight_mut().levels.clear();
    ui
}

/// Tick every [`TICK_MS`] after `from` up to and including `to`.
pub fn advance(ui: &mut TestUi<'_>, from: u64, to: u64) -> u64 {
    let mut now = from;
    while now + TICK_MS <= to {
        now += TICK_MS;
        ui.tick(now);
    }
    now
}

/// Tick until soft powersave is entered. Returns the time of entry.
pub fn run_until_soft_powersave(ui: &mut TestUi<'_>, from: u64) -> u64 {
    let mut now = from;
    while ui.power_state() != PowerState::SoftPowersave {
        now += TICK_MS;
        ui.tick(now);
        assert!(now < from + 60_000, "soft powersave never entered");
    }
    now
}

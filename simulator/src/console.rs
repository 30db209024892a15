//! Console backends for the UI context.
//!
//! Instead of drawing, every visual intent is printed as a log line. The
//! renderer also keeps a small model of what the panel shows so the final
//! state can be reported when the scenario ends.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use homewind_ui::config::MAX_FANS;
use homewind_ui::{
    Backlight, CscVisual, Error, FanVisual, HrVisual, Renderer, Rotation, Screen, SlotVisual,
    SummarySlot,
};
use log::{debug, info, trace};

/// Format a color as `#rrggbb` (expanded from 5/6/5 bits).
fn rgb(color: Rgb565) -> String {
    format!(
        "#{:02x}{:02x}{:02x}",
        color.r() << 3 | color.r() >> 2,
        color.g() << 2 | color.g() >> 4,
        color.b() << 3 | color.b() >> 2,
    )
}

/// Renderer that logs every call.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    pub screen: Option<Screen>,
    pub rotation: Option<Rotation>,
    pub modal_visible: bool,
    pub fan_backgrounds: [Option<Rgb565>; MAX_FANS],
    pub draw_calls: u32,
}

impl Renderer for ConsoleRenderer {
    fn create_screen(&mut self, screen: Screen) {
        debug!("[panel] create {screen:?}");
    }

    fn load_screen(&mut self, screen: Screen) {
        self.screen = Some(screen);
        info!("[panel] show {screen:?}");
    }

    fn set_modal_visible(&mut self, visible: bool) {
        self.modal_visible = visible;
        info!("[panel] settings modal {}", if visible { "open" } else { "closed" });
    }

    fn apply_hr(&mut self, visual: &HrVisual) {
        self.draw_calls += 1;
        let value = visual.value.as_deref().unwrap_or("");
        info!(
            "[hr] {value:>3} {:?} {:?}",
            visual.icon,
            visual.caption.replace('\n', " / ")
        );
    }

    fn apply_csc(&mut self, visual: &CscVisual) {
        self.draw_calls += 1;
        info!("[csc] {:?} {} ({})", visual.icon, visual.name, visual.status);
    }

    fn apply_fan(&mut self, index: u8, visual: &FanVisual) {
        self.draw_calls += 1;
        if let Some(slot) = self.fan_backgrounds.get_mut(usize::from(index)) {
            *slot = Some(visual.background);
        }
        let text = visual.text.map_or("", |(t, _)| t);
        let knob = match visual.knob {
            Some(k) if k.trailing => "  o",
            Some(_) => "o  ",
            None => "   ",
        };
        info!(
            "[fan {index}] [{knob}] {text:<5} bg={}{}",
            rgb(visual.background),
            if visual.interactive { "" } else { " (inert)" }
        );
    }

    fn set_fan_background(&mut self, index: u8, color: Rgb565) {
        if let Some(slot) = self.fan_backgrounds.get_mut(usize::from(index)) {
            *slot = Some(color);
        }
        trace!("[fan {index}] fade bg={}", rgb(color));
    }

    fn fan_fade_started(&mut self, index: u8, from: Rgb565, to: Rgb565) {
        debug!("[fan {index}] fade {} -> {}", rgb(from), rgb(to));
    }

    fn apply_summary(&mut self, slot: SummarySlot, visual: &SlotVisual) {
        self.draw_calls += 1;
        info!("[summary] {slot:?}: {} icon={}", visual.text, rgb(visual.icon_color));
    }

    fn set_qr_code(&mut self, url: &str) {
        info!("[panel] QR code -> {url}");
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = Some(rotation);
        info!("[panel] rotate to {} degrees", rotation.degrees());
    }
}

/// Backlight that logs level changes.
#[derive(Debug, Default)]
pub struct ConsoleBacklight {
    pub level: u8,
    pub writes: u32,
}

impl Backlight for ConsoleBacklight {
    fn set_brightness(&mut self, level: u8) -> Result<(), Error> {
        self.writes += 1;
        if level.abs_diff(self.level) > 10 {
            info!("[backlight] {} -> {level}", self.level);
        } else {
            trace!("[backlight] {level}");
        }
        self.level = level;
        Ok(())
    }
}

//! The UI context: one object owning every piece of display state.
//!
//! [`HomeWind`] owns the sensor store, both render caches, the screen gate,
//! the power state machine, the breathing animator, the fan fades and the
//! deferred task queue. Every inbound operation is a method on it, and
//! the platform serializes access (the simulator wraps it in a UI lock).
//!
//! # Clock
//!
//! The context has no clock of its own. Operations that depend on time take
//! `now_ms` from a monotonic millisecond counter. The latest value seen is
//! remembered and used by the few operations that start time-based effects
//! without taking a timestamp (`set_fan_toggle`, `configure_breathing`).
//!
//! # Tick
//!
//! [`HomeWind::tick`] must be called periodically by the host (every frame,
//! or at least a few times per second). Each tick:
//!
//! 1. runs deferred tasks posted during earlier ticks
//! 2. polls inactivity every 500 ms
//! 3. advances the breathing animation and the fan fades
//!
//! # Screen Existence
//!
//! Until [`HomeWind::create_screens`] runs, the main screen does not exist.
//! Dimming, waking and rendering are then silent no-ops; the state they
//! would have displayed is still recorded and shown on the first refresh.

use heapless::String;
use log::{debug, info, warn};

use crate::animations::ColorTransition;
use crate::breathing::{BreathingAnimator, BreathingCurves, Ease};
use crate::config::{BRIGHTNESS_DIMMED, BRIGHTNESS_FULL, MAX_FANS, QR_URL_CAPACITY};
use crate::display::{Backlight, FanToggleHandler, Renderer};
use crate::orientation::Rotation;
use crate::power::{PowerAction, PowerState, PowerStateMachine};
use crate::render::{MainCache, SummaryCache};
use crate::scheduler::{Deferred, TaskQueue};
use crate::screens::{GateDecision, Screen, ScreenGate};
use crate::sensor_state::{CscState, FanState, HrState, SensorStore, bounded_str};
use crate::widgets::{SummarySlot, csc_visual, fan_fades, fan_visual, hr_visual, slot_visual};

/// Registered fan toggle observer.
pub type FanHandlerRef<'a> = &'a (dyn FanToggleHandler + Sync);

/// Display UI context.
pub struct HomeWind<'a, R, B> {
    renderer: R,
    backlight: B,

    sensors: SensorStore,
    main_cache: MainCache,
    summary_cache: SummaryCache,
    gate: ScreenGate,

    power: PowerStateMachine,
    breathing: BreathingAnimator,
    fades: ColorTransition,
    tasks: TaskQueue,

    fan_handler: Option<FanHandlerRef<'a>>,
    qr_url: String<QR_URL_CAPACITY>,

    screens_created: bool,
    powersave_screen_created: bool,
    clock_ms: u64,
}

impl<'a, R: Renderer, B: Backlight> HomeWind<'a, R, B> {
    /// Create the context. No screen exists and powersave is locked.
    pub fn new(renderer: R, backlight: B) -> Self {
        Self {
            renderer,
            backlight,
            sensors: SensorStore::new(),
            main_cache: MainCache::new(),
            summary_cache: SummaryCache::new(),
            gate: ScreenGate::new(),
            power: PowerStateMachine::new(),
            breathing: BreathingAnimator::new(BreathingCurves::default()),
            fades: ColorTransition::new(),
            tasks: TaskQueue::new(),
            fan_handler: None,
            qr_url: String::new(),
            screens_created: false,
            powersave_screen_created: false,
            clock_ms: 0,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub const fn backlight(&self) -> &B {
        &self.backlight
    }

    pub fn backlight_mut(&mut self) -> &mut B {
        &mut self.backlight
    }

    pub const fn sensors(&self) -> &SensorStore {
        &self.sensors
    }

    pub const fn power_state(&self) -> PowerState {
        self.power.state()
    }

    pub const fn is_locked(&self) -> bool {
        self.power.is_locked()
    }

    pub const fn is_transition_pending(&self) -> bool {
        self.power.is_transition_pending()
    }

    pub const fn last_activity(&self) -> u64 {
        self.power.last_activity()
    }

    pub const fn active_screen(&self) -> Option<Screen> {
        self.gate.active()
    }

    pub const fn is_modal_visible(&self) -> bool {
        self.gate.is_modal_visible()
    }

    pub const fn is_refresh_pending(&self) -> bool {
        self.gate.is_refresh_pending()
    }

    pub const fn is_breathing(&self) -> bool {
        self.breathing.is_running()
    }

    pub const fn breathing_curves(&self) -> BreathingCurves {
        self.breathing.curves()
    }

    pub fn is_fan_fading(&self, index: u8) -> bool {
        self.fades.is_fading(usize::from(index))
    }

    pub fn qr_code_url(&self) -> &str {
        &self.qr_url
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Build the Boot, AP and Main screens and show Boot. Idempotent.
    pub fn create_screens(&mut self) {
        if self.screens_created {
            return;
        }
        for screen in [Screen::Boot, Screen::Ap, Screen::Main] {
            self.renderer.create_screen(screen);
        }
        self.screens_created = true;
        self.load(Screen::Boot);
        info!("Screens created");
    }

    /// Start inactivity tracking at `now_ms` with full brightness. Idempotent.
    ///
    /// Powersave stays locked until the main screen is shown.
    pub fn powersave_init(&mut self, now_ms: u64) {
        if !self.screens_created || self.power.is_started() {
            return;
        }
        self.clock_ms = now_ms;
        self.power.start(now_ms);
        self.write_brightness(BRIGHTNESS_FULL);
        info!("Powersave initialized");
    }

    /// Advance timers, deferred work and animations to `now_ms`.
    pub fn tick(&mut self, now_ms: u64) {
        self.clock_ms = now_ms;

        // Only tasks queued before this tick
        for _ in 0..self.tasks.len() {
            match self.tasks.pop() {
                Some(Deferred::EnterSoftPowersave) => self.run_deferred_soft_powersave(now_ms),
                None => break,
            }
        }

        if self.power.poll_due(now_ms) {
            self.check_inactivity(now_ms);
        }

        self.breathing.tick(now_ms, &mut self.backlight);

        let changed = self.fades.update(now_ms);
        if changed != 0 {
            for i in 0..MAX_FANS {
                if changed & (1 << i) != 0 {
                    self.renderer.set_fan_background(i as u8, self.fades.current(i));
                }
            }
        }
    }

    // =========================================================================
    // Screens
    // =========================================================================

    /// Show the boot splash and suspend automatic power transitions.
    pub fn show_boot_screen(&mut self) {
        if !self.screens_created {
            return;
        }
        self.lock_powersave();
        self.load(Screen::Boot);
    }

    /// Show the provisioning screen and suspend automatic power transitions.
    pub fn show_ap_screen(&mut self) {
        if !self.screens_created {
            return;
        }
        self.lock_powersave();
        self.load(Screen::Ap);
    }

    /// Show the main screen, re-enable powersave and redraw every widget.
    ///
    /// The power state is left alone. Called during soft powersave, the main
    /// screen is loaded while the state stays `SoftPowersave` and breathing
    /// keeps driving the backlight. Use
    /// [`notify_user_activity`](Self::notify_user_activity) to wake the
    /// display.
    pub fn show_main_screen(&mut self) {
        if !self.screens_created {
            return;
        }
        self.load(Screen::Main);
        self.unlock_powersave();
        self.refresh_main_display();
    }

    /// Store the provisioning URL and update the QR code.
    ///
    /// Ignored before the screens exist. Long URLs are truncated.
    pub fn set_qr_code_url(&mut self, url: &str) {
        if !self.screens_created {
            return;
        }
        self.qr_url = bounded_str(url);
        self.renderer.set_qr_code(&self.qr_url);
    }

    /// Forward a committed rotation to the renderer.
    pub fn apply_rotation(&mut self, rotation: Rotation) {
        if !self.screens_created {
            return;
        }
        self.renderer.set_rotation(rotation);
        info!("Display rotated to {} degrees", rotation.degrees());
    }

    fn load(&mut self, screen: Screen) {
        self.renderer.load_screen(screen);
        self.gate.set_active(screen);
        debug!("Loaded {screen:?} screen");
    }

    // =========================================================================
    // Settings Modal
    // =========================================================================

    /// Open the settings modal over the main screen. Counts as activity.
    pub fn open_settings_modal(&mut self, now_ms: u64) {
        self.notify_user_activity(now_ms);
        if self.gate.active() != Some(Screen::Main) || self.gate.is_modal_visible() {
            return;
        }
        self.gate.open_modal();
        self.renderer.set_modal_visible(true);
    }

    /// Close the modal, redrawing everything if updates arrived meanwhile.
    pub fn close_settings_modal(&mut self) {
        if !self.gate.is_modal_visible() {
            return;
        }
        self.renderer.set_modal_visible(false);
        if self.gate.close_modal() {
            debug!("Applying updates deferred by the settings modal");
            self.refresh_main_display();
        }
    }

    /// Hide the modal without the deferred refresh.
    ///
    /// The caller is expected to run its own full refresh.
    pub fn hide_settings_modal(&mut self) {
        if !self.gate.is_modal_visible() {
            return;
        }
        self.renderer.set_modal_visible(false);
        self.gate.close_modal();
    }

    // =========================================================================
    // Power
    // =========================================================================

    /// Register a touch or button press at `now_ms`.
    ///
    /// Wakes the display from Dimmed or SoftPowersave. Waking from
    /// SoftPowersave also brings back the main screen and redraws it.
    pub fn notify_user_activity(&mut self, now_ms: u64) {
        self.clock_ms = now_ms;
        let Some(previous) = self.power.record_activity(now_ms) else {
            return;
        };

        let from_powersave = previous == PowerState::SoftPowersave;
        if from_powersave {
            self.breathing.stop();
            if self.screens_created {
                self.load(Screen::Main);
                self.hide_settings_modal();
            }
        }

        self.write_brightness(BRIGHTNESS_FULL);
        info!("Woke from {previous:?}");

        // State is already Active here, so the gate lets the refresh through
        if from_powersave {
            self.refresh_main_display();
        }
    }

    /// Suspend automatic transitions and return to full brightness.
    pub fn lock_powersave(&mut self) {
        if let Some(previous) = self.power.lock() {
            if previous == PowerState::SoftPowersave {
                self.breathing.stop();
            }
            self.write_brightness(BRIGHTNESS_FULL);
        }
        info!("Powersave locked");
    }

    pub fn unlock_powersave(&mut self) {
        self.power.unlock();
        info!("Powersave unlocked");
    }

    /// Change the breathing curves. A running cycle restarts immediately.
    pub fn configure_breathing(&mut self, inhale: Ease, exhale: Ease) {
        let curves = BreathingCurves::new(inhale, exhale);
        self.breathing.set_curves(curves, self.clock_ms, &mut self.backlight);
        info!("Breathing curves set to {inhale:?}/{exhale:?}");
    }

    fn check_inactivity(&mut self, now_ms: u64) {
        match self.power.poll(now_ms) {
            Some(PowerAction::Dim) => self.enter_dimmed(),
            Some(PowerAction::ScheduleSoftPowersave) => {
                if self.tasks.post(Deferred::EnterSoftPowersave) {
                    info!("Soft powersave scheduled");
                } else {
                    warn!("Task queue full, soft powersave retried on next poll");
                    self.power.cancel_pending();
                }
            }
            None => {}
        }
    }

    fn enter_dimmed(&mut self) {
        if !self.screens_created {
            return;
        }
        self.write_brightness(BRIGHTNESS_DIMMED);
        self.power.mark_dimmed();
        info!("Display dimmed");
    }

    fn run_deferred_soft_powersave(&mut self, now_ms: u64) {
        if self.power.take_deferred() {
            self.enter_soft_powersave(now_ms);
        } else {
            debug!("Deferred soft powersave dropped, state changed meanwhile");
        }
    }

    fn enter_soft_powersave(&mut self, now_ms: u64) {
        if !self.screens_created {
            return;
        }
        if !self.powersave_screen_created {
            self.renderer.create_screen(Screen::Powersave);
            self.powersave_screen_created = true;
        }

        // State first so the summary refresh below passes the gate
        self.power.mark_soft_powersave();
        // Starting the animator writes the minimum level right away
        self.breathing.start(now_ms, &mut self.backlight);
        self.load(Screen::Powersave);
        self.refresh_powersave_display();
        info!("Entered soft powersave");
    }

    fn write_brightness(&mut self, level: u8) {
        if let Err(e) = self.backlight.set_brightness(level) {
            warn!("Backlight write of {level} failed: {e}");
        }
    }

    // =========================================================================
    // Sensor Updates
    // =========================================================================

    /// Replace the heart rate record. `None` keeps the stored name.
    pub fn set_hr(&mut self, state: HrState, name: Option<&str>, value: u16) {
        if self.sensors.set_hr(state, name, value) {
            self.render_hr();
        }
    }

    pub fn set_hr_state(&mut self, state: HrState) {
        if self.sensors.set_hr_state(state) {
            self.render_hr();
        }
    }

    pub fn set_hr_value(&mut self, value: u16) {
        if self.sensors.set_hr_value(value) {
            self.render_hr();
        }
    }

    /// Replace the cadence record. `None` keeps the stored name.
    pub fn set_csc(&mut self, state: CscState, name: Option<&str>, cadence: u16) {
        if self.sensors.set_csc(state, name, cadence) {
            self.render_csc();
        }
    }

    pub fn set_csc_state(&mut self, state: CscState) {
        if self.sensors.set_csc_state(state) {
            self.render_csc();
        }
    }

    pub fn set_csc_cadence(&mut self, cadence: u16) {
        if self.sensors.set_csc_cadence(cadence) {
            self.render_csc();
        }
    }

    pub fn set_fan(&mut self, index: u8, state: FanState, is_on: bool) {
        if self.sensors.set_fan(index, state, is_on) {
            self.render_fan(index, false);
        }
    }

    pub fn set_fan_state(&mut self, index: u8, state: FanState) {
        if self.sensors.set_fan_state(index, state) {
            self.render_fan(index, false);
        }
    }

    /// Switch a fan on or off from the outside. The pill fades to its new color.
    pub fn set_fan_toggle(&mut self, index: u8, is_on: bool) {
        if self.sensors.set_fan_toggle(index, is_on) {
            self.render_fan(index, true);
        }
    }

    /// Install the fan toggle observer, replacing any previous one.
    pub fn register_fan_toggle_handler(&mut self, handler: FanHandlerRef<'a>) {
        self.fan_handler = Some(handler);
    }

    pub fn clear_fan_toggle_handler(&mut self) {
        self.fan_handler = None;
    }

    /// Handle a tap on fan pill `index` at `now_ms`.
    ///
    /// | Fan state | Effect |
    /// |-----------|--------|
    /// | NotConfigured, Inactive | none |
    /// | Error | handler called with `false`, no state change |
    /// | Active | `is_on` flipped, handler called, pill fades |
    pub fn tap_fan(&mut self, index: u8, now_ms: u64) {
        let pills_visible =
            self.gate.active() == Some(Screen::Main) && !self.gate.is_modal_visible();
        self.notify_user_activity(now_ms);
        if !pills_visible {
            return;
        }

        let Some(fan) = self.sensors.fan(index).copied() else {
            return;
        };
        match fan.state {
            FanState::NotConfigured | FanState::Inactive => {
                debug!("Tap on fan {index} ignored in {:?}", fan.state);
            }
            FanState::Error => self.emit_fan_toggle(index, false),
            FanState::Active => {
                if let Some(is_on) = self.sensors.toggle_fan(index) {
                    self.emit_fan_toggle(index, is_on);
                    self.render_fan(index, true);
                }
            }
        }
    }

    fn emit_fan_toggle(&self, index: u8, is_on: bool) {
        match self.fan_handler {
            Some(handler) => handler.on_fan_toggle(index, is_on),
            None => debug!("Fan {index} toggled with no handler registered"),
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Drop all main widget snapshots and redraw every widget.
    pub fn refresh_main_display(&mut self) {
        if !self.screens_created {
            return;
        }
        self.main_cache.invalidate_all();
        self.render_hr();
        self.render_csc();
        for index in 0..MAX_FANS as u8 {
            self.render_fan(index, false);
        }
    }

    /// Drop the summary snapshots and redraw the powersave summary.
    pub fn refresh_powersave_display(&mut self) {
        self.summary_cache.invalidate_all();
        self.update_powersave_summary();
    }

    /// Ask the gate whether main widgets may render right now.
    fn main_render_allowed(&mut self) -> bool {
        if !self.screens_created {
            return false;
        }
        match self.gate.check(self.power.state()) {
            GateDecision::Render => true,
            GateDecision::Summary => {
                self.update_powersave_summary();
                false
            }
            GateDecision::Pending => {
                debug!("Settings modal open, update deferred");
                false
            }
            GateDecision::Skip => false,
        }
    }

    fn render_hr(&mut self) {
        if !self.main_render_allowed() || !self.main_cache.hr.check_dirty(self.sensors.hr()) {
            return;
        }
        let visual = hr_visual(self.sensors.hr());
        debug!("HR widget -> {:?}", self.sensors.hr().state);
        self.renderer.apply_hr(&visual);
    }

    fn render_csc(&mut self) {
        if !self.main_render_allowed() || !self.main_cache.csc.check_dirty(self.sensors.csc()) {
            return;
        }
        let visual = csc_visual(self.sensors.csc());
        debug!("CSC widget -> {:?}", self.sensors.csc().state);
        self.renderer.apply_csc(&visual);
    }

    fn render_fan(&mut self, index: u8, animate: bool) {
        let Some(fan) = self.sensors.fan(index).copied() else {
            return;
        };
        let i = usize::from(index);
        if !self.main_render_allowed() || !self.main_cache.fans[i].check_dirty(&fan) {
            return;
        }

        let mut visual = fan_visual(&fan);
        if animate && fan_fades(&fan) && self.fades.start(i, visual.background, self.clock_ms) {
            // Draw from the displayed color, the fade takes it from here
            let from = self.fades.current(i);
            self.renderer.fan_fade_started(index, from, visual.background);
            visual.background = from;
        } else {
            self.fades.snap(i, visual.background);
        }
        debug!("Fan {index} pill -> {:?} on={}", fan.state, fan.is_on);
        self.renderer.apply_fan(index, &visual);
    }

    fn update_powersave_summary(&mut self) {
        if !self.powersave_screen_created || self.power.state() != PowerState::SoftPowersave {
            return;
        }
        for slot in SummarySlot::ALL {
            let visual = slot_visual(slot, &self.sensors);
            if self.summary_cache.slot_mut(slot).check_dirty(&visual) {
                self.renderer.apply_summary(slot, &visual);
            }
        }
    }
}

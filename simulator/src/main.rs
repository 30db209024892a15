//! HomeWind display simulator for the desktop.
//!
//! Drives the display UI layer the way the firmware does: a tick pump task,
//! an orientation task sampling a (simulated) accelerometer, a fan
//! controller answering toggle requests, and a scripted sensor feed. All of
//! them run on one embassy executor and share one UI lock. The panel is
//! replaced by log output.
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- --speed 4
//! ```
//!
//! Options: `--speed <n>` runs simulated time `n` times faster than wall
//! time, `--no-imu` starts without an accelerometer.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod console;
mod imu;
mod metrics;
mod scenario;
mod tasks;
mod timing;
mod ui_lock;

use core::sync::atomic::Ordering;

use anyhow::{Context, bail};
use embassy_executor::Executor;
use homewind_ui::HomeWind;
use log::{error, info};
use static_cell::StaticCell;

use crate::console::{ConsoleBacklight, ConsoleRenderer};
use crate::imu::SimulatedImu;
use crate::metrics::PumpMetrics;
use crate::tasks::{
    FAN_HANDLER, PUMP_METRICS, ROTATION_WAITS, fan_controller_task, orientation_task,
    tick_pump_task,
};
use crate::timing::SimClock;
use crate::ui_lock::{UiLock, Wait};

/// The UI context as wired in the simulator.
pub type SimUi = HomeWind<'static, ConsoleRenderer, ConsoleBacklight>;

static EXECUTOR: StaticCell<Executor> = StaticCell::new();
static UI: StaticCell<UiLock<SimUi>> = StaticCell::new();

struct Options {
    speed: u32,
    imu: bool,
}

fn parse_args() -> anyhow::Result<Options> {
    let mut options = Options { speed: 1, imu: true };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--speed" => {
                let value = args.next().context("--speed needs a value")?;
                options.speed = value
                    .parse()
                    .with_context(|| format!("invalid --speed value {value:?}"))?;
                if options.speed == 0 {
                    bail!("--speed must be at least 1");
                }
            }
            "--no-imu" => options.imu = false,
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(options)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = parse_args()?;
    let clock = SimClock::new(options.speed);
    info!("HomeWind simulator started (speed x{})", options.speed);

    let mut ui: SimUi = HomeWind::new(ConsoleRenderer::default(), ConsoleBacklight::default());
    ui.create_screens();
    ui.powersave_init(clock.now_ms());
    ui.register_fan_toggle_handler(&FAN_HANDLER);
    let ui: &'static UiLock<SimUi> = UI.init(UiLock::new(ui));
    let imu = SimulatedImu::new(clock, options.imu);

    let executor = EXECUTOR.init(Executor::new());
    executor.run(move |spawner| {
        if let Err(e) = spawner.spawn(tick_pump_task(ui, clock)) {
            error!("Failed to spawn tick pump: {e:?}");
        }
        if let Err(e) = spawner.spawn(orientation_task(ui, clock, imu)) {
            error!("Failed to spawn orientation task: {e:?}");
        }
        if let Err(e) = spawner.spawn(fan_controller_task(ui, clock)) {
            error!("Failed to spawn fan controller: {e:?}");
        }
        if let Err(e) = spawner.spawn(scenario_task(ui, clock)) {
            error!("Failed to spawn scenario: {e:?}");
        }
    })
}

/// Play the script, print the report and end the process.
#[embassy_executor::task]
async fn scenario_task(ui: &'static UiLock<SimUi>, clock: SimClock) {
    for &(at_ms, action) in scenario::SCRIPT {
        clock.sleep_until(at_ms).await;
        if let Ok(mut guard) = ui.lock(Wait::Forever).await {
            scenario::apply(&mut guard, action, clock.now_ms());
        }
    }
    clock.sleep_until(scenario::END_MS).await;

    let metrics = PUMP_METRICS.lock().await;
    if let Ok(guard) = ui.lock(Wait::Forever).await {
        report(&guard, &metrics, ROTATION_WAITS.load(Ordering::Relaxed));
    }
    std::process::exit(0);
}

fn report(ui: &SimUi, metrics: &PumpMetrics, rotation_waits: u32) {
    info!("Session finished after {}", metrics.uptime_string());
    info!(
        "Tick pump: {} pumps, hold avg {} us (min {} / max {}), max lock wait {} us",
        metrics.total_pumps,
        metrics.hold_time_avg_us(),
        metrics.hold_time_min_us,
        metrics.hold_time_max_us,
        metrics.wait_time_max_us,
    );
    info!("Rotation waits on the UI lock: {rotation_waits}");

    let panel = ui.renderer();
    info!(
        "Panel: screen {:?}, rotation {:?}, modal {}, {} widget draws",
        panel.screen,
        panel.rotation,
        if panel.modal_visible { "open" } else { "closed" },
        panel.draw_calls
    );
    info!(
        "Power: {:?}, backlight {} after {} writes",
        ui.power_state(),
        ui.backlight().level,
        ui.backlight().writes
    );
}

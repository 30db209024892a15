//! Fan controller task.
//!
//! Stands in for the BLE fan controller. Switch requests made on the touch
//! screen arrive over [`FAN_REQUESTS`] and are answered after
//! [`FAN_CONTROLLER_LATENCY_MS`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use homewind_ui::FanState;
use log::{info, warn};

use crate::SimUi;
use crate::timing::{FAN_CONTROLLER_LATENCY_MS, SimClock};
use crate::ui_lock::{UiLock, Wait};

const FAN_REQUEST_DEPTH: usize = 4;

/// Pending switch requests as `(fan index, requested state)`.
pub static FAN_REQUESTS: Channel<CriticalSectionRawMutex, (u8, bool), FAN_REQUEST_DEPTH> =
    Channel::new();

/// Handler registered with the UI context.
pub static FAN_HANDLER: fn(u8, bool) = request_fan_toggle;

fn request_fan_toggle(index: u8, is_on: bool) {
    if FAN_REQUESTS.try_send((index, is_on)).is_err() {
        warn!("Fan request queue full, request for fan {index} dropped");
    }
}

#[embassy_executor::task]
pub async fn fan_controller_task(ui: &'static UiLock<SimUi>, clock: SimClock) {
    loop {
        let (index, is_on) = FAN_REQUESTS.receive().await;
        info!("Fan controller: fan {index} -> {}", if is_on { "on" } else { "off" });
        clock.sleep_ms(FAN_CONTROLLER_LATENCY_MS).await;

        if let Ok(mut guard) = ui.lock(Wait::Forever).await {
            answer(&mut guard, index, is_on);
        }
    }
}

/// Active fans confirm the requested state. A request for a fan in the
/// error state makes the controller reconnect it, switched off.
fn answer(ui: &mut SimUi, index: u8, is_on: bool) {
    match ui.sensors().fan(index).map(|f| f.state) {
        Some(FanState::Error) => {
            info!("Fan controller: fan {index} reconnected");
            ui.set_fan_state(index, FanState::Active);
        }
        Some(FanState::Active) => ui.set_fan_toggle(index, is_on),
        _ => {}
    }
}

//! Tick pump task.
//!
//! Pumps the UI context every [`FRAME_TIME`]. The UI lock is held for one
//! tick and released before the frame timer.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Instant, Timer};
use log::{debug, info, warn};

use crate::SimUi;
use crate::metrics::PumpMetrics;
use crate::timing::{FRAME_TIME, PUMP_REPORT_INTERVAL, SimClock};
use crate::ui_lock::{UiLock, Wait};

/// Statistics of the tick pump, read by the final report.
pub static PUMP_METRICS: Mutex<CriticalSectionRawMutex, PumpMetrics> =
    Mutex::new(PumpMetrics::new());

#[embassy_executor::task]
pub async fn tick_pump_task(ui: &'static UiLock<SimUi>, clock: SimClock) {
    info!("Tick pump started");

    loop {
        let wait_start = Instant::now();
        match ui.lock(Wait::Forever).await {
            Ok(mut guard) => {
                let hold_start = Instant::now();
                guard.tick(clock.now_ms());
                drop(guard);

                let mut metrics = PUMP_METRICS.lock().await;
                metrics.record_pump(hold_start - wait_start, hold_start.elapsed());
                if metrics.total_pumps % PUMP_REPORT_INTERVAL == 0 {
                    debug!(
                        "Pump #{}: waited {} us, held {} us (avg {} us)",
                        metrics.total_pumps,
                        metrics.wait_time_us,
                        metrics.hold_time_us,
                        metrics.hold_time_avg_us()
                    );
                }
            }
            Err(e) => warn!("Tick skipped: {e}"),
        }

        Timer::after(FRAME_TIME).await;
    }
}

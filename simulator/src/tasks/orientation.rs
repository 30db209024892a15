//! Orientation task.
//!
//! Samples the accelerometer every [`IMU_SAMPLE_INTERVAL_MS`] and rotates
//! the panel when the tilt is stable. The UI lock is only waited for up to
//! [`IMU_LOCK_WAIT_MS`]. A busy lock leaves the candidate uncommitted so
//! the next sample proposes it again.

use core::sync::atomic::{AtomicU32, Ordering};

use homewind_ui::config::{IMU_SAMPLE_INTERVAL_MS, IMU_STARTUP_DELAY_MS};
use homewind_ui::{Accelerometer, Error, Orientation, Rotation};
use log::{debug, info};

use crate::SimUi;
use crate::imu::SimulatedImu;
use crate::timing::{IMU_LOCK_WAIT_MS, SimClock};
use crate::ui_lock::{UiLock, Wait};

/// Samples whose rotation had to wait for the UI lock.
pub static ROTATION_WAITS: AtomicU32 = AtomicU32::new(0);

#[embassy_executor::task]
pub async fn orientation_task(ui: &'static UiLock<SimUi>, clock: SimClock, mut imu: SimulatedImu) {
    let mut orientation = Orientation::new();
    if !orientation.start(&mut imu) {
        return;
    }

    clock.sleep_ms(IMU_STARTUP_DELAY_MS).await;
    info!("Orientation sampling started");

    loop {
        if let Err(e) = orientation_step(ui, &mut orientation, &mut imu).await {
            debug!("Rotation deferred: {e}");
            ROTATION_WAITS.fetch_add(1, Ordering::Relaxed);
        }
        clock.sleep_ms(IMU_SAMPLE_INTERVAL_MS).await;
    }
}

/// Take one sample and apply a proposed rotation.
///
/// Returns the rotation committed by this step, if any.
pub async fn orientation_step(
    ui: &UiLock<SimUi>,
    orientation: &mut Orientation,
    imu: &mut impl Accelerometer,
) -> Result<Option<Rotation>, Error> {
    let Some(rotation) = orientation.sample(imu) else {
        return Ok(None);
    };

    let mut guard = ui.lock(Wait::Bounded(IMU_LOCK_WAIT_MS)).await?;
    guard.apply_rotation(rotation);
    drop(guard);

    orientation.commit(rotation);
    Ok(Some(rotation))
}

//! The UI lock shared by the scenario, the tick pump and the worker tasks.
//!
//! Every task that touches the [`HomeWind`](homewind_ui::HomeWind) context
//! goes through this lock. The tick pump holds it only while pumping a single
//! tick, never across a timer.
//!
//! Callers that must not stall (the orientation task) ask for a bounded
//! wait and treat [`Error::LockTimeout`] as "try again next cycle".

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{Duration, with_timeout};
use homewind_ui::Error;

/// How long [`UiLock::lock`] may wait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wait {
    /// Block until the lock is free.
    Forever,
    /// Give up after this many milliseconds.
    Bounded(u32),
}

pub type UiGuard<'a, T> = MutexGuard<'a, CriticalSectionRawMutex, T>;

pub struct UiLock<T> {
    inner: Mutex<CriticalSectionRawMutex, T>,
}

impl<T> UiLock<T> {
    pub const fn new(value: T) -> Self {
        Self { inner: Mutex::new(value) }
    }

    /// Acquire the lock.
    pub async fn lock(&self, wait: Wait) -> Result<UiGuard<'_, T>, Error> {
        match wait {
            Wait::Forever => Ok(self.inner.lock().await),
            Wait::Bounded(ms) => {
                let timeout = Duration::from_millis(u64::from(ms));
                with_timeout(timeout, self.inner.lock())
                    .await
                    .map_err(|_| Error::LockTimeout(ms))
            }
        }
    }
}

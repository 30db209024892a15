//! Tick pump statistics.
//!
//! Tracks how long each pump waited for the UI lock and how long it held
//! it, so contention between the pump, the scenario and the worker tasks
//! shows up in the log and the final report.

use embassy_time::{Duration, Instant};

/// Lock wait and hold times of the tick pump.
pub struct PumpMetrics {
    // Last pump (microseconds)
    pub wait_time_us: u32,
    pub hold_time_us: u32,

    // Statistics
    pub hold_time_min_us: u32,
    pub hold_time_max_us: u32,
    hold_time_avg_us: f32,
    pub wait_time_max_us: u32,

    // Counters
    pub total_pumps: u64,
}

impl PumpMetrics {
    const EMA_ALPHA: f32 = 0.1;

    pub const fn new() -> Self {
        Self {
            wait_time_us: 0,
            hold_time_us: 0,
            hold_time_min_us: u32::MAX,
            hold_time_max_us: 0,
            hold_time_avg_us: 0.0,
            wait_time_max_us: 0,
            total_pumps: 0,
        }
    }

    /// Record one pump.
    pub fn record_pump(&mut self, wait_time: Duration, hold_time: Duration) {
        let wait_us = wait_time.as_micros() as u32;
        let hold_us = hold_time.as_micros() as u32;

        self.wait_time_us = wait_us;
        self.hold_time_us = hold_us;

        self.hold_time_min_us = self.hold_time_min_us.min(hold_us);
        self.hold_time_max_us = self.hold_time_max_us.max(hold_us);
        self.wait_time_max_us = self.wait_time_max_us.max(wait_us);

        if self.total_pumps == 0 {
            self.hold_time_avg_us = hold_us as f32;
        } else {
            let previous = (1.0 - Self::EMA_ALPHA) * self.hold_time_avg_us;
            self.hold_time_avg_us = Self::EMA_ALPHA.mul_add(hold_us as f32, previous);
        }

        self.total_pumps += 1;
    }

    #[inline]
    pub const fn hold_time_avg_us(&self) -> u32 {
        self.hold_time_avg_us as u32
    }

    /// Uptime of the time driver as HH:MM:SS.
    pub fn uptime_string(&self) -> String {
        format_hms(Instant::now().as_secs())
    }
}

impl Default for PumpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn format_hms(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

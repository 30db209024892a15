//! Render cache tracking for skipping redundant widget updates.
//!
//! Each widget keeps a snapshot of the record it last pushed to the
//! renderer. A render is skipped when the widget is initialized and the
//! snapshot equals the current record. Style and text calls on the
//! retained-mode toolkit are expensive, so even a full refresh pass only
//! touches widgets whose content actually differs.
//!
//! # Invalidation
//!
//! | Event | Cache affected |
//! |-------|----------------|
//! | Settings modal closes with pending updates | Main widgets |
//! | Main screen shown again after soft powersave | Main widgets |
//! | Explicit `refresh_main_display` | Main widgets |
//! | Soft powersave entered / `refresh_powersave_display` | Summary slots |
//!
//! Invalidation only clears the `initialized` flag, so the next render of
//! each widget always reaches the renderer.

use crate::config::MAX_FANS;
use crate::sensor_state::{CscSensor, FanSlot, HrSensor};
use crate::widgets::{SlotVisual, SummarySlot};

// =============================================================================
// Per-widget Snapshot
// =============================================================================

/// Last rendered snapshot of a single widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetCache<T> {
    last: Option<T>,
}

impl<T: Clone + PartialEq> WidgetCache<T> {
    /// Empty cache. The first check always reports dirty.
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Whether the widget has been rendered since the last invalidation.
    #[inline]
    pub const fn is_initialized(&self) -> bool {
        self.last.is_some()
    }

    /// Compare `current` against the snapshot and store it when different.
    ///
    /// Returns `true` when the caller must render.
    pub fn check_dirty(&mut self, current: &T) -> bool {
        if self.last.as_ref() == Some(current) {
            return false;
        }
        self.last = Some(current.clone());
        true
    }

    /// Force the next [`check_dirty`](Self::check_dirty) to report dirty.
    #[inline]
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}

impl<T: Clone + PartialEq> Default for WidgetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Main Screen
// =============================================================================

/// Snapshots for every widget on the main screen.
#[derive(Debug, Clone)]
pub struct MainCache {
    pub hr: WidgetCache<HrSensor>,
    pub csc: WidgetCache<CscSensor>,
    pub fans: [WidgetCache<FanSlot>; MAX_FANS],
}

impl MainCache {
    pub const fn new() -> Self {
        Self {
            hr: WidgetCache::new(),
            csc: WidgetCache::new(),
            fans: [const { WidgetCache::new() }; MAX_FANS],
        }
    }

    /// Drop every snapshot so the next pass re-renders all widgets.
    pub fn invalidate_all(&mut self) {
        self.hr.invalidate();
        self.csc.invalidate();
        for fan in &mut self.fans {
            fan.invalidate();
        }
    }
}

impl Default for MainCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Powersave Summary
// =============================================================================

/// Snapshots for the three slots of the powersave summary screen.
#[derive(Debug, Clone)]
pub struct SummaryCache {
    pub heart_rate: WidgetCache<SlotVisual>,
    pub cadence: WidgetCache<SlotVisual>,
    pub fans: WidgetCache<SlotVisual>,
}

impl SummaryCache {
    pub const fn new() -> Self {
        Self {
            heart_rate: WidgetCache::new(),
            cadence: WidgetCache::new(),
            fans: WidgetCache::new(),
        }
    }

    /// Cache for one summary slot.
    pub fn slot_mut(&mut self, slot: SummarySlot) -> &mut WidgetCache<SlotVisual> {
        match slot {
            SummarySlot::HeartRate => &mut self.heart_rate,
            SummarySlot::Cadence => &mut self.cadence,
            SummarySlot::Fans => &mut self.fans,
        }
    }

    pub fn invalidate_all(&mut self) {
        self.heart_rate.invalidate();
        self.cadence.invalidate();
        self.fans.invalidate();
    }
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor_state::{FanState, HrState};

    #[test]
    fn test_first_check_is_dirty() {
        let mut cache: WidgetCache<u16> = WidgetCache::new();
        assert!(!cache.is_initialized());
        assert!(cache.check_dirty(&0));
        assert!(cache.is_initialized());
    }

    #[test]
    fn test_same_value_is_clean() {
        let mut cache = WidgetCache::new();
        assert!(cache.check_dirty(&42_u16));
        assert!(!cache.check_dirty(&42));
        assert!(cache.check_dirty(&43));
    }

    #[test]
    fn test_invalidate_forces_render() {
        let mut cache = WidgetCache::new();
        cache.check_dirty(&7_u8);
        cache.invalidate();
        assert!(cache.check_dirty(&7));
    }

    #[test]
    fn test_hr_snapshot_compares_name() {
        let mut cache = WidgetCache::new();
        let mut hr = HrSensor {
            state: HrState::Active,
            value: 80,
            ..HrSensor::default()
        };
        assert!(cache.check_dirty(&hr));
        hr.name = crate::sensor_state::bounded_name("Strap");
        assert!(cache.check_dirty(&hr));
    }

    #[test]
    fn test_main_cache_invalidate_all() {
        let mut cache = MainCache::new();
        let fan = FanSlot::new(FanState::Active, true);
        for slot in &mut cache.fans {
            slot.check_dirty(&fan);
        }
        cache.hr.check_dirty(&HrSensor::default());
        cache.csc.check_dirty(&CscSensor::default());

        cache.invalidate_all();
        assert!(!cache.hr.is_initialized());
        assert!(!cache.csc.is_initialized());
        assert!(cache.fans.iter().all(|f| !f.is_initialized()));
    }
}

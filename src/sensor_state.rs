//! Current sensor values shown by the UI widgets.
//!
//! The store is a plain data holder: it knows nothing about rendering, it
//! only records the latest state pushed by the sensor subsystems and reports
//! whether a setter actually changed anything. The UI context uses that
//! return value to skip redundant render passes.
//!
//! # Fan Invariant
//!
//! `is_on` is only meaningful for an [`FanState::Active`] fan. Every setter
//! forces it to `false` for the other states, so comparisons between two
//! [`FanSlot`] values never disagree on a field that has no visual effect.

use heapless::String;

use crate::config::{MAX_FANS, SENSOR_NAME_CAPACITY};

/// Bounded sensor name. Longer names are truncated on a char boundary.
pub type SensorName = String<SENSOR_NAME_CAPACITY>;

/// Name shown by the cadence widget until the sensor reports its own.
pub const DEFAULT_CSC_NAME: &str = "CSC Sensor";

// =============================================================================
// Widget States
// =============================================================================

/// Connection state of the heart rate strap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HrState {
    /// No strap has been paired.
    #[default]
    NotConfigured,
    /// Paired but not currently connected.
    Inactive,
    /// Connected and streaming.
    Active,
}

/// Connection state of the speed/cadence sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CscState {
    #[default]
    NotConfigured,
    Inactive,
    Active,
}

/// State of one fan controller slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FanState {
    /// No fan is assigned to this slot.
    #[default]
    NotConfigured,
    /// Fan is known but unreachable.
    Inactive,
    /// Fan reported a fault.
    Error,
    /// Fan is reachable and can be switched.
    Active,
}

// =============================================================================
// Records
// =============================================================================

/// Heart rate widget record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HrSensor {
    pub state: HrState,
    /// Beats per minute, 0 when unknown.
    pub value: u16,
    /// Device name, empty when the strap did not report one.
    pub name: SensorName,
}

/// Cadence widget record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CscSensor {
    pub state: CscState,
    /// Crank revolutions per minute.
    pub cadence: u16,
    pub name: SensorName,
}

impl Default for CscSensor {
    fn default() -> Self {
        Self {
            state: CscState::NotConfigured,
            cadence: 0,
            name: bounded_name(DEFAULT_CSC_NAME),
        }
    }
}

/// One fan pill record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FanSlot {
    pub state: FanState,
    pub is_on: bool,
}

impl FanSlot {
    /// Build a slot, dropping `is_on` for states that cannot be switched.
    #[inline]
    pub const fn new(state: FanState, is_on: bool) -> Self {
        Self {
            state,
            is_on: is_on && matches!(state, FanState::Active),
        }
    }

    /// Whether the fan is currently switched on.
    #[inline]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, FanState::Active) && self.is_on
    }
}

/// Copy `text` into a string of capacity `N`, truncating at the last whole char.
pub fn bounded_str<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// Copy `name` into a [`SensorName`].
#[inline]
pub fn bounded_name(name: &str) -> SensorName {
    bounded_str(name)
}

// =============================================================================
// Store
// =============================================================================

/// Latest sensor values for every widget on the main screen.
///
/// All setters return `true` when the stored record changed.
#[derive(Debug, Clone, Default)]
pub struct SensorStore {
    hr: HrSensor,
    csc: CscSensor,
    fans: [FanSlot; MAX_FANS],
}

impl SensorStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn hr(&self) -> &HrSensor {
        &self.hr
    }

    #[inline]
    pub const fn csc(&self) -> &CscSensor {
        &self.csc
    }

    /// Fan slot at `index`, or `None` when out of range.
    #[inline]
    pub fn fan(&self, index: u8) -> Option<&FanSlot> {
        self.fans.get(usize::from(index))
    }

    /// All fan slots in display order.
    #[inline]
    pub const fn fans(&self) -> &[FanSlot; MAX_FANS] {
        &self.fans
    }

    // -------------------------------------------------------------------------
    // Heart rate
    // -------------------------------------------------------------------------

    /// Replace the whole HR record. A `None` name keeps the stored one.
    pub fn set_hr(&mut self, state: HrState, name: Option<&str>, value: u16) -> bool {
        let mut next = self.hr.clone();
        next.state = state;
        next.value = value;
        if let Some(name) = name {
            next.name = bounded_name(name);
        }
        replace_if_changed(&mut self.hr, next)
    }

    pub fn set_hr_state(&mut self, state: HrState) -> bool {
        replace_if_changed(&mut self.hr.state, state)
    }

    pub fn set_hr_value(&mut self, value: u16) -> bool {
        replace_if_changed(&mut self.hr.value, value)
    }

    // -------------------------------------------------------------------------
    // Cadence
    // -------------------------------------------------------------------------

    /// Replace the whole CSC record. A `None` name keeps the stored one.
    pub fn set_csc(&mut self, state: CscState, name: Option<&str>, cadence: u16) -> bool {
        let mut next = self.csc.clone();
        next.state = state;
        next.cadence = cadence;
        if let Some(name) = name {
            next.name = bounded_name(name);
        }
        replace_if_changed(&mut self.csc, next)
    }

    pub fn set_csc_state(&mut self, state: CscState) -> bool {
        replace_if_changed(&mut self.csc.state, state)
    }

    pub fn set_csc_cadence(&mut self, cadence: u16) -> bool {
        replace_if_changed(&mut self.csc.cadence, cadence)
    }

    // -------------------------------------------------------------------------
    // Fans
    // -------------------------------------------------------------------------

    pub fn set_fan(&mut self, index: u8, state: FanState, is_on: bool) -> bool {
        self.update_fan(index, |_| FanSlot::new(state, is_on))
    }

    /// Change the fan state. The on/off flag survives only while the fan stays active.
    pub fn set_fan_state(&mut self, index: u8, state: FanState) -> bool {
        self.update_fan(index, |slot| FanSlot::new(state, slot.is_on))
    }

    /// Change the on/off flag. Ignored unless the fan is active.
    pub fn set_fan_toggle(&mut self, index: u8, is_on: bool) -> bool {
        self.update_fan(index, |slot| FanSlot::new(slot.state, is_on))
    }

    /// Flip the on/off flag of an active fan and return the new value.
    pub fn toggle_fan(&mut self, index: u8) -> Option<bool> {
        let slot = self.fans.get_mut(usize::from(index))?;
        if slot.state != FanState::Active {
            return None;
        }
        slot.is_on = !slot.is_on;
        Some(slot.is_on)
    }

    /// Number of fan slots with a fan assigned.
    pub fn configured_fans(&self) -> u8 {
        self.fans
            .iter()
            .filter(|f| f.state != FanState::NotConfigured)
            .count() as u8
    }

    /// Number of fans currently switched on.
    pub fn running_fans(&self) -> u8 {
        self.fans.iter().filter(|f| f.is_running()).count() as u8
    }

    fn update_fan(&mut self, index: u8, f: impl FnOnce(&FanSlot) -> FanSlot) -> bool {
        let Some(slot) = self.fans.get_mut(usize::from(index)) else {
            return false;
        };
        let next = f(slot);
        replace_if_changed(slot, next)
    }
}

#[inline]
fn replace_if_changed<T: PartialEq>(slot: &mut T, next: T) -> bool {
    if *slot == next {
        false
    } else {
        *slot = next;
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

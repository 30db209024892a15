//! Inactivity-driven power states of the display.
//!
//! # States
//!
//! ```text
//!            idle > 8 s              idle > 20 s (deferred)
//!  Active ───────────────▶ Dimmed ───────────────────────▶ SoftPowersave
//!    ▲                       │                                  │
//!    └───────── user activity┴──────────────────────────────────┘
//! ```
//!
//! This module holds only the bookkeeping: timestamps, the lock and the
//! pending flag. It decides *what* should happen and the UI context carries
//! out the effects (backlight writes, screen loads, breathing). Keeping the
//! decision logic free of collaborators makes every timing rule testable
//! with plain integers.
//!
//! # Lock
//!
//! While the Boot or AP screen owns the panel the machine is locked: each
//! poll refreshes the activity timestamp and no automatic transition
//! happens. The machine starts locked.
//!
//! # Deferred Soft Powersave
//!
//! Entering soft powersave loads a screen and starts an animation, which
//! must not happen from inside the inactivity check. The poll only
//! requests it ([`PowerAction::ScheduleSoftPowersave`]) and sets a pending
//! flag that blocks duplicate requests. When the deferred task runs,
//! [`PowerStateMachine::take_deferred`] re-validates the request against
//! the state at that moment.

use crate::config::{DIM_TIMEOUT_MS, INACTIVITY_POLL_MS, SOFT_TIMEOUT_MS};

/// Display power state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Full brightness, main screen.
    #[default]
    Active,
    /// Reduced brightness, main screen.
    Dimmed,
    /// Powersave summary screen with breathing backlight.
    SoftPowersave,
}

/// Transition requested by an inactivity poll.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerAction {
    /// Dim the backlight now.
    Dim,
    /// Post a deferred soft powersave transition.
    ScheduleSoftPowersave,
}

/// Power state bookkeeping.
#[derive(Clone, Debug)]
pub struct PowerStateMachine {
    state: PowerState,
    last_activity_ms: u64,
    locked: bool,
    transition_pending: bool,
    next_poll_ms: Option<u64>,
}

impl PowerStateMachine {
    /// Active and locked, inactivity polling not yet started.
    pub const fn new() -> Self {
        Self {
            state: PowerState::Active,
            last_activity_ms: 0,
            locked: true,
            transition_pending: false,
            next_poll_ms: None,
        }
    }

    #[inline]
    pub const fn state(&self) -> PowerState {
        self.state
    }

    #[inline]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Whether a deferred soft powersave transition is queued.
    #[inline]
    pub const fn is_transition_pending(&self) -> bool {
        self.transition_pending
    }

    #[inline]
    pub const fn last_activity(&self) -> u64 {
        self.last_activity_ms
    }

    /// Whether [`start`](Self::start) has run.
    #[inline]
    pub const fn is_started(&self) -> bool {
        self.next_poll_ms.is_some()
    }

    /// Begin inactivity polling with `now_ms` as the last activity.
    pub fn start(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
        self.next_poll_ms = Some(now_ms + INACTIVITY_POLL_MS);
    }

    /// Whether a poll is due at `now_ms`. Advances the poll schedule.
    ///
    /// Late ticks run a single poll and resynchronize rather than
    /// replaying every missed interval.
    pub fn poll_due(&mut self, now_ms: u64) -> bool {
        match self.next_poll_ms {
            Some(due) if now_ms >= due => {
                self.next_poll_ms = Some(now_ms + INACTIVITY_POLL_MS);
                true
            }
            _ => false,
        }
    }

    /// Evaluate inactivity at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Option<PowerAction> {
        if self.locked {
            self.last_activity_ms = now_ms;
            return None;
        }

        let idle = now_ms.saturating_sub(self.last_activity_ms);
        match self.state {
            PowerState::Active if idle > DIM_TIMEOUT_MS => Some(PowerAction::Dim),
            PowerState::Dimmed if idle > SOFT_TIMEOUT_MS && !self.transition_pending => {
                self.transition_pending = true;
                Some(PowerAction::ScheduleSoftPowersave)
            }
            _ => None,
        }
    }

    /// Record user activity and return to Active.
    ///
    /// Returns the state the machine woke from, or `None` if it was
    /// already active.
    pub fn record_activity(&mut self, now_ms: u64) -> Option<PowerState> {
        self.last_activity_ms = now_ms;
        self.wake()
    }

    /// Consume the pending flag when the deferred task runs.
    ///
    /// Returns `true` if soft powersave should still be entered.
    pub fn take_deferred(&mut self) -> bool {
        self.transition_pending = false;
        !self.locked && self.state == PowerState::Dimmed
    }

    /// Drop a request that could not be queued.
    pub fn cancel_pending(&mut self) {
        self.transition_pending = false;
    }

    pub fn mark_dimmed(&mut self) {
        self.state = PowerState::Dimmed;
    }

    pub fn mark_soft_powersave(&mut self) {
        self.state = PowerState::SoftPowersave;
    }

    /// Suppress automatic transitions and return to Active.
    ///
    /// Returns the state left, as for [`record_activity`](Self::record_activity).
    pub fn lock(&mut self) -> Option<PowerState> {
        self.locked = true;
        self.wake()
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    fn wake(&mut self) -> Option<PowerState> {
        if self.state == PowerState::Active {
            return None;
        }
        let previous = self.state;
        self.state = PowerState::Active;
        Some(previous)
    }
}

impl Default for PowerStateMachine {
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

    fn unlocked_at(now: u64) -> PowerStateMachine {
        let mut psm = PowerStateMachine::new();
        psm.start(now);
        psm.unlock();
        psm
    }

    #[test]
    fn test_initial_state() {
        let psm = PowerStateMachine::new();
        assert_eq!(psm.state(), PowerState::Active);
        assert!(psm.is_locked());
        assert!(!psm.is_transition_pending());
        assert!(!psm.is_started());
    }

    #[test]
    fn test_poll_cadence() {
        let mut psm = PowerStateMachine::new();
        assert!(!psm.poll_due(10_000), "not started");
        psm.start(1_000);
        assert!(!psm.poll_due(1_499));
        assert!(psm.poll_due(1_500));
        assert!(!psm.poll_due(1_600));
        assert!(psm.poll_due(2_000));
    }

    #[test]
    fn test_poll_resyncs_after_late_tick() {
        let mut psm = PowerStateMachine::new();
        psm.start(0);
        assert!(psm.poll_due(5_000));
        assert!(!psm.poll_due(5_100));
        assert!(psm.poll_due(5_500));
    }

    #[test]
    fn test_dim_threshold_is_strict() {
        let mut psm = unlocked_at(0);
        assert_eq!(psm.poll(DIM_TIMEOUT_MS), None);
        assert_eq!(psm.poll(DIM_TIMEOUT_MS + 1), Some(PowerAction::Dim));
    }

    #[test]
    fn test_soft_powersave_requested_once() {
        let mut psm = unlocked_at(0);
        psm.mark_dimmed();
        assert_eq!(psm.poll(SOFT_TIMEOUT_MS), None);
        assert_eq!(psm.poll(SOFT_TIMEOUT_MS + 1), Some(PowerAction::ScheduleSoftPowersave));
        assert!(psm.is_transition_pending());
        assert_eq!(psm.poll(SOFT_TIMEOUT_MS + 500), None);
    }

    #[test]
    fn test_deferred_valid_when_still_dimmed() {
        let mut psm = unlocked_at(0);
        psm.mark_dimmed();
        psm.poll(SOFT_TIMEOUT_MS + 1);
        assert!(psm.take_deferred());
        assert!(!psm.is_transition_pending());
    }

    #[test]
    fn test_deferred_dropped_after_activity() {
        let mut psm = unlocked_at(0);
        psm.mark_dimmed();
        psm.poll(SOFT_TIMEOUT_MS + 1);
        assert_eq!(psm.record_activity(SOFT_TIMEOUT_MS + 2), Some(PowerState::Dimmed));
        assert!(!psm.take_deferred());
        assert!(!psm.is_transition_pending());
        assert_eq!(psm.state(), PowerState::Active);
    }

    #[test]
    fn test_deferred_dropped_when_locked() {
        let mut psm = unlocked_at(0);
        psm.mark_dimmed();
        psm.poll(SOFT_TIMEOUT_MS + 1);
        psm.locked = true;
        assert!(!psm.take_deferred());
    }

    #[test]
    fn test_locked_refreshes_activity() {
        let mut psm = PowerStateMachine::new();
        psm.start(0);
        for now in (0..100_000).step_by(500) {
            assert_eq!(psm.poll(now), None);
        }
        assert_eq!(psm.last_activity(), 99_500);
        assert_eq!(psm.state(), PowerState::Active);

        // Unlocking must not trigger an immediate transition
        psm.unlock();
        assert_eq!(psm.poll(100_000), None);
    }

    #[test]
    fn test_record_activity_when_active() {
        let mut psm = unlocked_at(0);
        assert_eq!(psm.record_activity(3_000), None);
        assert_eq!(psm.last_activity(), 3_000);
        assert_eq!(psm.poll(3_000 + DIM_TIMEOUT_MS), None);
    }

    #[test]
    fn test_lock_wakes() {
        let mut psm = unlocked_at(0);
        psm.mark_soft_powersave();
        assert_eq!(psm.lock(), Some(PowerState::SoftPowersave));
        assert_eq!(psm.state(), PowerState::Active);
        assert!(psm.is_locked());
        assert_eq!(psm.lock(), None);
    }
}

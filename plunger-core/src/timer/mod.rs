//! Named timers
//!
//! Each solenoid owns a small set of named timer slots. Scheduling under a
//! name that is already pending replaces the pending callback, which is what
//! keeps two phases of the same solenoid's sequence from overlapping.
//!
//! Callbacks are plain data ([`TimerAction`]); the bank dispatches them when
//! [`TimerQueue::pop_due`] hands them back during a tick.

pub mod queue;

pub use queue::{OwnerTimers, TimerQueue};

use crate::solenoid::SolenoidId;

/// Timer slot name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerKey {
    /// Deferred turn-on while interlocked peers release
    Interlock,
    /// AC/DC transition from energise to hold level
    StartHold,
    /// DC-latching pulse / settle / redo / rest step
    LatchPulse,
}

/// Fully qualified timer name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId {
    /// Solenoid that owns the timer
    pub owner: SolenoidId,
    /// Slot name
    pub key: TimerKey,
}

impl TimerId {
    /// Create a timer id
    pub const fn new(owner: SolenoidId, key: TimerKey) -> Self {
        Self { owner, key }
    }
}

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    /// Re-run the state request (interlocks are evaluated again)
    InterlockRetry {
        /// Requested logical state
        state: bool,
    },
    /// Drop the drive line to hold power
    HoldLevel,
    /// End of a latch kick: brake both lines
    LatchSettle,
    /// Kick the latch again
    LatchRedo,
    /// Disable the bridge and rest both lines
    LatchRest,
}

/// Timer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// No free slot for a new timer
    Full,
}

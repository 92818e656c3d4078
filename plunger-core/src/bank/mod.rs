//! Solenoid bank
//!
//! The bank is the registry every solenoid lives in. It owns the shared
//! timer queue, hands out stable [`SolenoidId`] handles, publishes state
//! changes as [`SwitchEvent`]s and dispatches timers on every tick.
//!
//! State requests enter through [`SolenoidBank::request_state`], which runs
//! the interlock coordinator (see [`crate::interlock`]) before the drive
//! engine.

pub mod events;
pub mod registry;

pub use events::{SwitchEvent, EVENT_QUEUE_LEN};
pub use registry::{SolenoidBank, MAX_TIMERS};

use crate::config::ConfigError;

/// Result of a state request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestOutcome {
    /// Outputs driven and state published
    Driven,
    /// Waiting for interlocked peers to release
    Deferred,
    /// Nothing driven (unknown solenoid or unsupported kind)
    Ignored,
}

/// Bank errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BankError {
    /// No room for another solenoid
    Full,
    /// Handle does not refer to a solenoid in this bank
    UnknownSolenoid,
    /// Interlock set already assigned
    AlreadyConfigured,
    /// More interlock peers than a solenoid can hold
    TooManyInterlocks,
    /// Board has no output lines for a configured solenoid
    NoOutputs,
    /// Configuration rejected
    Config(ConfigError),
}

impl From<ConfigError> for BankError {
    fn from(e: ConfigError) -> Self {
        BankError::Config(e)
    }
}

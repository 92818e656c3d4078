//! Board-agnostic core logic for the solenoid driver firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Solenoid configuration types, validation and TOML loading
//! - Named timer queue (cooperative, tick driven)
//! - Drive engine for AC, DC and DC-latching solenoids
//! - Interlock coordination between mutually exclusive solenoids
//! - Solenoid bank (registry, state publication, restore on boot)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod log;

pub mod bank;
pub mod config;
pub mod interlock;
pub mod solenoid;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use bank::{BankError, RequestOutcome, SolenoidBank, SwitchEvent};
pub use config::{BankConfig, ConfigError, RestoreMode, SolenoidConfig, SolenoidKind};
pub use solenoid::{LatchPhase, Solenoid, SolenoidId, SolenoidOutputs};
pub use timer::{TimerAction, TimerError, TimerId, TimerKey, TimerQueue};

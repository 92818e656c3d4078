//! Solenoid actuators and the drive engine
//!
//! A [`Solenoid`] owns its output lines and sequences them according to its
//! [`SolenoidKind`](crate::config::SolenoidKind):
//!
//! - AC / DC: energise pulse, then PWM hold until switched off
//! - DC-latching: polarity kick, brake settle, repeated kicks, then rest
//!
//! Interlocking happens one level up, in the bank; by the time
//! [`Solenoid::drive`] runs the request has been cleared.

pub mod actuator;
pub mod drive;
pub mod latch;

pub use actuator::{Solenoid, SolenoidOutputs};
pub use drive::LATCH_REST_DELAY_MS;
pub use latch::LatchPhase;

/// Stable handle of a solenoid within its bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SolenoidId(u8);

impl SolenoidId {
    /// Create a handle from a bank index
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Bank index
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

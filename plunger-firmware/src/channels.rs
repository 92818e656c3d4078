//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use plunger_core::SolenoidId;

/// Channel capacity for solenoid commands
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Command for the solenoid task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SolenoidCommand {
    /// Request the opposite of the published state
    Toggle(SolenoidId),
}

/// Commands from buttons (or any other task) to the solenoid task
pub static SOLENOID_CMD: Channel<CriticalSectionRawMutex, SolenoidCommand, COMMAND_CHANNEL_SIZE> =
    Channel::new();

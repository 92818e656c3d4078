//! Configuration types
//!
//! Board-agnostic solenoid configuration, its validation rules and the
//! two loaders: the serde/TOML one used by the build script and the
//! allocation-free line parser used on target.

pub mod bank;
pub mod lines;
#[cfg(feature = "toml")]
pub mod toml;
pub mod types;

pub use bank::BankConfig;
pub use lines::{parse_lines, ParseError};
#[cfg(feature = "toml")]
pub use self::toml::parse_bank_config;
pub use types::*;

use core::fmt;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum solenoids per bank
pub const MAX_SOLENOIDS: usize = 8;

/// Maximum interlock peers per solenoid
pub const MAX_INTERLOCKS: usize = MAX_SOLENOIDS;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Solenoid kind not recognised
    UnsupportedKind,
    /// Energise duration outside 10..=3000 ms
    EnergiseDurationOutOfRange,
    /// Energise or hold power outside 0.0..=1.0
    PowerOutOfRange,
    /// DC latch redo count outside 1..=5
    RedoCountOutOfRange,
    /// DC latch redo interval outside 500..=3000 ms
    RedoIntervalOutOfRange,
    /// Solenoid name empty
    EmptyName,
    /// Two solenoids share a name
    DuplicateName,
    /// Interlock refers to a solenoid that does not exist
    UnknownInterlock,
    /// More solenoids than the bank can hold
    TooManySolenoids,
    /// TOML syntax or type error
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ConfigError::UnsupportedKind => "unsupported solenoid kind",
            ConfigError::EnergiseDurationOutOfRange => "energise_duration_ms must be 10..=3000",
            ConfigError::PowerOutOfRange => "power levels must be 0.0..=1.0",
            ConfigError::RedoCountOutOfRange => "dc_latch_redo_count must be 1..=5",
            ConfigError::RedoIntervalOutOfRange => "dc_latch_redo_interval_ms must be 500..=3000",
            ConfigError::EmptyName => "solenoid name must not be empty",
            ConfigError::DuplicateName => "duplicate solenoid name",
            ConfigError::UnknownInterlock => "interlock refers to an unknown solenoid",
            ConfigError::TooManySolenoids => "too many solenoids",
            ConfigError::Parse => "invalid TOML",
        };
        f.write_str(msg)
    }
}

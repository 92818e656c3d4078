//! TOML bank configuration loader
//!
//! ```toml
//! [[solenoid]]
//! name = "lawn"
//! kind = "dc_latching"
//! brake_is_high = true
//! energise_duration_ms = 30
//! interlock = ["beds"]
//! interlock_wait_time_ms = 1000
//! ```

use super::{BankConfig, ConfigError};

/// Parse a bank configuration from TOML text
///
/// Only syntax and types are checked here; call [`BankConfig::validate`]
/// for range and cross-reference checks.
pub fn parse_bank_config(input: &str) -> Result<BankConfig, ConfigError> {
    ::toml::from_str(input).map_err(|_e| {
        log_error!("Failed to parse bank config");
        ConfigError::Parse
    })
}

//! Solenoid configuration type definitions

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ConfigError, MAX_INTERLOCKS, MAX_LABEL_LEN};

/// Valid energise pulse durations (ms)
pub const ENERGISE_DURATION_RANGE_MS: core::ops::RangeInclusive<u16> = 10..=3000;

/// Valid number of extra DC-latching kicks
pub const REDO_COUNT_RANGE: core::ops::RangeInclusive<u8> = 1..=5;

/// Valid spacing between DC-latching kicks (ms)
pub const REDO_INTERVAL_RANGE_MS: core::ops::RangeInclusive<u16> = 500..=3000;

/// Solenoid type, selects the drive algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SolenoidKind {
    /// AC solenoid driven with DC: energise pulse then PWM hold
    #[default]
    Ac,
    /// DC solenoid: energise pulse then PWM hold
    Dc,
    /// Magnetically latching DC solenoid: polarity-reversed kicks
    DcLatching,
    /// Any kind this firmware does not know how to drive
    #[cfg_attr(feature = "serde", serde(other))]
    Unsupported,
}

impl SolenoidKind {
    /// Human readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            SolenoidKind::Ac => "AC",
            SolenoidKind::Dc => "DC",
            SolenoidKind::DcLatching => "DC Latching",
            SolenoidKind::Unsupported => "unsupported",
        }
    }
}

/// How the initial state is chosen at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RestoreMode {
    /// Use the restored value, off if there is none
    #[default]
    RestoreDefaultOff,
    /// Use the restored value, on if there is none
    RestoreDefaultOn,
    /// Always start off
    AlwaysOff,
    /// Always start on
    AlwaysOn,
    /// Use the inverse of the restored value, off if there is none
    RestoreInvertedDefaultOff,
    /// Use the inverse of the restored value, on if there is none
    RestoreInvertedDefaultOn,
    /// Do not pick an initial state
    Disabled,
}

impl RestoreMode {
    /// Resolve the initial state from an externally restored value
    ///
    /// Returns `None` only for [`RestoreMode::Disabled`].
    pub fn initial_state(&self, restored: Option<bool>) -> Option<bool> {
        match self {
            RestoreMode::RestoreDefaultOff => Some(restored.unwrap_or(false)),
            RestoreMode::RestoreDefaultOn => Some(restored.unwrap_or(true)),
            RestoreMode::AlwaysOff => Some(false),
            RestoreMode::AlwaysOn => Some(true),
            RestoreMode::RestoreInvertedDefaultOff => Some(restored.map_or(false, |s| !s)),
            RestoreMode::RestoreInvertedDefaultOn => Some(restored.map_or(true, |s| !s)),
            RestoreMode::Disabled => None,
        }
    }
}

/// Solenoid configuration
///
/// Immutable once the solenoid is added to a bank.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolenoidConfig {
    /// Solenoid name (e.g., "zone1")
    pub name: String<MAX_LABEL_LEN>,
    /// Drive algorithm
    pub kind: SolenoidKind,
    /// H-bridge brake level on the brake line (true = both inputs high brakes)
    pub brake_is_high: bool,
    /// Energise pulse length before hold/settle (ms)
    pub energise_duration_ms: u16,
    /// Drive line duty during the energise pulse (0.0-1.0)
    #[cfg_attr(feature = "serde", serde(default = "default_energise_power"))]
    pub energise_power: f32,
    /// Drive line duty while holding (0.0-1.0)
    #[cfg_attr(feature = "serde", serde(default = "default_hold_power"))]
    pub hold_power: f32,
    /// Extra kicks after the first for DC-latching solenoids
    #[cfg_attr(feature = "serde", serde(default = "default_redo_count"))]
    pub dc_latch_redo_count: u8,
    /// Spacing between DC-latching kicks (ms)
    #[cfg_attr(feature = "serde", serde(default = "default_redo_interval_ms"))]
    pub dc_latch_redo_interval_ms: u16,
    /// Invert logical on/off before driving
    #[cfg_attr(feature = "serde", serde(default))]
    pub inverted: bool,
    /// Names of solenoids that must be off while this one is on
    #[cfg_attr(feature = "serde", serde(default))]
    pub interlock: Vec<String<MAX_LABEL_LEN>, MAX_INTERLOCKS>,
    /// Delay after forcing interlocked peers off (0 = no delay)
    #[cfg_attr(feature = "serde", serde(default))]
    pub interlock_wait_time_ms: u32,
    /// Initial state selection at boot
    #[cfg_attr(feature = "serde", serde(default))]
    pub restore_mode: RestoreMode,
}

/// Default energise power (95%)
pub const DEFAULT_ENERGISE_POWER: f32 = 0.95;

/// Default hold power (55%)
pub const DEFAULT_HOLD_POWER: f32 = 0.55;

/// Default number of extra latch kicks
pub const DEFAULT_REDO_COUNT: u8 = 3;

/// Default spacing between latch kicks (ms)
pub const DEFAULT_REDO_INTERVAL_MS: u16 = 500;

#[cfg(feature = "serde")]
fn default_energise_power() -> f32 {
    DEFAULT_ENERGISE_POWER
}

#[cfg(feature = "serde")]
fn default_hold_power() -> f32 {
    DEFAULT_HOLD_POWER
}

#[cfg(feature = "serde")]
fn default_redo_count() -> u8 {
    DEFAULT_REDO_COUNT
}

#[cfg(feature = "serde")]
fn default_redo_interval_ms() -> u16 {
    DEFAULT_REDO_INTERVAL_MS
}

impl Default for SolenoidConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: SolenoidKind::Ac,
            brake_is_high: true,
            energise_duration_ms: 500,
            energise_power: DEFAULT_ENERGISE_POWER,
            hold_power: DEFAULT_HOLD_POWER,
            dc_latch_redo_count: DEFAULT_REDO_COUNT,
            dc_latch_redo_interval_ms: DEFAULT_REDO_INTERVAL_MS,
            inverted: false,
            interlock: Vec::new(),
            interlock_wait_time_ms: 0,
            restore_mode: RestoreMode::RestoreDefaultOff,
        }
    }
}

impl SolenoidConfig {
    /// Create a config with defaults for the given name and kind
    ///
    /// Names longer than [`MAX_LABEL_LEN`] are truncated.
    pub fn new(name: &str, kind: SolenoidKind) -> Self {
        let mut label = String::new();
        for c in name.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        Self {
            name: label,
            kind,
            ..Default::default()
        }
    }

    /// Check parameter ranges
    ///
    /// Latch parameters are only checked for DC-latching solenoids.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if self.kind == SolenoidKind::Unsupported {
            return Err(ConfigError::UnsupportedKind);
        }

        if !ENERGISE_DURATION_RANGE_MS.contains(&self.energise_duration_ms) {
            return Err(ConfigError::EnergiseDurationOutOfRange);
        }

        if !(0.0..=1.0).contains(&self.energise_power) || !(0.0..=1.0).contains(&self.hold_power) {
            return Err(ConfigError::PowerOutOfRange);
        }

        if self.kind == SolenoidKind::DcLatching {
            if !REDO_COUNT_RANGE.contains(&self.dc_latch_redo_count) {
                return Err(ConfigError::RedoCountOutOfRange);
            }
            if !REDO_INTERVAL_RANGE_MS.contains(&self.dc_latch_redo_interval_ms) {
                return Err(ConfigError::RedoIntervalOutOfRange);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SolenoidConfig::new("zone1", SolenoidKind::Ac);
        assert_eq!(config.name.as_str(), "zone1");
        assert_eq!(config.energise_power, DEFAULT_ENERGISE_POWER);
        assert_eq!(config.hold_power, DEFAULT_HOLD_POWER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_long_name_truncated() {
        let config = SolenoidConfig::new("a-very-long-solenoid-name", SolenoidKind::Dc);
        assert_eq!(config.name.len(), MAX_LABEL_LEN);
    }

    #[test]
    fn test_validate_rejects_unsupported_kind() {
        let config = SolenoidConfig::new("x", SolenoidKind::Unsupported);
        assert_eq!(config.validate(), Err(ConfigError::UnsupportedKind));
    }

    #[test]
    fn test_validate_ranges() {
        let mut config = SolenoidConfig::new("x", SolenoidKind::Ac);
        config.energise_duration_ms = 5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::EnergiseDurationOutOfRange)
        );

        config.energise_duration_ms = 300;
        config.hold_power = 1.5;
        assert_eq!(config.validate(), Err(ConfigError::PowerOutOfRange));
    }

    #[test]
    fn test_latch_parameters_only_checked_for_latching() {
        let mut config = SolenoidConfig::new("x", SolenoidKind::Dc);
        config.dc_latch_redo_count = 0;
        config.dc_latch_redo_interval_ms = 100;
        assert!(config.validate().is_ok());

        config.kind = SolenoidKind::DcLatching;
        assert_eq!(config.validate(), Err(ConfigError::RedoCountOutOfRange));

        config.dc_latch_redo_count = 2;
        assert_eq!(config.validate(), Err(ConfigError::RedoIntervalOutOfRange));
    }

    #[test]
    fn test_restore_modes() {
        assert_eq!(RestoreMode::RestoreDefaultOff.initial_state(None), Some(false));
        assert_eq!(RestoreMode::RestoreDefaultOff.initial_state(Some(true)), Some(true));
        assert_eq!(RestoreMode::RestoreDefaultOn.initial_state(None), Some(true));
        assert_eq!(RestoreMode::AlwaysOff.initial_state(Some(true)), Some(false));
        assert_eq!(RestoreMode::AlwaysOn.initial_state(Some(false)), Some(true));
        assert_eq!(
            RestoreMode::RestoreInvertedDefaultOff.initial_state(Some(false)),
            Some(true)
        );
        assert_eq!(
            RestoreMode::RestoreInvertedDefaultOn.initial_state(None),
            Some(true)
        );
        assert_eq!(RestoreMode::Disabled.initial_state(Some(true)), None);
    }
}

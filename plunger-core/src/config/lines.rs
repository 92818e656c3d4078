//! Line-based bank configuration parser
//!
//! A minimal TOML parser for targets where the `toml` crate cannot be used
//! (it needs `alloc::sync::Arc`, which thumbv6m lacks). It handles only the
//! subset solenoid bank files use and allocates nothing. The firmware build
//! script runs it next to [`parse_bank_config`](super::parse_bank_config)
//! and fails the build if the two disagree.
//!
//! Supported features:
//! - `[[solenoid]]` array-of-table headers
//! - Key = value pairs (string, integer, float, boolean)
//! - Basic `"..."` strings without escapes and literal `'...'` strings
//! - String arrays, on one line or spread over several
//! - Comments (# ...)

use heapless::String;

use super::{BankConfig, RestoreMode, SolenoidConfig, SolenoidKind, MAX_LABEL_LEN};

/// Longest array value accepted, after joining continuation lines
const MAX_ARRAY_TEXT: usize = 256;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Section header other than `[[solenoid]]`
    InvalidSection,
    /// Key outside a `[[solenoid]]` table
    KeyOutsideTable,
    /// Invalid value type
    InvalidValue,
    /// Array opened but never closed
    UnterminatedArray,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Solenoid table without a name
    MissingName,
}

/// Array value spread over several lines
struct PendingArray<'a> {
    key: &'a str,
    text: String<MAX_ARRAY_TEXT>,
}

/// Parse TOML text into a BankConfig
///
/// Only syntax and types are checked here; call [`BankConfig::validate`]
/// for range and cross-reference checks.
pub fn parse_lines(input: &str) -> Result<BankConfig, ParseError> {
    let mut config = BankConfig::new();
    let mut current: Option<SolenoidConfig> = None;
    let mut pending: Option<PendingArray<'_>> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if let Some(array) = pending.as_mut() {
            if !line.is_empty() {
                push_text(&mut array.text, " ")?;
                push_text(&mut array.text, line)?;
            }
            if line.ends_with(']') {
                if let (Some(array), Some(solenoid)) = (pending.take(), current.as_mut()) {
                    apply_value(solenoid, array.key, array.text.as_str())?;
                }
            }
            continue;
        }

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            save_solenoid(&mut config, current.take())?;
            if line != "[[solenoid]]" {
                return Err(ParseError::InvalidSection);
            }
            current = Some(SolenoidConfig::default());
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::InvalidValue)?;
        let (key, value) = (key.trim(), value.trim());
        let solenoid = current.as_mut().ok_or(ParseError::KeyOutsideTable)?;

        if value.starts_with('[') && !value.ends_with(']') {
            let mut text = String::new();
            push_text(&mut text, value)?;
            pending = Some(PendingArray { key, text });
            continue;
        }

        apply_value(solenoid, key, value)?;
    }

    if pending.is_some() {
        return Err(ParseError::UnterminatedArray);
    }

    save_solenoid(&mut config, current)?;
    Ok(config)
}

fn push_text(text: &mut String<MAX_ARRAY_TEXT>, s: &str) -> Result<(), ParseError> {
    text.push_str(s).map_err(|_| ParseError::TooManyItems)
}

fn save_solenoid(config: &mut BankConfig, solenoid: Option<SolenoidConfig>) -> Result<(), ParseError> {
    let Some(solenoid) = solenoid else {
        return Ok(());
    };
    if solenoid.name.is_empty() {
        return Err(ParseError::MissingName);
    }
    config.push(solenoid).map_err(|_| ParseError::TooManyItems)
}

/// Remove a trailing comment, ignoring `#` inside strings
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in line.char_indices() {
        match (c, quote) {
            ('"' | '\'', None) => quote = Some(c),
            (c, Some(q)) if c == q => quote = None,
            ('#', None) => return &line[..i],
            _ => {}
        }
    }
    line
}

fn apply_value(solenoid: &mut SolenoidConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "name" => solenoid.name = parse_label(value)?,
        "kind" => {
            solenoid.kind = match parse_string(value)? {
                "ac" => SolenoidKind::Ac,
                "dc" => SolenoidKind::Dc,
                "dc_latching" => SolenoidKind::DcLatching,
                _ => SolenoidKind::Unsupported,
            }
        }
        "brake_is_high" => solenoid.brake_is_high = parse_bool(value)?,
        "energise_duration_ms" => solenoid.energise_duration_ms = parse_int(value)?,
        "energise_power" => solenoid.energise_power = parse_float(value)?,
        "hold_power" => solenoid.hold_power = parse_float(value)?,
        "dc_latch_redo_count" => solenoid.dc_latch_redo_count = parse_int(value)?,
        "dc_latch_redo_interval_ms" => solenoid.dc_latch_redo_interval_ms = parse_int(value)?,
        "inverted" => solenoid.inverted = parse_bool(value)?,
        "interlock" => {
            solenoid.interlock.clear();
            let inner = value
                .strip_prefix('[')
                .and_then(|v| v.strip_suffix(']'))
                .ok_or(ParseError::InvalidValue)?;
            for item in inner.split(',').map(str::trim).filter(|i| !i.is_empty()) {
                solenoid
                    .interlock
                    .push(parse_label(item)?)
                    .map_err(|_| ParseError::TooManyItems)?;
            }
        }
        "interlock_wait_time_ms" => solenoid.interlock_wait_time_ms = parse_int(value)?,
        "restore_mode" => solenoid.restore_mode = parse_restore_mode(parse_string(value)?)?,
        _ => log_warn!("Unknown solenoid key '{}' ignored", key),
    }
    Ok(())
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if let Some(literal) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
        return Ok(literal);
    }

    let basic = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)?;
    // Escapes are not supported
    if basic.contains('\\') {
        return Err(ParseError::InvalidValue);
    }
    Ok(basic)
}

fn parse_label(value: &str) -> Result<String<MAX_LABEL_LEN>, ParseError> {
    let mut label = String::new();
    label
        .push_str(parse_string(value)?)
        .map_err(|_| ParseError::TooManyItems)?;
    Ok(label)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    // TOML allows `1_000`
    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_restore_mode(value: &str) -> Result<RestoreMode, ParseError> {
    match value {
        "restore_default_off" => Ok(RestoreMode::RestoreDefaultOff),
        "restore_default_on" => Ok(RestoreMode::RestoreDefaultOn),
        "always_off" => Ok(RestoreMode::AlwaysOff),
        "always_on" => Ok(RestoreMode::AlwaysOn),
        "restore_inverted_default_off" => Ok(RestoreMode::RestoreInvertedDefaultOff),
        "restore_inverted_default_on" => Ok(RestoreMode::RestoreInvertedDefaultOn),
        "disabled" => Ok(RestoreMode::Disabled),
        _ => Err(ParseError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_ENERGISE_POWER, DEFAULT_REDO_COUNT};

    #[test]
    fn test_parse_minimal() {
        let config = parse_lines(
            r#"
            [[solenoid]]
            name = "drip"
            kind = "ac"
            brake_is_high = false
            energise_duration_ms = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.solenoids.len(), 1);
        let drip = &config.solenoids[0];
        assert_eq!(drip.name.as_str(), "drip");
        assert_eq!(drip.kind, SolenoidKind::Ac);
        assert!(!drip.brake_is_high);
        assert_eq!(drip.energise_duration_ms, 200);
        assert_eq!(drip.energise_power, DEFAULT_ENERGISE_POWER);
        assert_eq!(drip.dc_latch_redo_count, DEFAULT_REDO_COUNT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_all_keys_and_comments() {
        let config = parse_lines(
            r#"
            # Valve pair
            [[solenoid]]
            name = "open"   # main valve
            kind = "dc_latching"
            brake_is_high = true
            energise_duration_ms = 1_000
            energise_power = 0.9
            hold_power = 0.4
            dc_latch_redo_count = 2
            dc_latch_redo_interval_ms = 750
            inverted = true
            interlock = ["close"]
            interlock_wait_time_ms = 250
            restore_mode = "always_on"

            [[solenoid]]
            name = "close#1"
            kind = "dc_latching"
            brake_is_high = true
            energise_duration_ms = 30
            "#,
        )
        .unwrap();

        let open = &config.solenoids[0];
        assert_eq!(open.kind, SolenoidKind::DcLatching);
        assert_eq!(open.energise_duration_ms, 1000);
        assert_eq!(open.energise_power, 0.9);
        assert_eq!(open.hold_power, 0.4);
        assert_eq!(open.dc_latch_redo_count, 2);
        assert_eq!(open.dc_latch_redo_interval_ms, 750);
        assert!(open.inverted);
        assert_eq!(open.interlock[0].as_str(), "close");
        assert_eq!(open.interlock_wait_time_ms, 250);
        assert_eq!(open.restore_mode, RestoreMode::AlwaysOn);
        assert_eq!(config.solenoids[1].name.as_str(), "close#1");
    }

    #[test]
    fn test_parse_literal_strings() {
        let config = parse_lines(
            "[[solenoid]]\nname = 'drip'\nkind = 'dc'\nbrake_is_high = true\nenergise_duration_ms = 50\ninterlock = ['a', \"b\"]\n",
        )
        .unwrap();

        let drip = &config.solenoids[0];
        assert_eq!(drip.name.as_str(), "drip");
        assert_eq!(drip.kind, SolenoidKind::Dc);
        assert_eq!(drip.interlock.len(), 2);
        assert_eq!(drip.interlock[0].as_str(), "a");
    }

    #[test]
    fn test_parse_multi_line_array() {
        let config = parse_lines(
            r#"
            [[solenoid]]
            name = "zone"
            kind = "ac"
            brake_is_high = true
            energise_duration_ms = 50
            interlock = [
                "a",   # first
                "b",
            ]
            inverted = true
            "#,
        )
        .unwrap();

        let zone = &config.solenoids[0];
        assert_eq!(zone.interlock.len(), 2);
        assert_eq!(zone.interlock[1].as_str(), "b");
        assert!(zone.inverted);
    }

    #[test]
    fn test_parse_shipped_bank() {
        let config = parse_lines(include_str!("../../../plunger-firmware/solenoids.toml")).unwrap();

        assert_eq!(config.solenoids.len(), 3);
        assert!(config.validate().is_ok());
        let open = config.find("valve_open").unwrap();
        assert_eq!(open.interlock[0].as_str(), "valve_close");
        assert_eq!(open.interlock_wait_time_ms, 1000);
        assert_eq!(config.find("drip").unwrap().hold_power, 0.4);
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        let config = parse_lines("[[solenoid]]\nname = \"x\"\nkind = \"half_bridge\"\n").unwrap();
        assert_eq!(config.solenoids[0].kind, SolenoidKind::Unsupported);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse_lines("[solenoid]\nname = \"x\"\n"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(
            parse_lines("name = \"x\"\n"),
            Err(ParseError::KeyOutsideTable)
        );
        assert_eq!(
            parse_lines("[[solenoid]]\nkind = \"ac\"\n"),
            Err(ParseError::MissingName)
        );
        assert_eq!(
            parse_lines("[[solenoid]]\nname = \"x\"\ninverted = yes\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_lines("[[solenoid]]\nname = \"a\\tb\"\n"),
            Err(ParseError::InvalidValue)
        );
        assert_eq!(
            parse_lines("[[solenoid]]\nname = \"x\"\ninterlock = [\n\"a\",\n"),
            Err(ParseError::UnterminatedArray)
        );
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_agrees_with_toml_loader() {
        let input = r#"
            [[solenoid]]
            name = 'open'
            kind = "dc_latching"
            brake_is_high = true
            energise_duration_ms = 30
            interlock = [
                "close",
            ]
            interlock_wait_time_ms = 1000
            restore_mode = "always_off"

            [[solenoid]]
            name = "close"
            kind = "dc_latching"
            brake_is_high = true
            energise_duration_ms = 30
            interlock = ["open"]
        "#;

        assert_eq!(
            parse_lines(input).unwrap(),
            crate::config::parse_bank_config(input).unwrap()
        );
    }
}

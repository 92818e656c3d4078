//! Build script for plunger-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates solenoids.toml at compile time
//! - Checks the on-target line parser reads it the same way

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use plunger_core::config::{
    parse_bank_config, parse_lines, BankConfig, SolenoidConfig, MAX_SOLENOIDS,
};

/// Output channels wired on the board (see `src/board.rs`)
const BOARD_CHANNELS: usize = 3;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate solenoids.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=solenoids.toml");

    let config_path = Path::new("solenoids.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: solenoids.toml not found!                                ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a solenoids.toml bank configuration.      ║\n\
            ║  Please create one in the plunger-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read solenoids.toml                            ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax first, the toml crate reports line and column
    if let Err(e) = toml::from_str::<toml::Value>(&config_content) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid TOML syntax in solenoids.toml                    ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            ║                                                                  ║\n\
            {}\n\
            ║                                                                  ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&e.to_string())
        );
    }

    let config = match parse_bank_config(&config_content) {
        Ok(config) => config,
        Err(e) => fail(&[format!("[[solenoid]] tables do not match the schema: {}", e)]),
    };

    validate_bank(&config);

    // The firmware reads the embedded file with the line parser
    match parse_lines(&config_content) {
        Ok(on_target) => check_same(&config, &on_target),
        Err(e) => fail(&[format!(
            "on-target parser rejects solenoids.toml ({:?}); keep to basic or literal strings and string arrays",
            e
        )]),
    }

    println!(
        "cargo:warning=solenoids.toml validated successfully ({} solenoids)",
        config.solenoids.len()
    );
}

/// Check ranges, names and board capacity
fn validate_bank(config: &BankConfig) {
    let mut errors = Vec::new();

    if config.solenoids.is_empty() {
        errors.push("No [[solenoid]] tables defined".to_string());
    }

    if config.solenoids.len() > BOARD_CHANNELS.min(MAX_SOLENOIDS) {
        errors.push(format!(
            "{} solenoids defined, board has {} channels",
            config.solenoids.len(),
            BOARD_CHANNELS
        ));
    }

    for solenoid in config.solenoids.iter() {
        if let Err(e) = solenoid.validate() {
            errors.push(format!("solenoid '{}': {}", solenoid.name, e));
        }
    }

    if errors.is_empty() {
        if let Err(e) = config.validate() {
            errors.push(e.to_string());
        }
    }

    if !errors.is_empty() {
        fail(&errors);
    }
}

/// Fail unless both loaders produced the same bank
fn check_same(expected: &BankConfig, actual: &BankConfig) {
    let mut errors = Vec::new();

    if expected.solenoids.len() != actual.solenoids.len() {
        errors.push(format!(
            "on-target parser found {} solenoids, expected {}",
            actual.solenoids.len(),
            expected.solenoids.len()
        ));
    }

    for (a, b) in expected.solenoids.iter().zip(actual.solenoids.iter()) {
        if !same_solenoid(a, b) {
            errors.push(format!("solenoid '{}' reads differently on target", a.name));
        }
    }

    if !errors.is_empty() {
        fail(&errors);
    }
}

fn same_solenoid(a: &SolenoidConfig, b: &SolenoidConfig) -> bool {
    let close = |x: f32, y: f32| (x - y).abs() < 1e-6;
    a.name == b.name
        && a.kind == b.kind
        && a.brake_is_high == b.brake_is_high
        && a.energise_duration_ms == b.energise_duration_ms
        && close(a.energise_power, b.energise_power)
        && close(a.hold_power, b.hold_power)
        && a.dc_latch_redo_count == b.dc_latch_redo_count
        && a.dc_latch_redo_interval_ms == b.dc_latch_redo_interval_ms
        && a.inverted == b.inverted
        && a.interlock == b.interlock
        && a.interlock_wait_time_ms == b.interlock_wait_time_ms
        && a.restore_mode == b.restore_mode
}

fn fail(errors: &[String]) -> ! {
    let lines = errors
        .iter()
        .map(|e| format_error_lines(&format!("• {}", e)))
        .collect::<Vec<_>>()
        .join("\n");
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: Invalid solenoids.toml                                   ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        ║                                                                  ║\n\
        {}\n\
        ║                                                                  ║\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        lines
    );
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

//! Plunger - Solenoid Driver Firmware
//!
//! Main firmware binary for RP2040-based solenoid driver boards. Drives AC,
//! DC and DC-latching solenoids through H-bridges, with interlocks between
//! solenoids that must never be on together.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use plunger_core::config::parse_lines;
use plunger_core::{BankConfig, SolenoidId};

use crate::board::Bank;

/// Embedded bank configuration (compiled into firmware)
/// Edit solenoids.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../solenoids.toml");

/// Solenoid toggled by the push button
const BUTTON_TARGET: &str = "drip";

mod board;
mod channels;
mod tasks;

// Bank must live forever for the solenoid task
static BANK: StaticCell<Bank> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Plunger firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let (mut channels, button) = board::init(p);
    info!("{} output channels initialized", board::CHANNELS);

    let config = load_config();

    let bank = match Bank::from_config(&config, |id: SolenoidId, _| {
        channels.get_mut(id.index()).and_then(Option::take)
    }) {
        Ok(bank) => bank,
        Err(e) => {
            error!("Failed to build solenoid bank: {:?}", e);
            error!("Running with no solenoids");
            Bank::new()
        }
    };

    let target = bank.find(BUTTON_TARGET).unwrap_or_else(|| {
        warn!("Button target '{}' not configured, using first solenoid", BUTTON_TARGET);
        SolenoidId::new(0)
    });

    let bank = BANK.init(bank);

    spawner.spawn(tasks::solenoid_task(bank)).unwrap();
    spawner.spawn(tasks::button_task(button, target)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Parse the embedded bank configuration
///
/// build.rs has already checked that this parser reads the file the same
/// way the TOML loader does. Falls back to an empty bank.
fn load_config() -> BankConfig {
    match parse_lines(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Parsed embedded configuration ({} solenoids)",
                config.solenoids.len()
            );
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            BankConfig::new()
        }
    }
}

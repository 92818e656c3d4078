//! Solenoid bank task
//!
//! Owns the bank. Ticks its timer queue at a fixed interval and applies
//! commands from [`SOLENOID_CMD`] as they arrive, so every state request
//! and timer callback runs on this one task.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker};

use plunger_core::RequestOutcome;

use crate::board::Bank;
use crate::channels::{SolenoidCommand, SOLENOID_CMD};

/// Tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 10;

/// Solenoid bank task
#[embassy_executor::task]
pub async fn solenoid_task(bank: &'static mut Bank) {
    info!("Solenoid task started ({} solenoids)", bank.len());

    let start = Instant::now();

    bank.dump_config();
    // No persisted state on this board, restore modes pick their defaults
    bank.setup(|_| None);
    log_events(bank);

    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        match select(ticker.next(), SOLENOID_CMD.receive()).await {
            Either::First(()) => {
                bank.tick(start.elapsed().as_millis());
            }
            Either::Second(cmd) => {
                // Catch up first so the request sees current timer state
                bank.tick(start.elapsed().as_millis());
                let SolenoidCommand::Toggle(id) = cmd;
                let outcome = bank.toggle(id);
                match outcome {
                    RequestOutcome::Driven => trace!("{:?} driven", cmd),
                    RequestOutcome::Deferred => debug!("{:?} waiting for interlocks", cmd),
                    RequestOutcome::Ignored => warn!("{:?} ignored", cmd),
                }
            }
        }

        log_events(bank);
    }
}

/// Report published state changes
fn log_events(bank: &mut Bank) {
    while let Some(event) = bank.pop_event() {
        if let Some(solenoid) = bank.get(event.id) {
            info!(
                "Solenoid '{}' is now {}",
                solenoid.name(),
                if event.state { "ON" } else { "OFF" }
            );
        }
    }
}

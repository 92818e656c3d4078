//! Push button task
//!
//! Toggles one solenoid on every press.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use plunger_core::SolenoidId;

use crate::channels::{SolenoidCommand, SOLENOID_CMD};

/// Debounce delay in milliseconds
const DEBOUNCE_MS: u64 = 50;

/// Button task
#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>, target: SolenoidId) {
    info!("Button task started");

    loop {
        button.wait_for_falling_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        if button.is_low() {
            debug!("Button pressed");
            SOLENOID_CMD.send(SolenoidCommand::Toggle(target)).await;
        }

        button.wait_for_high().await;
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}

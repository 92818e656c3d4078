//! Interlock-aware state requests

use heapless::Vec;

use plunger_hal::{BinaryOutput, FloatOutput};

use crate::bank::{RequestOutcome, SolenoidBank};
use crate::config::MAX_INTERLOCKS;
use crate::solenoid::SolenoidId;
use crate::timer::{TimerAction, TimerId, TimerKey};

impl<A: FloatOutput, B: BinaryOutput> SolenoidBank<A, B> {
    /// Request a logical state for a solenoid
    ///
    /// This is the single entry point for external requests, interlock
    /// retries and boot restore. An off request cancels any pending
    /// interlock retry for the solenoid. An on request made while a retry is
    /// pending forces active peers off again but keeps the retry and its
    /// deadline, so the wait always runs from the request that first forced
    /// a peer off.
    pub fn request_state(&mut self, id: SolenoidId, state: bool) -> RequestOutcome {
        let Some(solenoid) = self.solenoids.get(id.index()) else {
            log_warn!("Request for unknown solenoid {}", id.index());
            return RequestOutcome::Ignored;
        };

        let retry = TimerId::new(id, TimerKey::Interlock);
        let wait_ms = solenoid.config().interlock_wait_time_ms;
        let peers: Vec<SolenoidId, MAX_INTERLOCKS> =
            solenoid.interlock().iter().copied().collect();

        let waiting = state && self.timers.is_pending(retry);
        if !waiting {
            self.timers.cancel(retry);
        }

        if state {
            let mut found = false;
            for peer in peers.iter().copied() {
                if peer == id || self.state(peer) != Some(true) {
                    continue;
                }
                if let Some(p) = self.get(peer) {
                    log_debug!("Interlock: turning off '{}'", p.name());
                }
                self.request_state(peer, false);
                found = true;
            }

            if waiting {
                return RequestOutcome::Deferred;
            }

            if found && wait_ms != 0 {
                if let Err(e) = self
                    .timers
                    .schedule(retry, wait_ms, TimerAction::InterlockRetry { state })
                {
                    log_error!("Could not schedule interlock retry: {:?}", e);
                }
                return RequestOutcome::Deferred;
            }
        }

        self.drive(id, state)
    }
}

//! Solenoid drive engine
//!
//! Turns a cleared state request into timed output transitions. The brake
//! line holds the bridge in "brake" while the drive line is modulated, so
//! the PWM off-cycle shorts the coil instead of letting it coast. When the
//! brake level is high the drive duty is inverted to keep the same power.

use plunger_hal::{BinaryOutput, FloatOutput};

use crate::config::SolenoidKind;
use crate::timer::{TimerAction, TimerKey, TimerQueue};

use super::{LatchPhase, Solenoid};

/// Delay between the final latch settle and resting a 3-pin bridge (ms)
pub const LATCH_REST_DELAY_MS: u32 = 1000;

fn level(high: bool) -> f32 {
    if high {
        1.0
    } else {
        0.0
    }
}

impl<A: FloatOutput, B: BinaryOutput> Solenoid<A, B> {
    /// Drive the outputs toward logical `state`
    ///
    /// Only called once interlocks are clear. Returns false if nothing was
    /// driven because the kind is unsupported.
    pub(crate) fn drive<const N: usize>(&mut self, state: bool, timers: &mut TimerQueue<N>) -> bool {
        match self.config.kind {
            SolenoidKind::Ac | SolenoidKind::Dc => {
                self.control_ac_dc(state, timers);
                true
            }
            SolenoidKind::DcLatching => {
                // A fresh request gets the full kick budget
                self.redo_trigger_count = 0;
                self.kick_latch(state, timers);
                true
            }
            SolenoidKind::Unsupported => {
                log_error!("Invalid solenoid_type selection for '{}'!", self.name());
                false
            }
        }
    }

    /// Run a sequence step whose timer fired
    pub(crate) fn on_timer<const N: usize>(&mut self, action: TimerAction, timers: &mut TimerQueue<N>) {
        match action {
            TimerAction::HoldLevel => self.apply_hold_level(),
            TimerAction::LatchSettle => self.settle_latch(timers),
            TimerAction::LatchRedo => {
                let state = self.state;
                self.kick_latch(state, timers);
            }
            TimerAction::LatchRest => self.rest_latch(),
            // Interlock retries are requests, the bank handles them
            TimerAction::InterlockRetry { .. } => {}
        }
    }

    /// Drive duty for a power fraction, inverted when braking high
    fn duty(&self, power: f32) -> f32 {
        if self.config.brake_is_high {
            1.0 - power
        } else {
            power
        }
    }

    fn schedule_step<const N: usize>(
        &self,
        timers: &mut TimerQueue<N>,
        key: TimerKey,
        delay_ms: u32,
        action: TimerAction,
    ) {
        if let Err(e) = timers.for_owner(self.id).schedule(key, delay_ms, action) {
            log_error!("Solenoid '{}' could not schedule {:?}: {:?}", self.name(), action, e);
        }
    }

    fn control_ac_dc<const N: usize>(&mut self, state: bool, timers: &mut TimerQueue<N>) {
        timers.for_owner(self.id).cancel(TimerKey::StartHold);

        let on = state != self.config.inverted;
        let brake_is_high = self.config.brake_is_high;

        if on {
            let duty = self.duty(self.config.energise_power);
            self.outputs.brake.set_state(brake_is_high);
            self.outputs.drive.set_level(duty);
            if let Some(enable) = self.outputs.enable.as_mut() {
                enable.turn_on();
            }

            self.schedule_step(
                timers,
                TimerKey::StartHold,
                self.config.energise_duration_ms as u32,
                TimerAction::HoldLevel,
            );
            return;
        }

        let off_level = !brake_is_high;
        if let Some(enable) = self.outputs.enable.as_mut() {
            enable.turn_off();
        }
        self.outputs.brake.set_state(off_level);
        self.outputs.drive.set_level(level(off_level));
    }

    fn apply_hold_level(&mut self) {
        let duty = self.duty(self.config.hold_power);
        self.outputs.drive.set_level(duty);
    }

    fn kick_latch<const N: usize>(&mut self, state: bool, timers: &mut TimerQueue<N>) {
        timers.for_owner(self.id).cancel(TimerKey::LatchPulse);

        let on = state != self.config.inverted;
        let on_level = !self.config.brake_is_high;
        let off_level = !on_level;

        let kick = self.redo_trigger_count.saturating_add(1);
        log_debug!(
            "Kicking DC latch '{}' {} (kick {})",
            self.name(),
            if on { "on" } else { "off" },
            kick
        );

        if on {
            self.outputs.drive.set_level(level(on_level));
            self.outputs.brake.set_state(off_level);
        } else {
            self.outputs.drive.set_level(level(off_level));
            self.outputs.brake.set_state(on_level);
        }
        if let Some(enable) = self.outputs.enable.as_mut() {
            enable.turn_on();
        }

        self.latch_phase = LatchPhase::Kicked { kick };
        self.schedule_step(
            timers,
            TimerKey::LatchPulse,
            self.config.energise_duration_ms as u32,
            TimerAction::LatchSettle,
        );
    }

    fn settle_latch<const N: usize>(&mut self, timers: &mut TimerQueue<N>) {
        // Brake rather than coast so the field collapses slowly and the
        // plunger stays on its retaining magnet
        let off_level = self.config.brake_is_high;
        self.outputs.drive.set_level(level(off_level));
        self.outputs.brake.set_state(off_level);

        let trigger = self.redo_trigger_count;
        self.redo_trigger_count = trigger.saturating_add(1);
        if trigger < self.config.dc_latch_redo_count {
            self.latch_phase = LatchPhase::Settling {
                kick: self.redo_trigger_count,
            };
            self.schedule_step(
                timers,
                TimerKey::LatchPulse,
                self.config.dc_latch_redo_interval_ms as u32,
                TimerAction::LatchRedo,
            );
            return;
        }

        self.redo_trigger_count = 0;

        // Both lines of a 2-pin bridge can't move to rest at the same
        // instant and the skew kicks the plunger, so only rest with an
        // enable line to switch off first
        if self.outputs.has_enable() {
            self.latch_phase = LatchPhase::Resting;
            self.schedule_step(
                timers,
                TimerKey::LatchPulse,
                LATCH_REST_DELAY_MS,
                TimerAction::LatchRest,
            );
        } else {
            self.latch_phase = LatchPhase::Idle;
        }
    }

    fn rest_latch(&mut self) {
        if let Some(enable) = self.outputs.enable.as_mut() {
            enable.turn_off();
        }
        let resting = !self.config.brake_is_high;
        self.outputs.drive.set_level(level(resting));
        self.outputs.brake.set_state(resting);
        self.latch_phase = LatchPhase::Idle;
    }
}

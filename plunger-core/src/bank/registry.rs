//! Solenoid registry

use heapless::Vec;

use plunger_hal::{BinaryOutput, FloatOutput};

use super::events::EventQueue;
use super::{BankError, RequestOutcome, SwitchEvent};
use crate::config::{BankConfig, SolenoidConfig, MAX_SOLENOIDS};
use crate::solenoid::{Solenoid, SolenoidId, SolenoidOutputs};
use crate::timer::{TimerAction, TimerId, TimerQueue};

/// Timer slots: interlock wait plus one sequence slot per solenoid
pub const MAX_TIMERS: usize = 2 * MAX_SOLENOIDS;

/// A bank of solenoids sharing one timer queue
///
/// All solenoids in a bank use the same output line types (`A` for the
/// drive line, `B` for brake and enable lines).
pub struct SolenoidBank<A, B> {
    pub(crate) solenoids: Vec<Solenoid<A, B>, MAX_SOLENOIDS>,
    pub(crate) timers: TimerQueue<MAX_TIMERS>,
    events: EventQueue,
}

impl<A, B> Default for SolenoidBank<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> SolenoidBank<A, B> {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            solenoids: Vec::new(),
            timers: TimerQueue::new(),
            events: EventQueue::default(),
        }
    }

    /// Add a solenoid, returning its handle
    pub fn add(
        &mut self,
        config: SolenoidConfig,
        outputs: SolenoidOutputs<A, B>,
    ) -> Result<SolenoidId, BankError> {
        let id = SolenoidId::new(self.solenoids.len() as u8);
        self.solenoids
            .push(Solenoid::new(id, config, outputs))
            .map_err(|_| BankError::Full)?;
        Ok(id)
    }

    /// Assign the interlock set of a solenoid
    ///
    /// May only be called once per solenoid. Self references are kept but
    /// ignored when interlocks are evaluated.
    pub fn set_interlock(&mut self, id: SolenoidId, peers: &[SolenoidId]) -> Result<(), BankError> {
        if peers.iter().any(|p| p.index() >= self.solenoids.len()) {
            return Err(BankError::UnknownSolenoid);
        }

        let solenoid = self
            .solenoids
            .get_mut(id.index())
            .ok_or(BankError::UnknownSolenoid)?;

        if solenoid.interlock_configured {
            return Err(BankError::AlreadyConfigured);
        }

        solenoid.interlock =
            Vec::from_slice(peers).map_err(|_| BankError::TooManyInterlocks)?;
        solenoid.interlock_configured = true;
        Ok(())
    }

    /// Build a bank from a validated configuration
    ///
    /// `outputs` is called once per solenoid, in configuration order, to
    /// obtain its output lines; `None` means the board has no lines left for
    /// it. Interlocks are resolved by name.
    pub fn from_config<F>(config: &BankConfig, mut outputs: F) -> Result<Self, BankError>
    where
        F: FnMut(SolenoidId, &SolenoidConfig) -> Option<SolenoidOutputs<A, B>>,
    {
        config.validate()?;

        let mut bank = Self::new();
        for solenoid in config.solenoids.iter() {
            let id = SolenoidId::new(bank.solenoids.len() as u8);
            let Some(lines) = outputs(id, solenoid) else {
                log_error!("No output lines for solenoid '{}'", solenoid.name.as_str());
                return Err(BankError::NoOutputs);
            };
            bank.add(solenoid.clone(), lines)?;
        }

        for (index, solenoid) in config.solenoids.iter().enumerate() {
            if solenoid.interlock.is_empty() {
                continue;
            }
            let mut peers: Vec<SolenoidId, MAX_SOLENOIDS> = Vec::new();
            for name in solenoid.interlock.iter() {
                let peer = bank
                    .find(name.as_str())
                    .ok_or(BankError::UnknownSolenoid)?;
                peers.push(peer).map_err(|_| BankError::TooManyInterlocks)?;
            }
            bank.set_interlock(SolenoidId::new(index as u8), &peers)?;
        }

        Ok(bank)
    }

    /// Number of solenoids
    pub fn len(&self) -> usize {
        self.solenoids.len()
    }

    /// Check if the bank is empty
    pub fn is_empty(&self) -> bool {
        self.solenoids.is_empty()
    }

    /// Handles of all solenoids
    pub fn ids(&self) -> impl Iterator<Item = SolenoidId> + '_ {
        self.solenoids.iter().map(|s| s.id())
    }

    /// Look up a solenoid
    pub fn get(&self, id: SolenoidId) -> Option<&Solenoid<A, B>> {
        self.solenoids.get(id.index())
    }

    /// Look up a solenoid mutably
    pub fn get_mut(&mut self, id: SolenoidId) -> Option<&mut Solenoid<A, B>> {
        self.solenoids.get_mut(id.index())
    }

    /// Find a solenoid by name
    pub fn find(&self, name: &str) -> Option<SolenoidId> {
        self.solenoids
            .iter()
            .find(|s| s.name() == name)
            .map(|s| s.id())
    }

    /// Last published state of a solenoid
    pub fn state(&self, id: SolenoidId) -> Option<bool> {
        self.get(id).map(|s| s.state())
    }

    /// Shared timer queue
    pub fn timers(&self) -> &TimerQueue<MAX_TIMERS> {
        &self.timers
    }

    /// Current bank time (ms)
    pub fn now_ms(&self) -> u64 {
        self.timers.now_ms()
    }

    /// Take the oldest published state change
    pub fn pop_event(&mut self) -> Option<SwitchEvent> {
        self.events.pop()
    }

    /// Number of unread state changes
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Record a new logical state and notify observers
    pub(crate) fn publish(&mut self, id: SolenoidId, state: bool) {
        if let Some(solenoid) = self.solenoids.get_mut(id.index()) {
            solenoid.state = state;
            self.events.push(SwitchEvent { id, state });
        }
    }
}

impl<A: FloatOutput, B: BinaryOutput> SolenoidBank<A, B> {
    /// Request logical on
    pub fn turn_on(&mut self, id: SolenoidId) -> RequestOutcome {
        self.request_state(id, true)
    }

    /// Request logical off
    pub fn turn_off(&mut self, id: SolenoidId) -> RequestOutcome {
        self.request_state(id, false)
    }

    /// Request the opposite of the last published state
    pub fn toggle(&mut self, id: SolenoidId) -> RequestOutcome {
        match self.state(id) {
            Some(state) => self.request_state(id, !state),
            None => RequestOutcome::Ignored,
        }
    }

    /// Drive a solenoid whose interlocks are clear, then publish
    pub(crate) fn drive(&mut self, id: SolenoidId, state: bool) -> RequestOutcome {
        let Some(solenoid) = self.solenoids.get_mut(id.index()) else {
            return RequestOutcome::Ignored;
        };

        if !solenoid.drive(state, &mut self.timers) {
            return RequestOutcome::Ignored;
        }

        self.publish(id, state);
        RequestOutcome::Driven
    }

    /// Advance time and run every timer due at or before `now_ms`
    ///
    /// Timers fire in deadline order; follow-up steps they schedule are
    /// timed from their own deadline and fire in the same tick if due.
    pub fn tick(&mut self, now_ms: u64) {
        while let Some((timer, action)) = self.timers.pop_due(now_ms) {
            self.dispatch(timer, action);
        }
        self.timers.advance(now_ms);
    }

    fn dispatch(&mut self, timer: TimerId, action: TimerAction) {
        match action {
            TimerAction::InterlockRetry { state } => {
                // Peers are evaluated again, they may have changed while waiting
                self.request_state(timer.owner, state);
            }
            _ => {
                if let Some(solenoid) = self.solenoids.get_mut(timer.owner.index()) {
                    solenoid.on_timer(action, &mut self.timers);
                }
            }
        }
    }

    /// Drive every solenoid to its boot state
    ///
    /// `restored` supplies the externally persisted state, if any; the
    /// solenoid's restore mode decides how it is used. Solenoids whose
    /// restore mode yields nothing are turned off.
    pub fn setup<F>(&mut self, mut restored: F)
    where
        F: FnMut(SolenoidId) -> Option<bool>,
    {
        for index in 0..self.solenoids.len() {
            let id = SolenoidId::new(index as u8);
            let solenoid = &self.solenoids[index];
            log_info!("Setting up solenoid '{}'...", solenoid.name());

            let initial = solenoid
                .config()
                .restore_mode
                .initial_state(restored(id))
                .unwrap_or(false);

            self.request_state(id, initial);
        }
    }

    /// Log the configuration of every solenoid
    pub fn dump_config(&self) {
        for solenoid in self.solenoids.iter() {
            let config = solenoid.config();
            log_info!("Solenoid '{}'", solenoid.name());
            if config.kind == crate::config::SolenoidKind::Unsupported {
                log_error!("  Solenoid type: invalid solenoid_type selection");
            } else {
                log_info!("  Solenoid type: {}", config.kind.as_str());
            }
            log_info!(
                "  Enable pin {}defined",
                if solenoid.outputs().has_enable() { "" } else { "not " }
            );
            log_info!(
                "  Brake is {}",
                if config.brake_is_high { "high" } else { "low" }
            );
            log_info!("  Energise duration: {}ms", config.energise_duration_ms);
            log_info!("  Energise power: {}", config.energise_power);
            log_info!("  Hold power: {}", config.hold_power);
            log_info!("  Inverted: {}", config.inverted);
            if config.kind == crate::config::SolenoidKind::DcLatching {
                log_info!(
                    "  Latch redo: {} every {}ms",
                    config.dc_latch_redo_count,
                    config.dc_latch_redo_interval_ms
                );
            }

            if !solenoid.interlock().is_empty() {
                log_info!("  Interlocks (wait {}ms):", config.interlock_wait_time_ms);
                for peer in solenoid.interlock().iter() {
                    if *peer == solenoid.id() {
                        continue;
                    }
                    if let Some(p) = self.get(*peer) {
                        log_info!("    {}", p.name());
                    }
                }
            }
        }
    }
}

//! Solenoid actuator state

use heapless::Vec;

use crate::config::{SolenoidConfig, SolenoidKind, MAX_INTERLOCKS};

use super::{LatchPhase, SolenoidId};

/// Output lines of one H-bridge channel
///
/// - `drive`: modulated input (PWM level)
/// - `brake`: held input, its level selects brake vs. coast
/// - `enable`: optional bridge enable on 3-pin drivers
#[derive(Debug)]
pub struct SolenoidOutputs<A, B> {
    /// Analog drive line
    pub drive: A,
    /// Binary brake line
    pub brake: B,
    /// Optional binary enable line
    pub enable: Option<B>,
}

impl<A, B> SolenoidOutputs<A, B> {
    /// Two-pin bridge (no enable line)
    pub fn new(drive: A, brake: B) -> Self {
        Self {
            drive,
            brake,
            enable: None,
        }
    }

    /// Three-pin bridge with an enable line
    pub fn with_enable(drive: A, brake: B, enable: B) -> Self {
        Self {
            drive,
            brake,
            enable: Some(enable),
        }
    }

    /// Check if an enable line is wired
    pub fn has_enable(&self) -> bool {
        self.enable.is_some()
    }
}

/// A solenoid-controlled switch
///
/// Configuration is fixed at construction. The interlock set may be
/// assigned once; everything else is managed by the drive engine.
#[derive(Debug)]
pub struct Solenoid<A, B> {
    pub(crate) id: SolenoidId,
    pub(crate) config: SolenoidConfig,
    pub(crate) outputs: SolenoidOutputs<A, B>,
    /// Last published logical state
    pub(crate) state: bool,
    /// Latch kicks performed in the current sequence
    pub(crate) redo_trigger_count: u8,
    pub(crate) latch_phase: LatchPhase,
    pub(crate) interlock: Vec<SolenoidId, MAX_INTERLOCKS>,
    pub(crate) interlock_configured: bool,
}

impl<A, B> Solenoid<A, B> {
    /// Create a solenoid in the off state
    ///
    /// Outputs are not written until the first request.
    pub fn new(id: SolenoidId, config: SolenoidConfig, outputs: SolenoidOutputs<A, B>) -> Self {
        Self {
            id,
            config,
            outputs,
            state: false,
            redo_trigger_count: 0,
            latch_phase: LatchPhase::Idle,
            interlock: Vec::new(),
            interlock_configured: false,
        }
    }

    /// Bank handle
    pub fn id(&self) -> SolenoidId {
        self.id
    }

    /// Solenoid name
    pub fn name(&self) -> &str {
        self.config.name.as_str()
    }

    /// Solenoid kind
    pub fn kind(&self) -> SolenoidKind {
        self.config.kind
    }

    /// Configuration
    pub fn config(&self) -> &SolenoidConfig {
        &self.config
    }

    /// Last published logical state
    pub fn state(&self) -> bool {
        self.state
    }

    /// Output lines
    pub fn outputs(&self) -> &SolenoidOutputs<A, B> {
        &self.outputs
    }

    /// Mutable output lines
    pub fn outputs_mut(&mut self) -> &mut SolenoidOutputs<A, B> {
        &mut self.outputs
    }

    /// Current DC-latching phase
    pub fn latch_phase(&self) -> LatchPhase {
        self.latch_phase
    }

    /// Latch kicks performed in the current sequence
    pub fn redo_trigger_count(&self) -> u8 {
        self.redo_trigger_count
    }

    /// Solenoids forced off before this one turns on
    pub fn interlock(&self) -> &[SolenoidId] {
        &self.interlock
    }

    /// Check if the interlock set has been assigned
    pub fn interlock_configured(&self) -> bool {
        self.interlock_configured
    }
}

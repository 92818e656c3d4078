//! DC-latching sequence phases
//!
//! ```text
//!            energise_duration          redo_interval
//!  Idle ──► Kicked{1} ──────────► Settling{1} ──────► Kicked{2} ──► ...
//!                                                                   │
//!             redo budget spent, enable line present                ▼
//!  Idle ◄──────────── Resting ◄──────────────────────────── Kicked{N+1}
//!         1000 ms                 (no enable line: straight to Idle)
//! ```

/// Current step of a DC-latching sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LatchPhase {
    /// No sequence running
    #[default]
    Idle,
    /// Kick pulse applied, waiting to settle
    Kicked {
        /// Kick number, starting at 1
        kick: u8,
    },
    /// Settled after a kick, waiting to kick again
    Settling {
        /// Kick number that just settled
        kick: u8,
    },
    /// Redo budget spent, waiting to disable the bridge and rest
    Resting,
}

impl LatchPhase {
    /// Check if a sequence is still in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, LatchPhase::Idle)
    }
}

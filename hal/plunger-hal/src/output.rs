//! Output line abstractions
//!
//! An H-bridge driving a solenoid needs one analog-capable "drive" line and
//! one or two binary lines (brake, optional enable). Writes are
//! fire-and-forget: implementations deal with their own hardware faults.

/// Analog output line accepting a level in `[0.0, 1.0]`
///
/// Out-of-range levels are passed through by callers; clamping (if any)
/// is the implementation's job.
pub trait FloatOutput {
    /// Set the output level (0.0 = fully low, 1.0 = fully high)
    fn set_level(&mut self, level: f32);
}

/// Binary output line
pub trait BinaryOutput {
    /// Drive the line to a specific state
    fn set_state(&mut self, state: bool);

    /// Drive the line high
    fn turn_on(&mut self) {
        self.set_state(true);
    }

    /// Drive the line low
    fn turn_off(&mut self) {
        self.set_state(false);
    }
}

impl<T: FloatOutput + ?Sized> FloatOutput for &mut T {
    fn set_level(&mut self, level: f32) {
        (**self).set_level(level);
    }
}

impl<T: BinaryOutput + ?Sized> BinaryOutput for &mut T {
    fn set_state(&mut self, state: bool) {
        (**self).set_state(state);
    }
}

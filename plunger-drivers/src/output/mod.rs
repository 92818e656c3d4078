//! Output line drivers
//!
//! Write errors from the underlying peripheral are not propagated: the
//! drive engine has no way to recover from them mid-sequence. Each line
//! counts its failed writes instead so the firmware can report them.

mod gpio;
mod pwm;

pub use gpio::GpioLine;
pub use pwm::PwmLine;

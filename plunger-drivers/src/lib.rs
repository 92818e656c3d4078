//! Hardware driver implementations
//!
//! This crate adapts `embedded-hal` peripherals to the output line traits
//! defined in plunger-hal:
//!
//! - PWM channel as a [`FloatOutput`](plunger_hal::FloatOutput) drive line
//! - GPIO pin as a [`BinaryOutput`](plunger_hal::BinaryOutput) brake or
//!   enable line

#![no_std]
#![deny(unsafe_code)]

pub mod output;

pub use output::{GpioLine, PwmLine};

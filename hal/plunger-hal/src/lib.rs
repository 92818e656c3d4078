//! Plunger Hardware Abstraction Layer
//!
//! This crate defines the output line traits a solenoid driver is wired
//! to. Chip-specific adapters (see `plunger-drivers`) implement them on top
//! of `embedded-hal` PWM channels and GPIO pins, which lets the drive
//! sequencing in `plunger-core` run unchanged on hardware and on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  plunger-core (drive engine, interlock) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  plunger-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  plunger-drivers (embedded-hal adapters)│
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`output::FloatOutput`] - Analog (PWM) drive line
//! - [`output::BinaryOutput`] - Digital brake / enable line

#![no_std]
#![deny(unsafe_code)]

pub mod output;

pub use output::{BinaryOutput, FloatOutput};

//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod button;
pub mod solenoid;

pub use button::button_task;
pub use solenoid::solenoid_task;

//! Mock output lines for host tests
//!
//! Every mock can share a [`Trace`] so tests can check the order in which
//! the engine wrote to the lines of one bridge.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use plunger_hal::{BinaryOutput, FloatOutput};

use crate::solenoid::SolenoidOutputs;

/// One recorded write
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Write {
    Drive(f32),
    Brake(bool),
    Enable(bool),
}

/// Shared write log
pub type Trace = Rc<RefCell<Vec<Write>>>;

pub fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug)]
pub struct MockLevel {
    pub level: f32,
    pub writes: u32,
    trace: Trace,
}

impl FloatOutput for MockLevel {
    fn set_level(&mut self, level: f32) {
        self.level = level;
        self.writes += 1;
        self.trace.borrow_mut().push(Write::Drive(level));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Brake,
    Enable,
}

#[derive(Debug)]
pub struct MockLine {
    pub high: bool,
    pub writes: u32,
    role: Role,
    trace: Trace,
}

impl BinaryOutput for MockLine {
    fn set_state(&mut self, state: bool) {
        self.high = state;
        self.writes += 1;
        let write = match self.role {
            Role::Brake => Write::Brake(state),
            Role::Enable => Write::Enable(state),
        };
        self.trace.borrow_mut().push(write);
    }
}

pub type MockOutputs = SolenoidOutputs<MockLevel, MockLine>;

/// Build mock bridge outputs writing into `trace`
pub fn outputs(trace: &Trace, with_enable: bool) -> MockOutputs {
    let drive = MockLevel {
        level: 0.0,
        writes: 0,
        trace: trace.clone(),
    };
    let line = |role| MockLine {
        high: false,
        writes: 0,
        role,
        trace: trace.clone(),
    };
    if with_enable {
        SolenoidOutputs::with_enable(drive, line(Role::Brake), line(Role::Enable))
    } else {
        SolenoidOutputs::new(drive, line(Role::Brake))
    }
}

/// Assert two drive levels are equal within float rounding
pub fn assert_level(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "level {} != expected {}",
        actual,
        expected
    );
}

/// Count latch kicks: a drive write directly followed by a brake write at
/// the opposite level
pub fn kicks(trace: &Trace) -> usize {
    trace
        .borrow()
        .windows(2)
        .filter(|w| match (w[0], w[1]) {
            (Write::Drive(level), Write::Brake(brake)) => (level > 0.5) != brake,
            _ => false,
        })
        .count()
}

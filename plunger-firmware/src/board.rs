//! Board wiring
//!
//! Three H-bridge channels, each with a PWM drive input, a brake input and
//! an enable input. Pin assignments are board-specific:
//!
//! | Channel | Drive (PWM)      | Brake  | Enable |
//! |---------|------------------|--------|--------|
//! | 0       | GPIO6 (slice 3A) | GPIO7  | GPIO8  |
//! | 1       | GPIO10 (slice 5A)| GPIO11 | GPIO12 |
//! | 2       | GPIO14 (slice 7A)| GPIO13 | -      |
//!
//! Channel 2 drives a 2-pin bridge with no enable input. A push button on
//! GPIO15 toggles one solenoid.

use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm, PwmOutput};
use embassy_rp::Peripherals;

use plunger_core::{SolenoidBank, SolenoidOutputs};
use plunger_drivers::{GpioLine, PwmLine};

/// Number of wired channels
pub const CHANNELS: usize = 3;

/// PWM top value: 125 MHz / 6250 = 20 kHz
const PWM_TOP: u16 = 6249;

pub type DriveLine = PwmLine<PwmOutput<'static>>;
pub type SwitchLine = GpioLine<Output<'static>>;
pub type ChannelOutputs = SolenoidOutputs<DriveLine, SwitchLine>;
pub type Bank = SolenoidBank<DriveLine, SwitchLine>;

/// Set up every channel's output lines and the toggle button
///
/// Lines start low (bridge coasting) and are not touched again until the
/// bank drives them.
pub fn init(p: Peripherals) -> ([Option<ChannelOutputs>; CHANNELS], Input<'static>) {
    let mut pwm_config = PwmConfig::default();
    pwm_config.top = PWM_TOP;
    pwm_config.compare_a = 0;

    let drive = |pwm: Pwm<'static>| pwm.split().0.map(PwmLine::new);

    let ch0 = drive(Pwm::new_output_a(p.PWM_SLICE3, p.PIN_6, pwm_config.clone())).map(|d| {
        SolenoidOutputs::with_enable(
            d,
            GpioLine::new_active_high(Output::new(p.PIN_7, Level::Low)),
            GpioLine::new_active_high(Output::new(p.PIN_8, Level::Low)),
        )
    });
    let ch1 = drive(Pwm::new_output_a(p.PWM_SLICE5, p.PIN_10, pwm_config.clone())).map(|d| {
        SolenoidOutputs::with_enable(
            d,
            GpioLine::new_active_high(Output::new(p.PIN_11, Level::Low)),
            GpioLine::new_active_high(Output::new(p.PIN_12, Level::Low)),
        )
    });
    let ch2 = drive(Pwm::new_output_a(p.PWM_SLICE7, p.PIN_14, pwm_config)).map(|d| {
        SolenoidOutputs::new(d, GpioLine::new_active_high(Output::new(p.PIN_13, Level::Low)))
    });

    // Active-low push button to ground
    let button = Input::new(p.PIN_15, Pull::Up);

    ([ch0, ch1, ch2], button)
}

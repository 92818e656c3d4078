//! PWM drive line

use embedded_hal::pwm::SetDutyCycle;

use plunger_hal::FloatOutput;

/// PWM channel driven by a level in `[0.0, 1.0]`
///
/// Levels outside the range are clamped. The level is scaled to the
/// channel's maximum duty cycle and rounded to the nearest step.
pub struct PwmLine<P> {
    pwm: P,
    level: f32,
    faults: u32,
}

impl<P: SetDutyCycle> PwmLine<P> {
    /// Wrap a PWM channel
    ///
    /// The channel is not written until the first `set_level`.
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            level: 0.0,
            faults: 0,
        }
    }

    /// Last level written (after clamping)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Number of failed duty cycle writes
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    /// Release the PWM channel
    pub fn release(self) -> P {
        self.pwm
    }

    fn duty_for(&self, level: f32) -> u16 {
        let max = self.pwm.max_duty_cycle() as f32;
        // Round to nearest without libm
        (level * max + 0.5) as u16
    }
}

impl<P: SetDutyCycle> FloatOutput for PwmLine<P> {
    fn set_level(&mut self, level: f32) {
        let level = if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        };
        self.level = level;

        let duty = self.duty_for(level);
        if self.pwm.set_duty_cycle(duty).is_err() {
            self.faults = self.faults.saturating_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("PWM duty write failed ({} total)", self.faults);
        }
    }
}

//! GPIO binary line
//!
//! Brake and enable inputs of an H-bridge driven directly from a pin. The
//! pin can be configured as active-high (default) or active-low.

use embedded_hal::digital::OutputPin;

use plunger_hal::BinaryOutput;

/// GPIO output line
pub struct GpioLine<P> {
    pin: P,
    /// If true, logical high = pin LOW
    inverted: bool,
    /// Last logical state written
    state: bool,
    faults: u32,
}

impl<P: OutputPin> GpioLine<P> {
    /// Create a new GPIO line
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the line is high when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            state: false,
            faults: 0,
        }
    }

    /// Create an active-high line
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create an active-low line
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Last logical state written
    pub fn state(&self) -> bool {
        self.state
    }

    /// Number of failed pin writes
    pub fn fault_count(&self) -> u32 {
        self.faults
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> BinaryOutput for GpioLine<P> {
    fn set_state(&mut self, state: bool) {
        self.state = state;

        let pin_high = state != self.inverted;
        let result = if pin_high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        if result.is_err() {
            self.faults = self.faults.saturating_add(1);
            #[cfg(feature = "defmt")]
            defmt::warn!("GPIO write failed ({} total)", self.faults);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct MockPin {
        high: bool,
        writes: u32,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                writes: 0,
            }
        }
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    struct FailingPin;

    impl ErrorType for FailingPin {
        type Error = ErrorKind;
    }

    impl OutputPin for FailingPin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn test_new_does_not_write() {
        let line = GpioLine::new_active_high(MockPin::new());
        assert_eq!(line.pin.writes, 0);
        assert!(!line.state());
    }

    #[test]
    fn test_active_high() {
        let mut line = GpioLine::new_active_high(MockPin::new());

        line.turn_on();
        assert!(line.pin.high);
        assert!(line.state());

        line.turn_off();
        assert!(!line.pin.high);
    }

    #[test]
    fn test_active_low() {
        let mut line = GpioLine::new_active_low(MockPin::new());

        line.set_state(true);
        assert!(!line.pin.high);
        assert!(line.state());

        line.set_state(false);
        assert!(line.pin.high);
    }

    #[test]
    fn test_failed_write_counted() {
        let mut line = GpioLine::new_active_high(FailingPin);

        line.turn_on();
        assert_eq!(line.fault_count(), 1);
        assert!(line.state());
    }
}

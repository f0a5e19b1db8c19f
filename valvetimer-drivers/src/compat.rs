//! `embedded-hal` 1.0 pin adapters
//!
//! Wraps `embedded-hal` digital pins so they can be used with the drivers
//! in this crate. Pin errors are dropped; the boards this targets have
//! infallible GPIO.

use embedded_hal::digital::{InputPin as EhInputPin, OutputPin as EhOutputPin, PinState};
use valvetimer_hal::{InputPin, OutputPin};

/// Output pin adapter
///
/// `embedded-hal` reads back output state through `&mut self`, so the last
/// written level is tracked here instead.
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P: EhOutputPin> EhOutput<P> {
    /// Wrap a pin and drive it to `initial_high`
    pub fn new(mut pin: P, initial_high: bool) -> Self {
        let _ = pin.set_state(PinState::from(initial_high));
        Self {
            pin,
            high: initial_high,
        }
    }

    /// Unwrap the inner pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: EhOutputPin> OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input pin adapter
pub struct EhInput<P>(pub P);

impl<P: EhInputPin> InputPin for EhInput<P> {
    fn is_high(&mut self) -> bool {
        // A failed read counts as released on active-high wiring
        self.0.is_high().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct FakePin {
        high: bool,
        writes: u32,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl EhOutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.writes += 1;
            Ok(())
        }
    }

    impl EhInputPin for FakePin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    #[test]
    fn test_output_tracks_level() {
        let mut pin = EhOutput::new(FakePin { high: false, writes: 0 }, true);
        assert!(pin.is_set_high());

        pin.set_state(false);
        assert!(pin.is_set_low());

        let inner = pin.into_inner();
        assert!(!inner.high);
        assert_eq!(inner.writes, 2);
    }

    #[test]
    fn test_input_reads_level() {
        let mut pin = EhInput(FakePin { high: true, writes: 0 });
        assert!(pin.is_high());
        pin.0.high = false;
        assert!(InputPin::is_low(&mut pin));
    }
}

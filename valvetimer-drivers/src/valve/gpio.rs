//! GPIO valve output
//!
//! Drives a valve through a single GPIO line (directly or via a driver
//! transistor or relay).

use valvetimer_core::state::Valve;
use valvetimer_core::traits::ValveOutput;
use valvetimer_hal::OutputPin;

/// GPIO valve output
///
/// Board inversion is handled here and nowhere else.
pub struct GpioValve<P> {
    pin: P,
    /// If true, valve OPEN = pin LOW
    inverted: bool,
    position: Valve,
}

impl<P: OutputPin> GpioValve<P> {
    /// Create a valve output and drive it closed
    ///
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the valve opens when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut valve = Self {
            pin,
            inverted,
            position: Valve::Closed,
        };
        valve.set(Valve::Closed);
        valve
    }

    /// Valve that opens when the pin is HIGH
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Valve that opens when the pin is LOW
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Whether the line is inverted
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Give back the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> ValveOutput for GpioValve<P> {
    fn set(&mut self, valve: Valve) {
        self.position = valve;
        let open = valve == Valve::Open;
        self.pin.set_state(open != self.inverted);
    }

    fn position(&self) -> Valve {
        self.position
    }
}

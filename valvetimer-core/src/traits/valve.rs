//! Valve output trait

use crate::state::Valve;

/// Trait for the valve drive line
///
/// Implementations map Open/Closed onto electrical levels. Any inversion
/// required by the board wiring lives in the implementation and nowhere
/// else.
pub trait ValveOutput {
    /// Drive the valve to the given position
    fn set(&mut self, valve: Valve);

    /// Position last driven
    fn position(&self) -> Valve;

    /// Check if the valve is currently driven open
    fn is_open(&self) -> bool {
        self.position() == Valve::Open
    }
}

impl<T: ValveOutput + ?Sized> ValveOutput for &mut T {
    fn set(&mut self, valve: Valve) {
        (**self).set(valve)
    }

    fn position(&self) -> Valve {
        (**self).position()
    }
}

//! Interrupt suspension
//!
//! Flash erase and program sequences must not be interleaved with anything
//! that touches flash-adjacent state, most notably the display refresh.

/// Suspends and resumes the interrupt sources that could re-enter flash
/// or display-refresh logic
///
/// Calls are always paired; `resume` must be safe to call after a failed
/// flash operation.
pub trait IrqGate {
    /// Stop the periodic refresh and mask interrupts
    fn suspend(&mut self);

    /// Unmask interrupts and restart the periodic refresh
    fn resume(&mut self);
}

impl<T: IrqGate + ?Sized> IrqGate for &mut T {
    fn suspend(&mut self) {
        (**self).suspend();
    }

    fn resume(&mut self) {
        (**self).resume();
    }
}

/// RAII guard holding an [`IrqGate`] suspended
///
/// Resumes on drop, so every early return out of a critical section
/// restores interrupts.
pub struct IrqSuspended<'a, G: IrqGate + ?Sized> {
    gate: &'a mut G,
}

impl<'a, G: IrqGate + ?Sized> IrqSuspended<'a, G> {
    /// Suspend the gate until the returned guard is dropped
    pub fn new(gate: &'a mut G) -> Self {
        gate.suspend();
        Self { gate }
    }
}

impl<G: IrqGate + ?Sized> Drop for IrqSuspended<'_, G> {
    fn drop(&mut self) {
        self.gate.resume();
    }
}

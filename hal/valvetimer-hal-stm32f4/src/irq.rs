//! Interrupt masking for flash critical sections

use valvetimer_hal::IrqGate;

/// Masks all maskable interrupts while suspended
///
/// Restores the previous PRIMASK state on resume, so nesting inside an
/// already masked region leaves interrupts masked.
#[derive(Debug, Default)]
pub struct CortexMIrqGate {
    restore: bool,
}

impl CortexMIrqGate {
    pub const fn new() -> Self {
        Self { restore: false }
    }
}

impl IrqGate for CortexMIrqGate {
    fn suspend(&mut self) {
        self.restore = cortex_m::register::primask::read().is_active();
        cortex_m::interrupt::disable();
    }

    fn resume(&mut self) {
        if self.restore {
            self.restore = false;
            // SAFETY: interrupts were enabled when `suspend` ran and the
            // flash sequence it guarded has finished.
            unsafe { cortex_m::interrupt::enable() };
        }
    }
}

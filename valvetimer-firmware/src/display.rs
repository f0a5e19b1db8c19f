//! Shared 7-segment display state
//!
//! The controller task writes digits through [`DisplayHandle`]; the refresh
//! task scans them out. Flash writes pause scanning through [`RefreshGate`].

use core::cell::RefCell;

use embassy_stm32::gpio::Output;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use valvetimer_core::traits::NumericDisplay;
use valvetimer_drivers::compat::EhOutput;
use valvetimer_drivers::display::{DigitBuffer, Multiplexer, PinSegments};
use valvetimer_hal::IrqGate;
use valvetimer_hal_stm32f4::CortexMIrqGate;

pub type BoardPin = EhOutput<Output<'static>>;
pub type BoardMux = Multiplexer<PinSegments<BoardPin>, BoardPin>;

struct Shared {
    buffer: DigitBuffer,
    paused: bool,
    mux: Option<BoardMux>,
}

static DISPLAY: Mutex<CriticalSectionRawMutex, RefCell<Shared>> = Mutex::new(RefCell::new(Shared {
    buffer: DigitBuffer::new(),
    paused: false,
    mux: None,
}));

/// Hand the multiplexer to the refresh path
pub fn install(mux: BoardMux) {
    DISPLAY.lock(|shared| shared.borrow_mut().mux = Some(mux));
}

/// Light the next digit
pub fn refresh() {
    DISPLAY.lock(|shared| {
        let shared = &mut *shared.borrow_mut();
        if shared.paused {
            return;
        }
        if let Some(mux) = shared.mux.as_mut() {
            mux.refresh(&shared.buffer);
        }
    });
}

/// Writer side of the shared digit buffer
pub struct DisplayHandle;

impl NumericDisplay for DisplayHandle {
    fn set_number(&mut self, value: u16) {
        DISPLAY.lock(|shared| shared.borrow_mut().buffer.set_number(value));
    }

    fn set_decimal_point(&mut self, position: u8, on: bool) {
        DISPLAY.lock(|shared| shared.borrow_mut().buffer.set_decimal_point(position, on));
    }
}

/// Blanks the display and masks interrupts around flash writes
pub struct RefreshGate {
    irq: CortexMIrqGate,
}

impl RefreshGate {
    pub const fn new() -> Self {
        Self {
            irq: CortexMIrqGate::new(),
        }
    }
}

impl IrqGate for RefreshGate {
    fn suspend(&mut self) {
        DISPLAY.lock(|shared| {
            let shared = &mut *shared.borrow_mut();
            shared.paused = true;
            if let Some(mux) = shared.mux.as_mut() {
                mux.blank();
            }
        });
        self.irq.suspend();
    }

    fn resume(&mut self) {
        self.irq.resume();
        DISPLAY.lock(|shared| shared.borrow_mut().paused = false);
    }
}

//! Multiplexed 7-segment display
//!
//! [`DigitBuffer`] holds the segment patterns for each digit and is what
//! the automaton writes to. [`Multiplexer`] lights one digit per
//! [`refresh`](Multiplexer::refresh) call; calling it from a fixed-rate
//! timer gives a steady image.
//!
//! Segment bits: `a` = bit 0 through `g` = bit 6, decimal point = bit 7.

use valvetimer_core::traits::{NumericDisplay, DISPLAY_MAX};
use valvetimer_hal::OutputPin;

/// Number of digits
pub const DIGITS: usize = 3;

/// Segment patterns for 0-9
pub const SEGMENT_CODES: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// Decimal point bit
pub const DP_BIT: u8 = 0x80;

/// Segment patterns for every digit, leftmost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DigitBuffer {
    digits: [u8; DIGITS],
}

impl DigitBuffer {
    /// Blank buffer
    pub const fn new() -> Self {
        Self {
            digits: [0; DIGITS],
        }
    }

    /// Buffer showing `value`
    pub fn with_number(value: u16) -> Self {
        let mut buffer = Self::new();
        buffer.set_number(value);
        buffer
    }

    /// Pattern for one digit; blank when out of range
    pub fn pattern(&self, index: usize) -> u8 {
        self.digits.get(index).copied().unwrap_or(0)
    }

    /// All patterns, leftmost first
    pub fn patterns(&self) -> [u8; DIGITS] {
        self.digits
    }
}

impl NumericDisplay for DigitBuffer {
    /// Clears every decimal point as well
    fn set_number(&mut self, value: u16) {
        let mut value = value.min(DISPLAY_MAX);
        self.digits = [0; DIGITS];

        if value == 0 {
            self.digits[DIGITS - 1] = SEGMENT_CODES[0];
            return;
        }

        for slot in self.digits.iter_mut().rev() {
            if value == 0 {
                break;
            }
            *slot = SEGMENT_CODES[(value % 10) as usize];
            value /= 10;
        }
    }

    fn set_decimal_point(&mut self, position: u8, on: bool) {
        let Some(slot) = self.digits.get_mut(position as usize) else {
            return;
        };
        if on {
            *slot |= DP_BIT;
        } else {
            *slot &= !DP_BIT;
        }
    }
}

/// Segment lines of the display, written as one pattern
pub trait SegmentBus {
    /// Drive the segment lines; bit set = segment lit
    fn write(&mut self, pattern: u8);
}

/// Segment bus built from eight individual pins, `a` first
pub struct PinSegments<P> {
    pins: [P; 8],
}

impl<P: OutputPin> PinSegments<P> {
    pub fn new(pins: [P; 8]) -> Self {
        Self { pins }
    }

    /// Pattern currently on the pins
    pub fn current(&self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .fold(0, |acc, (bit, pin)| acc | ((pin.is_set_high() as u8) << bit))
    }
}

impl<P: OutputPin> SegmentBus for PinSegments<P> {
    fn write(&mut self, pattern: u8) {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            pin.set_state(pattern & (1 << bit) != 0);
        }
    }
}

/// Digit scanner
///
/// Digit enable lines are active high.
pub struct Multiplexer<S, D> {
    segments: S,
    digits: [D; DIGITS],
    current: usize,
}

impl<S: SegmentBus, D: OutputPin> Multiplexer<S, D> {
    /// Create a scanner with every digit off
    pub fn new(segments: S, digits: [D; DIGITS]) -> Self {
        let mut mux = Self {
            segments,
            digits,
            current: 0,
        };
        mux.blank();
        mux
    }

    /// Show the next digit of `buffer`
    ///
    /// All digits are switched off before the segment lines change so the
    /// previous digit never shows the new pattern.
    pub fn refresh(&mut self, buffer: &DigitBuffer) {
        for digit in self.digits.iter_mut() {
            digit.set_low();
        }
        self.segments.write(buffer.pattern(self.current));
        self.digits[self.current].set_high();
        self.current = (self.current + 1) % DIGITS;
    }

    /// Switch every digit off
    pub fn blank(&mut self) {
        for digit in self.digits.iter_mut() {
            digit.set_low();
        }
        self.segments.write(0);
    }

    /// Digit the next refresh will light
    pub fn next_digit(&self) -> usize {
        self.current
    }

    /// Segment bus
    pub fn segments(&self) -> &S {
        &self.segments
    }

    /// Digit enable lines
    pub fn digits(&self) -> &[D; DIGITS] {
        &self.digits
    }
}

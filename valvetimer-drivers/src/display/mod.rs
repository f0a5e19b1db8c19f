//! Display implementations

pub mod seg7;

pub use seg7::{DigitBuffer, Multiplexer, PinSegments, SegmentBus, DIGITS, DP_BIT, SEGMENT_CODES};

//! Main-loop pacing
//!
//! Converts a free-running millisecond clock into one classifier poll per
//! elapsed millisecond and a drift-free one-second tick.

pub mod pacer;

pub use pacer::{TickPacer, SECOND_MS};

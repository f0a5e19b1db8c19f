//! Button input classification
//!
//! Turns a raw level sampled once per millisecond into discrete
//! short-press and long-press events.

pub mod button;

pub use button::{ButtonClassifier, ButtonEvent, PressState};

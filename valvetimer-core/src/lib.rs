//! Board-agnostic core logic for the valve timer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Button event classification (debounce, short/long press)
//! - State machine owning valve and countdown semantics
//! - Persisted configuration record and store
//! - Millisecond / one-second pacing of the main loop
//! - Output traits for valve, display and configuration persistence

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod input;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use controller::Appliance;

//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in valvetimer-core on top of the valvetimer-hal pin traits:
//!
//! - Valve output on a single GPIO line (optionally inverted)
//! - Multiplexed 3-digit 7-segment display
//! - Button input sampling
//! - Adapters from `embedded-hal` 1.0 pins

#![no_std]
#![deny(unsafe_code)]

pub mod compat;
pub mod display;
pub mod input;
pub mod valve;

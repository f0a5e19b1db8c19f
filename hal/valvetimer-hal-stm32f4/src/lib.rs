//! STM32F4-specific HAL for the Valvetimer firmware
//!
//! Implements the `valvetimer-hal` traits on top of embassy-stm32:
//!
//! - STM32F401CC (reference board, 256 KiB flash)
//!
//! # Features
//!
//! - `stm32f401cc` - chip selection, enabled by the firmware
//! - `defmt` - Enable debug formatting support
//!
//! # Usage
//!
//! The firmware takes the flash peripheral once at boot, wraps it in
//! [`ConfigFlash`] and hands it to the core configuration store together
//! with a [`CortexMIrqGate`]. GPIO pins come straight from embassy-stm32
//! through their `embedded-hal` implementations.

#![no_std]

pub mod flash;
pub mod irq;

pub use flash::ConfigFlash;
pub use irq::CortexMIrqGate;

// Re-export shared types from valvetimer-hal
pub use valvetimer_hal::flash::FlashError;

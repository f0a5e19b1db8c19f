//! Valvetimer Hardware Abstraction Layer
//!
//! This crate defines the narrow hardware capabilities the valve timer
//! needs. Chip-specific HALs implement them; the `mock` feature provides
//! in-memory doubles so the application logic can be tested on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (valvetimer-core, etc.)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  valvetimer-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ valvetimer-   │       │  mock (host   │
//! │  hal-stm32f4  │       │  test double) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`irq::IrqGate`] - Suspending interrupts around flash programming
//! - [`embedded_storage::nor_flash::NorFlash`] - Block storage (re-exported
//!   together with [`flash::FlashError`])

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod irq;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, NorFlash, ReadNorFlash, WORD_SIZE};
pub use gpio::{InputPin, OutputPin};
pub use irq::IrqGate;

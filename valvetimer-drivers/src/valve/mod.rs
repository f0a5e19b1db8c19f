//! Valve output implementations

pub mod gpio;

pub use gpio::GpioValve;

//! Hardware abstraction traits
//!
//! These traits define the interface between the appliance logic and the
//! board-specific output drivers.

pub mod display;
pub mod persist;
pub mod valve;

pub use display::{NumericDisplay, DISPLAY_MAX};
pub use persist::ConfigSink;
pub use valve::ValveOutput;

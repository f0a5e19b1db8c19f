//! Embassy async tasks
//!
//! The controller task owns all appliance state; the refresh task only
//! scans the shared digit buffer out to the display.

pub mod controller;
pub mod refresh;

pub use controller::{controller_task, Controller};
pub use refresh::refresh_task;

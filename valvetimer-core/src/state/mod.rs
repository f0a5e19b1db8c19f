//! Appliance control automaton
//!
//! Three states, three events. The automaton owns the valve position and
//! the countdown, and decides what the display shows.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{MachineContext, Ports, SaveOutcome, State, Step, Valve};

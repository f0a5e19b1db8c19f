//! Appliance main-loop body
//!
//! Ties the button classifier, the automaton and the pacer together. The
//! firmware calls [`Appliance::service`] whenever it wakes; every elapsed
//! millisecond gets exactly one button poll and each derived event is
//! dispatched immediately.

use crate::config::ButtonConfig;
use crate::input::ButtonClassifier;
use crate::scheduler::TickPacer;
use crate::state::{Event, MachineContext, Ports, Step};
use crate::traits::{ConfigSink, NumericDisplay, ValveOutput};

/// Single owner of all mutable appliance state
#[derive(Debug, Clone)]
pub struct Appliance {
    button: ButtonClassifier,
    machine: MachineContext,
    pacer: TickPacer,
}

impl Appliance {
    /// Create the appliance
    ///
    /// `initial_level_high` is the button pin level at boot and
    /// `configured_seconds` comes from the configuration store.
    pub fn new(
        config: ButtonConfig,
        initial_level_high: bool,
        configured_seconds: u8,
        now_ms: u32,
    ) -> Self {
        Self {
            button: ButtonClassifier::new(config, initial_level_high),
            machine: MachineContext::new(configured_seconds),
            pacer: TickPacer::new(now_ms),
        }
    }

    /// Drive the outputs from the boot context
    pub fn start<V, D, S>(&self, ports: &mut Ports<V, D, S>)
    where
        V: ValveOutput,
        D: NumericDisplay,
    {
        info!(
            "Appliance ready, countdown {} s",
            self.machine.configured_seconds
        );
        self.machine.apply_outputs(ports);
    }

    /// Catch up to `now_ms`
    ///
    /// `sample` reads the raw button level and is called once per
    /// unprocessed millisecond. `on_step` sees every processed event.
    /// Returns the number of events dispatched.
    pub fn service<V, D, S>(
        &mut self,
        now_ms: u32,
        mut sample: impl FnMut() -> bool,
        ports: &mut Ports<V, D, S>,
        mut on_step: impl FnMut(&Step),
    ) -> usize
    where
        V: ValveOutput,
        D: NumericDisplay,
        S: ConfigSink,
    {
        let mut dispatched = 0;

        while self.pacer.next_ms(now_ms).is_some() {
            if let Some(event) = self.button.poll(sample()) {
                let step = self.machine.process(Event::from(event), ports);
                on_step(&step);
                dispatched += 1;
            }
        }

        if self.pacer.second_due(now_ms) {
            let step = self.machine.process(Event::TickOneSecond, ports);
            on_step(&step);
            dispatched += 1;
        }

        dispatched
    }

    /// Current automaton context
    pub fn machine(&self) -> &MachineContext {
        &self.machine
    }

    /// Button classifier
    pub fn button(&self) -> &ButtonClassifier {
        &self.button
    }

    /// Pacer state
    pub fn pacer(&self) -> &TickPacer {
        &self.pacer
    }
}

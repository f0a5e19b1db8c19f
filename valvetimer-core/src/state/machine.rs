//! State machine definition
//!
//! Valve, countdown and display output are a function of the current
//! state and an event. The transition table:
//!
//! | State     | Event          | Action                               | Next      |
//! |-----------|----------------|--------------------------------------|-----------|
//! | Ready     | ShortPress     | open valve, load countdown           | Countdown |
//! | Ready     | LongPress      | start editing from configured value  | Config    |
//! | Countdown | ShortPress     | close valve                          | Ready     |
//! | Countdown | Tick, n > 0    | n -= 1, close valve on reaching 0    | Countdown |
//! | Countdown | Tick, n == 0   |                                      | Ready     |
//! | Config    | ShortPress     | step the edit cycle                  | Config    |
//! | Config    | LongPress      | commit and persist if changed        | Ready     |
//!
//! Anything else leaves the context untouched.

use super::events::Event;
use crate::config::{clamp_seconds, next_in_cycle, StoreError, SECONDS_MAX, SECONDS_MIN};
use crate::traits::{ConfigSink, NumericDisplay, ValveOutput};

/// Digit carrying the edit marker in configuration mode
pub const EDIT_MARKER_POSITION: u8 = 2;

/// Appliance states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Idle, showing the configured duration
    Ready,
    /// Valve open, counting down
    Countdown,
    /// Editing the configured duration
    Config,
}

impl State {
    /// Check if this state allows the valve to be open
    pub fn valve_allowed(&self) -> bool {
        matches!(self, State::Countdown)
    }

    /// Check if this state shows the edit marker
    pub fn is_editing(&self) -> bool {
        matches!(self, State::Config)
    }
}

/// Valve position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Valve {
    Open,
    Closed,
}

/// Result of a configuration save triggered by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveOutcome {
    /// Transition did not change the configured duration
    NotNeeded,
    /// New duration written to storage
    Saved,
    /// Write failed; the in-memory duration stays in effect
    Failed(StoreError),
}

/// Outcome of processing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub event: Event,
    pub from: State,
    pub to: State,
    pub save: SaveOutcome,
}

impl Step {
    /// Check if the state changed
    pub fn state_changed(&self) -> bool {
        self.from != self.to
    }
}

/// Outputs driven by the automaton
pub struct Ports<V, D, S> {
    pub valve: V,
    pub display: D,
    pub config: S,
}

impl<V, D, S> Ports<V, D, S> {
    pub fn new(valve: V, display: D, config: S) -> Self {
        Self {
            valve,
            display,
            config,
        }
    }
}

/// Mutable appliance state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineContext {
    pub state: State,
    pub valve: Valve,
    /// Persisted countdown duration
    pub configured_seconds: u8,
    /// Remaining seconds in Countdown, edit value in Config
    pub current_seconds: u8,
}

impl MachineContext {
    /// Boot context: Ready with the valve closed
    pub fn new(configured_seconds: u8) -> Self {
        Self {
            state: State::Ready,
            valve: Valve::Closed,
            configured_seconds: clamp_seconds(configured_seconds),
            current_seconds: 0,
        }
    }

    /// Check the context against the valve and range invariants
    ///
    /// The valve may only be open in Countdown with time remaining, and the
    /// configured duration must be in range.
    pub fn is_consistent(&self) -> bool {
        let valve_ok = match self.valve {
            Valve::Closed => true,
            Valve::Open => self.state.valve_allowed() && self.current_seconds > 0,
        };
        let range_ok = (SECONDS_MIN..=SECONDS_MAX).contains(&self.configured_seconds);
        valve_ok && range_ok
    }

    /// Number the display should show
    pub fn display_value(&self) -> u8 {
        match self.state {
            State::Ready => self.configured_seconds,
            State::Countdown | State::Config => self.current_seconds,
        }
    }

    /// Process an event and drive the outputs
    ///
    /// A context that fails [`is_consistent`](Self::is_consistent) is reset
    /// to Ready with the valve closed before the event is applied.
    pub fn process<V, D, S>(&mut self, event: Event, ports: &mut Ports<V, D, S>) -> Step
    where
        V: ValveOutput,
        D: NumericDisplay,
        S: ConfigSink,
    {
        if !self.is_consistent() {
            warn!("Inconsistent context {:?}, resetting", self);
            self.reset_safe();
        }

        let from = self.state;
        let mut save = SaveOutcome::NotNeeded;

        match (self.state, event) {
            (State::Ready, Event::ShortPress) => {
                self.current_seconds = self.configured_seconds;
                self.valve = Valve::Open;
                self.state = State::Countdown;
            }
            (State::Ready, Event::LongPress) => {
                self.current_seconds = self.configured_seconds;
                self.state = State::Config;
            }

            (State::Countdown, Event::ShortPress) => {
                self.valve = Valve::Closed;
                self.state = State::Ready;
            }
            (State::Countdown, Event::TickOneSecond) if self.current_seconds > 0 => {
                self.current_seconds -= 1;
                if self.current_seconds == 0 {
                    self.valve = Valve::Closed;
                }
            }
            (State::Countdown, Event::TickOneSecond) => {
                self.state = State::Ready;
            }

            (State::Config, Event::ShortPress) => {
                self.current_seconds = next_in_cycle(self.current_seconds);
            }
            (State::Config, Event::LongPress) => {
                if self.current_seconds != self.configured_seconds {
                    self.configured_seconds = self.current_seconds;
                    save = match ports.config.persist(self.configured_seconds) {
                        Ok(()) => SaveOutcome::Saved,
                        Err(e) => {
                            warn!("Config save failed: {:?}", e);
                            SaveOutcome::Failed(e)
                        }
                    };
                }
                self.state = State::Ready;
            }

            _ => {}
        }

        self.apply_outputs(ports);

        if from != self.state {
            debug!("State {:?} -> {:?} on {:?}", from, self.state, event);
        }

        Step {
            event,
            from,
            to: self.state,
            save,
        }
    }

    /// Drive valve and display from the context
    pub fn apply_outputs<V, D, S>(&self, ports: &mut Ports<V, D, S>)
    where
        V: ValveOutput,
        D: NumericDisplay,
    {
        if ports.valve.position() != self.valve {
            ports.valve.set(self.valve);
        }
        ports.display.set_number(u16::from(self.display_value()));
        ports
            .display
            .set_decimal_point(EDIT_MARKER_POSITION, self.state.is_editing());
    }

    fn reset_safe(&mut self) {
        self.state = State::Ready;
        self.valve = Valve::Closed;
        self.configured_seconds = clamp_seconds(self.configured_seconds);
        self.current_seconds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SECONDS_CYCLE, SECONDS_DEFAULT};
    use valvetimer_hal::FlashError;

    struct TestValve {
        position: Valve,
        writes: u32,
    }

    impl ValveOutput for TestValve {
        fn set(&mut self, valve: Valve) {
            self.position = valve;
            self.writes += 1;
        }

        fn position(&self) -> Valve {
            self.position
        }
    }

    #[derive(Default)]
    struct TestDisplay {
        number: u16,
        dp: [bool; 3],
    }

    impl NumericDisplay for TestDisplay {
        fn set_number(&mut self, value: u16) {
            self.number = value;
        }

        fn set_decimal_point(&mut self, position: u8, on: bool) {
            if let Some(dp) = self.dp.get_mut(position as usize) {
                *dp = on;
            }
        }
    }

    #[derive(Default)]
    struct TestSink {
        saved: Option<u8>,
        calls: u32,
        fail: bool,
    }

    impl ConfigSink for TestSink {
        fn persist(&mut self, seconds: u8) -> Result<(), StoreError> {
            self.calls += 1;
            if self.fail {
                return Err(StoreError::Erase(FlashError::Other));
            }
            self.saved = Some(seconds);
            Ok(())
        }
    }

    type TestPorts = Ports<TestValve, TestDisplay, TestSink>;

    fn ports() -> TestPorts {
        Ports::new(
            TestValve {
                position: Valve::Closed,
                writes: 0,
            },
            TestDisplay::default(),
            TestSink::default(),
        )
    }

    fn assert_valve_invariant(ctx: &MachineContext, ports: &TestPorts) {
        let expect_open = ctx.state == State::Countdown && ctx.current_seconds > 0;
        assert_eq!(ctx.valve == Valve::Open, expect_open, "{:?}", ctx);
        assert_eq!(ports.valve.position, ctx.valve);
    }

    #[test]
    fn test_boot_context() {
        let ctx = MachineContext::new(SECONDS_DEFAULT);
        assert_eq!(ctx.state, State::Ready);
        assert_eq!(ctx.valve, Valve::Closed);
        assert_eq!(ctx.current_seconds, 0);
        assert!(ctx.is_consistent());
    }

    #[test]
    fn test_countdown_scenario() {
        let mut ctx = MachineContext::new(3);
        let mut ports = ports();

        let step = ctx.process(Event::ShortPress, &mut ports);
        assert_eq!((step.from, step.to), (State::Ready, State::Countdown));
        assert_eq!(ctx.valve, Valve::Open);
        assert_eq!(ctx.current_seconds, 3);
        assert_eq!(ports.display.number, 3);
        assert_valve_invariant(&ctx, &ports);

        for expected in [2, 1, 0] {
            ctx.process(Event::TickOneSecond, &mut ports);
            assert_eq!(ctx.state, State::Countdown);
            assert_eq!(ctx.current_seconds, expected);
            assert_eq!(ports.display.number, u16::from(expected));
            assert_valve_invariant(&ctx, &ports);
        }
        assert_eq!(ctx.valve, Valve::Closed);

        let step = ctx.process(Event::TickOneSecond, &mut ports);
        assert_eq!(step.to, State::Ready);
        assert_eq!(ports.display.number, 3);
        assert_eq!(ports.valve.writes, 2);
    }

    #[test]
    fn test_config_scenario() {
        let mut ctx = MachineContext::new(3);
        let mut ports = ports();

        ctx.process(Event::LongPress, &mut ports);
        assert_eq!(ctx.state, State::Config);
        assert_eq!(ctx.current_seconds, 3);
        assert!(ports.display.dp[2]);

        for expected in [4, 5, 6] {
            ctx.process(Event::ShortPress, &mut ports);
            assert_eq!(ctx.current_seconds, expected);
            assert_eq!(ports.display.number, u16::from(expected));
        }

        let step = ctx.process(Event::LongPress, &mut ports);
        assert_eq!(step.to, State::Ready);
        assert_eq!(step.save, SaveOutcome::Saved);
        assert_eq!(ctx.configured_seconds, 6);
        assert_eq!(ports.config.saved, Some(6));
        assert!(!ports.display.dp[2]);
        assert_eq!(ports.display.number, 6);
        assert_valve_invariant(&ctx, &ports);
    }

    #[test]
    fn test_short_press_cancels_countdown() {
        let mut ctx = MachineContext::new(3);
        let mut ports = ports();

        ctx.process(Event::ShortPress, &mut ports);
        ctx.process(Event::TickOneSecond, &mut ports);
        assert_eq!(ctx.current_seconds, 2);

        ctx.process(Event::ShortPress, &mut ports);
        assert_eq!(ctx.state, State::Ready);
        assert_eq!(ctx.valve, Valve::Closed);
        assert_valve_invariant(&ctx, &ports);
    }

    #[test]
    fn test_unchanged_config_not_persisted() {
        let mut ctx = MachineContext::new(5);
        let mut ports = ports();

        ctx.process(Event::LongPress, &mut ports);
        for _ in 0..SECONDS_CYCLE.len() {
            ctx.process(Event::ShortPress, &mut ports);
        }
        let step = ctx.process(Event::LongPress, &mut ports);
        assert_eq!(step.save, SaveOutcome::NotNeeded);
        assert_eq!(ports.config.calls, 0);
    }

    #[test]
    fn test_failed_save_keeps_new_value() {
        let mut ctx = MachineContext::new(3);
        let mut ports = ports();
        ports.config.fail = true;

        ctx.process(Event::LongPress, &mut ports);
        ctx.process(Event::ShortPress, &mut ports);
        let step = ctx.process(Event::LongPress, &mut ports);

        assert_eq!(
            step.save,
            SaveOutcome::Failed(StoreError::Erase(FlashError::Other))
        );
        assert_eq!(ctx.state, State::Ready);
        assert_eq!(ctx.configured_seconds, 4);
        assert_eq!(ports.display.number, 4);
    }

    #[test]
    fn test_ignored_events() {
        let mut ctx = MachineContext::new(4);
        let mut ports = ports();

        let step = ctx.process(Event::TickOneSecond, &mut ports);
        assert!(!step.state_changed());
        assert_eq!(ctx, MachineContext::new(4));

        ctx.process(Event::ShortPress, &mut ports);
        let before = ctx;
        ctx.process(Event::LongPress, &mut ports);
        assert_eq!(ctx, before);

        let mut ctx = MachineContext::new(4);
        ctx.process(Event::LongPress, &mut ports);
        let before = ctx;
        ctx.process(Event::TickOneSecond, &mut ports);
        assert_eq!(ctx, before);
    }

    #[test]
    fn test_inconsistent_context_resets() {
        let mut ports = ports();

        let mut ctx = MachineContext::new(3);
        ctx.valve = Valve::Open;
        ctx.state = State::Config;
        ctx.current_seconds = 5;
        let step = ctx.process(Event::TickOneSecond, &mut ports);
        assert_eq!(step.from, State::Ready);
        assert_eq!(ctx, MachineContext::new(3));
        assert_valve_invariant(&ctx, &ports);

        let mut ctx = MachineContext::new(3);
        ctx.configured_seconds = 42;
        ctx.process(Event::TickOneSecond, &mut ports);
        assert_eq!(ctx.configured_seconds, 6);
        assert!(ctx.is_consistent());
    }

    #[test]
    fn test_edit_marker_only_in_config() {
        let mut ctx = MachineContext::new(3);
        let mut ports = ports();

        ctx.process(Event::ShortPress, &mut ports);
        assert!(!ports.display.dp[2]);
        ctx.process(Event::ShortPress, &mut ports);
        ctx.process(Event::LongPress, &mut ports);
        assert!(ports.display.dp[2]);
        assert!(!ports.display.dp[0] && !ports.display.dp[1]);
    }
}

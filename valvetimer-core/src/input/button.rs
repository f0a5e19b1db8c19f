//! Debounced short/long press classifier
//!
//! The raw level must hold for the debounce window before it is promoted
//! to the confirmed state. A press that is released before the long-press
//! threshold yields [`ButtonEvent::ShortPress`] when the release is
//! confirmed. A hold that reaches the threshold yields exactly one
//! [`ButtonEvent::LongPress`] while still held and nothing on release.

use crate::config::ButtonConfig;

/// Debounced button state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PressState {
    Pressed,
    Released,
}

impl PressState {
    const fn from_pressed(pressed: bool) -> Self {
        if pressed {
            PressState::Pressed
        } else {
            PressState::Released
        }
    }
}

/// Classified button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Press released before the long-press threshold
    ShortPress,
    /// Press held up to the long-press threshold
    LongPress,
}

/// Button event classifier
///
/// Call [`poll`](Self::poll) exactly once per millisecond.
#[derive(Debug, Clone)]
pub struct ButtonClassifier {
    config: ButtonConfig,
    /// Last debounced state
    confirmed: PressState,
    /// Logical reading from the previous poll
    last_raw: PressState,
    /// Consecutive polls with an unchanged raw reading, resting at
    /// `debounce_ms + 1` once the reading is confirmed
    stable_ms: u16,
    /// Milliseconds confirmed pressed
    hold_ms: u16,
    /// Long press already emitted for the current hold
    long_fired: bool,
}

impl ButtonClassifier {
    /// Create a classifier seeded from the current pin level
    ///
    /// Seeding from the real level keeps a button held at power-on from
    /// being reported as a fresh press edge.
    pub fn new(config: ButtonConfig, initial_level_high: bool) -> Self {
        let initial = PressState::from_pressed(config.active_level.is_pressed(initial_level_high));
        Self {
            config,
            confirmed: initial,
            last_raw: initial,
            stable_ms: 0,
            hold_ms: 0,
            long_fired: false,
        }
    }

    /// Sample the raw pin level and classify
    ///
    /// Returns at most one event per call.
    pub fn poll(&mut self, raw_high: bool) -> Option<ButtonEvent> {
        let debounce = self.config.debounce_ms;
        let raw = PressState::from_pressed(self.config.active_level.is_pressed(raw_high));

        if raw == self.last_raw {
            if self.stable_ms < debounce {
                self.stable_ms += 1;
            }
        } else {
            self.last_raw = raw;
            self.stable_ms = 0;
        }

        let mut event = None;

        if self.stable_ms == debounce {
            if self.confirmed != raw {
                self.confirmed = raw;
                match raw {
                    PressState::Pressed => {
                        debug!("Button pressed");
                    }
                    PressState::Released => {
                        if !self.long_fired {
                            event = Some(ButtonEvent::ShortPress);
                        }
                        debug!("Button released after {} ms", self.hold_ms);
                    }
                }
                self.hold_ms = 0;
                self.long_fired = false;
            }
            // Past the threshold so the edge is confirmed once
            self.stable_ms = debounce.saturating_add(1);
        }

        if self.confirmed == PressState::Pressed {
            self.hold_ms = self.hold_ms.saturating_add(1);
            if self.hold_ms >= self.config.long_press_ms && !self.long_fired {
                self.long_fired = true;
                event = Some(ButtonEvent::LongPress);
            }
        }

        event
    }

    /// Last debounced state
    pub fn state(&self) -> PressState {
        self.confirmed
    }

    /// Consecutive milliseconds the raw reading has been unchanged
    ///
    /// Saturates at one past the debounce threshold once the reading has
    /// been confirmed, so it is not a free-running duration.
    pub fn stable_ms(&self) -> u16 {
        self.stable_ms
    }

    /// Milliseconds the button has been confirmed pressed
    pub fn hold_ms(&self) -> u16 {
        self.hold_ms
    }

    /// Whether a long press was emitted for the current hold
    pub fn long_fired(&self) -> bool {
        self.long_fired
    }

    /// Active configuration
    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }
}

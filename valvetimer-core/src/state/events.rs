//! Events that trigger state transitions

use crate::input::ButtonEvent;

/// Events consumed by the automaton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Button released before the long-press threshold
    ShortPress,
    /// Button held past the long-press threshold
    LongPress,
    /// One second of wall time elapsed
    TickOneSecond,
}

impl Event {
    /// Check if this event came from the button
    pub fn is_user_event(&self) -> bool {
        matches!(self, Event::ShortPress | Event::LongPress)
    }

    /// Check if this event came from the pacer
    pub fn is_tick(&self) -> bool {
        matches!(self, Event::TickOneSecond)
    }
}

impl From<ButtonEvent> for Event {
    fn from(event: ButtonEvent) -> Self {
        match event {
            ButtonEvent::ShortPress => Event::ShortPress,
            ButtonEvent::LongPress => Event::LongPress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_events() {
        assert!(Event::ShortPress.is_user_event());
        assert!(Event::LongPress.is_user_event());
        assert!(!Event::TickOneSecond.is_user_event());
        assert!(Event::TickOneSecond.is_tick());
    }

    #[test]
    fn test_from_button_event() {
        assert_eq!(Event::from(ButtonEvent::ShortPress), Event::ShortPress);
        assert_eq!(Event::from(ButtonEvent::LongPress), Event::LongPress);
    }
}

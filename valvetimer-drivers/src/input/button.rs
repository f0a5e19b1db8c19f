//! GPIO push button
//!
//! Raw sampling only; debounce and classification happen in
//! [`ButtonClassifier`].

use valvetimer_core::config::ButtonConfig;
use valvetimer_core::input::ButtonClassifier;
use valvetimer_hal::InputPin;

/// Push button on one GPIO input
pub struct GpioButton<P> {
    pin: P,
    config: ButtonConfig,
}

impl<P: InputPin> GpioButton<P> {
    pub fn new(pin: P, config: ButtonConfig) -> Self {
        Self { pin, config }
    }

    /// Raw electrical level
    pub fn sample(&mut self) -> bool {
        self.pin.is_high()
    }

    /// Logical pressed state, ignoring debounce
    pub fn is_pressed_raw(&mut self) -> bool {
        let high = self.sample();
        self.config.active_level.is_pressed(high)
    }

    /// Classifier seeded from the current level
    pub fn classifier(&mut self) -> ButtonClassifier {
        let high = self.sample();
        ButtonClassifier::new(self.config, high)
    }

    /// Button configuration
    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valvetimer_core::config::ActiveLevel;
    use valvetimer_core::input::PressState;
    use valvetimer_hal::mock::MockInputPin;

    #[test]
    fn test_active_low_button() {
        let config = ButtonConfig::with_active_level(ActiveLevel::Low);
        let mut button = GpioButton::new(MockInputPin::new(true), config);
        assert!(!button.is_pressed_raw());
        assert!(button.sample());
    }

    #[test]
    fn test_classifier_seeded_from_pin() {
        let mut button = GpioButton::new(MockInputPin::new(true), ButtonConfig::default());
        let classifier = button.classifier();
        assert_eq!(classifier.state(), PressState::Pressed);
        assert_eq!(button.pin.reads(), 1);
    }
}

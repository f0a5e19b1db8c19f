//! Board configuration types
//!
//! Fixed at build time from the firmware's board description.

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u16 = 20;

/// Default long-press threshold in milliseconds
pub const DEFAULT_LONG_PRESS_MS: u16 = 1000;

/// Electrical level of the button input while it is pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pressed reads high (pull-down wiring)
    #[default]
    High,
    /// Pressed reads low (pull-up wiring)
    Low,
}

impl ActiveLevel {
    /// Map a raw pin level to "pressed"
    pub const fn is_pressed(self, high: bool) -> bool {
        match self {
            ActiveLevel::High => high,
            ActiveLevel::Low => !high,
        }
    }
}

/// Invalid board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Debounce window of zero would confirm every glitch
    DebounceZero,
    /// Long-press threshold must exceed the debounce window
    LongPressTooShort,
}

/// Button classifier configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Milliseconds a raw level must hold before it is trusted
    pub debounce_ms: u16,
    /// Milliseconds of confirmed hold that make a long press
    pub long_press_ms: u16,
    /// Polarity of the button input
    pub active_level: ActiveLevel,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            active_level: ActiveLevel::High,
        }
    }
}

impl ButtonConfig {
    /// Default timing with the given polarity
    pub const fn with_active_level(active_level: ActiveLevel) -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            long_press_ms: DEFAULT_LONG_PRESS_MS,
            active_level,
        }
    }

    /// Check the timing values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_ms == 0 {
            return Err(ConfigError::DebounceZero);
        }
        if self.long_press_ms <= self.debounce_ms {
            return Err(ConfigError::LongPressTooShort);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(ButtonConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        let mut config = ButtonConfig::default();
        config.debounce_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::DebounceZero));

        let mut config = ButtonConfig::default();
        config.long_press_ms = config.debounce_ms;
        assert_eq!(config.validate(), Err(ConfigError::LongPressTooShort));
    }

    #[test]
    fn test_polarity() {
        assert!(ActiveLevel::High.is_pressed(true));
        assert!(!ActiveLevel::High.is_pressed(false));
        assert!(ActiveLevel::Low.is_pressed(false));
        assert!(!ActiveLevel::Low.is_pressed(true));
    }
}

//! Board configuration
//!
//! Constants are generated from board.toml by build.rs.

use valvetimer_core::config::{ActiveLevel, ButtonConfig};

include!(concat!(env!("OUT_DIR"), "/board_config.rs"));

/// Button timing and polarity for this board
pub fn button_config() -> ButtonConfig {
    ButtonConfig {
        debounce_ms: DEBOUNCE_MS,
        long_press_ms: LONG_PRESS_MS,
        active_level: if ACTIVE_LEVEL_HIGH {
            ActiveLevel::High
        } else {
            ActiveLevel::Low
        },
    }
}

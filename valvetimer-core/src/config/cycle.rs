//! Countdown edit cycle
//!
//! Each short press in configuration mode steps the edited value to the
//! next entry of a fixed table, wrapping at the end.

use super::record::{SECONDS_MAX, SECONDS_MIN};

/// Values offered in configuration mode, in edit order
pub const SECONDS_CYCLE: [u8; 4] = [3, 4, 5, 6];

const _: () = {
    let mut i = 0;
    while i < SECONDS_CYCLE.len() {
        assert!(SECONDS_CYCLE[i] >= SECONDS_MIN && SECONDS_CYCLE[i] <= SECONDS_MAX);
        i += 1;
    }
};

/// Next value in the edit cycle
///
/// Values not in the table snap to its first entry.
pub fn next_in_cycle(current: u8) -> u8 {
    match SECONDS_CYCLE.iter().position(|&s| s == current) {
        Some(index) => SECONDS_CYCLE[(index + 1) % SECONDS_CYCLE.len()],
        None => SECONDS_CYCLE[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order() {
        assert_eq!(next_in_cycle(3), 4);
        assert_eq!(next_in_cycle(4), 5);
        assert_eq!(next_in_cycle(5), 6);
        assert_eq!(next_in_cycle(6), 3);
    }

    #[test]
    fn test_unknown_snaps_to_first() {
        for value in [0, 1, 2, 7, 100, 255] {
            assert_eq!(next_in_cycle(value), SECONDS_CYCLE[0]);
        }
    }

    #[test]
    fn test_full_lap_returns_home() {
        let mut value = SECONDS_CYCLE[0];
        for _ in 0..SECONDS_CYCLE.len() {
            value = next_in_cycle(value);
        }
        assert_eq!(value, SECONDS_CYCLE[0]);
    }
}

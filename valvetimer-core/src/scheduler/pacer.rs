//! Millisecond and one-second pacing
//!
//! All arithmetic wraps so the pacer keeps working across the rollover of
//! a 32-bit millisecond counter.

/// Length of the slow tick in milliseconds
pub const SECOND_MS: u32 = 1000;

/// Tracks which milliseconds and seconds have been processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickPacer {
    /// Last millisecond handed out by [`next_ms`](Self::next_ms)
    last_ms: u32,
    /// Reference for the one-second tick
    last_second: u32,
}

impl TickPacer {
    /// Start pacing at `now_ms`
    pub const fn new(now_ms: u32) -> Self {
        Self {
            last_ms: now_ms,
            last_second: now_ms,
        }
    }

    /// Claim the next unprocessed millisecond up to `now_ms`
    ///
    /// Call in a loop until it returns `None` to catch up on a backlog.
    /// Each millisecond is returned once.
    pub fn next_ms(&mut self, now_ms: u32) -> Option<u32> {
        if self.last_ms == now_ms {
            return None;
        }
        self.last_ms = self.last_ms.wrapping_add(1);
        Some(self.last_ms)
    }

    /// Number of milliseconds still to be processed
    pub fn backlog(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_ms)
    }

    /// Check whether a one-second tick is due
    ///
    /// The reference advances by exactly [`SECOND_MS`] per tick, never to
    /// `now_ms`, so late service does not accumulate drift. At most one
    /// tick is reported per call.
    pub fn second_due(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_second) >= SECOND_MS {
            self.last_second = self.last_second.wrapping_add(SECOND_MS);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_time_no_work() {
        let mut pacer = TickPacer::new(500);
        assert_eq!(pacer.next_ms(500), None);
        assert!(!pacer.second_due(500));
    }

    #[test]
    fn test_catch_up_each_ms_once() {
        let mut pacer = TickPacer::new(10);
        let mut count = 0;
        let mut last = 0;
        while let Some(ms) = pacer.next_ms(15) {
            count += 1;
            last = ms;
        }
        assert_eq!(count, 5);
        assert_eq!(last, 15);
        assert_eq!(pacer.next_ms(15), None);
        assert_eq!(pacer.backlog(15), 0);
    }

    #[test]
    fn test_second_without_drift() {
        let mut pacer = TickPacer::new(0);
        assert!(!pacer.second_due(999));
        // Serviced late: the next tick is still due at 2000
        assert!(pacer.second_due(1250));
        assert!(!pacer.second_due(1999));
        assert!(pacer.second_due(2000));
    }

    #[test]
    fn test_one_second_per_call() {
        let mut pacer = TickPacer::new(0);
        assert!(pacer.second_due(3500));
        assert!(pacer.second_due(3500));
        assert!(pacer.second_due(3500));
        assert!(!pacer.second_due(3500));
    }

    #[test]
    fn test_wraparound() {
        let start = u32::MAX - 2;
        let mut pacer = TickPacer::new(start);
        let mut count = 0;
        while pacer.next_ms(2).is_some() {
            count += 1;
        }
        assert_eq!(count, 5);

        let mut pacer = TickPacer::new(u32::MAX - 499);
        assert!(pacer.second_due(500));
        assert!(!pacer.second_due(501));
    }
}

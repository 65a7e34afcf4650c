//! The pausable simulation clock.

use taiga_core::SimTime;

/// Monotonic simulation time source.
///
/// Advances only when the tick loop calls [`advance`](SimClock::advance);
/// a paused session simply stops ticking, so every timer derived from
/// this clock (digestion, retreat dwell, power-up spawn and buff expiry)
/// freezes with it. Wall-clock time never enters timer comparisons.
#[derive(Clone, Copy, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    /// A clock at the session epoch.
    pub fn new() -> SimClock {
        SimClock { now: SimTime::ZERO }
    }

    /// Current simulation time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Advance the clock by `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) {
        self.now = self.now.after(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_epoch_and_accumulates() {
        let mut clock = SimClock::new();
        assert_eq!(clock.now(), SimTime::ZERO);
        clock.advance(100);
        clock.advance(100);
        assert_eq!(clock.now(), SimTime(200));
    }
}

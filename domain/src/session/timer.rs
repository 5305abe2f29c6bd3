//! Per-round countdown

/// Countdown for a timed round, advanced one second per [`tick`](Self::tick)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTimer {
    seconds_per_round: u32,
    remaining: u32,
}

impl RoundTimer {
    /// Returns None for untimed formats
    pub fn for_round(seconds_per_round: u32) -> Option<Self> {
        (seconds_per_round > 0).then_some(Self {
            seconds_per_round,
            remaining: seconds_per_round,
        })
    }

    pub fn reset(&mut self) {
        self.remaining = self.seconds_per_round;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Count down one second. Returns true only on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untimed_has_no_timer() {
        assert!(RoundTimer::for_round(0).is_none());
    }

    #[test]
    fn test_expires_exactly_once() {
        let mut timer = RoundTimer::for_round(3).unwrap();
        assert!(!timer.tick());
        assert!(!timer.tick());
        assert!(timer.tick());
        assert!(timer.is_expired());
        assert!(!timer.tick());
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn test_reset() {
        let mut timer = RoundTimer::for_round(2).unwrap();
        timer.tick();
        timer.reset();
        assert_eq!(timer.remaining(), 2);
    }
}

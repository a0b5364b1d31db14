//! Interval-driven repeating actions
//!
//! Stepped by the frame loop instead of host timers, so pump and release stay
//! deterministic and there is no timer handle to leak.

use serde::{Deserialize, Serialize};

/// A repeating action that fires once per elapsed period while active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalTimer {
    /// Period in seconds
    period: f32,
    /// Time accumulated toward the next firing
    elapsed: f32,
    active: bool,
}

impl IntervalTimer {
    pub fn new(period: f32) -> Self {
        Self {
            period,
            elapsed: 0.0,
            active: false,
        }
    }

    pub fn from_millis(period_ms: f32) -> Self {
        Self::new(period_ms / 1000.0)
    }

    pub fn period(&self) -> f32 {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Start firing. Returns false (and changes nothing) if already running.
    pub fn start(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.elapsed = 0.0;
        true
    }

    /// Stop and discard any partial period. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        let was_active = self.active;
        self.active = false;
        self.elapsed = 0.0;
        was_active
    }

    /// Advance by `dt` seconds, returning how many periods completed
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.active || self.period <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let mut fired = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fired += 1;
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_never_fires() {
        let mut timer = IntervalTimer::from_millis(50.0);
        assert_eq!(timer.advance(10.0), 0);
    }

    #[test]
    fn test_fires_once_per_period() {
        let mut timer = IntervalTimer::new(0.5);
        assert!(timer.start());
        assert_eq!(timer.advance(0.25), 0);
        assert_eq!(timer.advance(0.25), 1);
        assert_eq!(timer.advance(1.25), 2);
        assert_eq!(timer.advance(0.25), 1);
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut timer = IntervalTimer::new(0.5);
        assert!(timer.start());
        timer.advance(0.25);
        // A second start must not restart the period
        assert!(!timer.start());
        assert_eq!(timer.advance(0.25), 1);
    }

    #[test]
    fn test_stop_discards_partial_period() {
        let mut timer = IntervalTimer::new(0.5);
        timer.start();
        timer.advance(0.4);
        assert!(timer.stop());
        assert!(!timer.stop());
        timer.start();
        assert_eq!(timer.advance(0.25), 0);
    }
}

//! Wall-clock frame timing.

use std::time::{Duration, Instant};

/// Measures the time between consecutive frames.
///
/// The first tick after creation or [`reset`](Self::reset) reports zero, so
/// time spent loading never reaches the simulation as one huge frame.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<Instant>,
    total: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Seconds between the previous tick and `now`.
    ///
    /// A `now` earlier than the previous tick counts as zero.
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let elapsed = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last = Some(now);
        self.total += elapsed;
        elapsed.as_secs_f32()
    }

    /// Forget the previous tick, e.g. after the window was hidden.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Total time reported so far.
    pub fn total(&self) -> Duration {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick_at(Instant::now()), 0.0);
    }

    #[test]
    fn test_tick_measures_gap() {
        let mut clock = FrameClock::new();
        let start = Instant::now();
        clock.tick_at(start);

        let dt = clock.tick_at(start + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);

        let dt = clock.tick_at(start + Duration::from_millis(50));
        assert!((dt - 0.034).abs() < 1e-6);
        assert_eq!(clock.total(), Duration::from_millis(50));
    }

    #[test]
    fn test_backwards_time_and_reset() {
        let mut clock = FrameClock::new();
        let start = Instant::now() + Duration::from_secs(1);
        clock.tick_at(start);

        assert_eq!(clock.tick_at(start - Duration::from_millis(5)), 0.0);

        clock.reset();
        assert_eq!(clock.tick_at(start + Duration::from_secs(10)), 0.0);
    }
}

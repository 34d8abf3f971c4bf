use std::time::Duration;

/// Counts events per rolling one-second wall-clock window.
///
/// FPS is the count of `record` calls within a closed window, scaled to the window's exact
/// length and rounded; it is not an average of per-frame durations. Until the first window
/// closes there is no value.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    window_start: Duration,
    count: u32,
    fps: Option<u32>,
}

impl FpsCounter {
    /// Window length used for FPS.
    pub const WINDOW: Duration = Duration::from_secs(1);

    /// Creates a counter whose first window opens at `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            window: Self::WINDOW,
            window_start: now,
            count: 0,
            fps: None,
        }
    }

    /// Records one event at `now` and rolls the window if it has elapsed.
    ///
    /// Returns `true` when a window closed (and the FPS value was refreshed).
    pub fn record(&mut self, now: Duration) -> bool {
        self.count = self.count.saturating_add(1);
        self.roll(now)
    }

    /// Closes the current window if at least one window length has elapsed.
    ///
    /// Returns `true` when a window closed.
    pub fn roll(&mut self, now: Duration) -> bool {
        let elapsed = now.saturating_sub(self.window_start);
        if elapsed < self.window {
            return false;
        }

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.fps = Some((self.count as f64 * 1000.0 / elapsed_ms).round() as u32);
        self.count = 0;
        self.window_start = now;
        true
    }

    /// FPS of the last closed window.
    #[inline]
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn no_value_before_first_window_closes() {
        let mut c = FpsCounter::new(ms(0));
        for i in 0..30 {
            c.record(ms(i * 10));
        }
        assert_eq!(c.fps(), None);
    }

    #[test]
    fn sixty_events_in_one_second() {
        let mut c = FpsCounter::new(ms(0));
        for i in 0..60u64 {
            c.record(Duration::from_micros(i * 16_000));
        }
        assert!(c.roll(ms(1000)));
        assert_eq!(c.fps(), Some(60));
    }

    #[test]
    fn record_closing_the_window_counts_itself() {
        let mut c = FpsCounter::new(ms(0));
        for i in 1..=20u64 {
            c.record(ms(i * 50));
        }
        assert_eq!(c.fps(), Some(20));
    }

    #[test]
    fn long_window_is_scaled_to_per_second() {
        let mut c = FpsCounter::new(ms(0));
        for _ in 0..30 {
            c.record(ms(100));
        }
        assert!(c.roll(ms(2000)));
        assert_eq!(c.fps(), Some(15));
    }

    #[test]
    fn window_restarts_after_roll() {
        let mut c = FpsCounter::new(ms(0));
        c.record(ms(1000));
        assert_eq!(c.fps(), Some(1));
        assert!(!c.roll(ms(1500)));
        assert!(c.roll(ms(2000)));
        assert_eq!(c.fps(), Some(0));
    }
}

//! Pause-aware session clock
//!
//! Effective elapsed time = now - session start - time spent paused.
//! Every timer in the simulation (spawns, telegraphs, orbital lifetimes)
//! reads this clock, so pausing freezes all of them at once.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source
pub trait TickSource {
    /// Time since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually driven time source. Clones share one timeline.
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    now: Rc<Cell<Duration>>,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl TickSource for ManualSource {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Session clock that excludes paused intervals
pub struct GameClock {
    source: Box<dyn TickSource>,
    session_start: Duration,
    total_paused: Duration,
    /// Set only while paused
    pause_start: Option<Duration>,
}

impl GameClock {
    pub fn new(source: Box<dyn TickSource>) -> Self {
        let session_start = source.now();
        Self {
            source,
            session_start,
            total_paused: Duration::ZERO,
            pause_start: None,
        }
    }

    /// Effective time since session start, frozen while paused
    pub fn elapsed(&self) -> Duration {
        let now = self.pause_start.unwrap_or_else(|| self.source.now());
        now.saturating_sub(self.session_start)
            .saturating_sub(self.total_paused)
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed().as_secs_f32()
    }

    pub fn is_paused(&self) -> bool {
        self.pause_start.is_some()
    }

    /// Freeze effective time. No-op if already paused.
    pub fn pause(&mut self) {
        if self.pause_start.is_none() {
            self.pause_start = Some(self.source.now());
        }
    }

    /// Resume effective time. No-op if not paused.
    pub fn resume(&mut self) {
        if let Some(start) = self.pause_start.take() {
            self.total_paused += self.source.now().saturating_sub(start);
        }
    }

    /// Re-anchor the session at the current instant
    pub fn reset(&mut self) {
        self.session_start = self.source.now();
        self.total_paused = Duration::ZERO;
        self.pause_start = None;
    }

    /// Accumulated paused time (excluding an in-progress pause)
    pub fn total_paused(&self) -> Duration {
        self.total_paused
    }
}

impl std::fmt::Debug for GameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameClock")
            .field("elapsed", &self.elapsed())
            .field("total_paused", &self.total_paused)
            .field("paused", &self.is_paused())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn manual_clock() -> (GameClock, ManualSource) {
        let source = ManualSource::new();
        source.set(Duration::from_secs(100));
        (GameClock::new(Box::new(source.clone())), source)
    }

    #[test]
    fn test_elapsed_tracks_source() {
        let (clock, source) = manual_clock();
        assert_eq!(clock.elapsed(), Duration::ZERO);
        source.advance(Duration::from_millis(1500));
        assert_eq!(clock.elapsed(), Duration::from_millis(1500));
    }

    #[test]
    fn test_pause_freezes_elapsed() {
        let (mut clock, source) = manual_clock();
        source.advance(Duration::from_secs(2));
        clock.pause();
        source.advance(Duration::from_secs(10));
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
        clock.resume();
        assert_eq!(clock.elapsed(), Duration::from_secs(2));
        source.advance(Duration::from_secs(1));
        assert_eq!(clock.elapsed(), Duration::from_secs(3));
        assert_eq!(clock.total_paused(), Duration::from_secs(10));
    }

    #[test]
    fn test_double_pause_and_resume_do_not_double_count() {
        let (mut clock, source) = manual_clock();
        clock.resume(); // not paused: no-op
        source.advance(Duration::from_secs(1));
        clock.pause();
        source.advance(Duration::from_secs(1));
        clock.pause(); // already paused: keeps the first pause instant
        source.advance(Duration::from_secs(1));
        clock.resume();
        clock.resume();
        assert_eq!(clock.total_paused(), Duration::from_secs(2));
        assert_eq!(clock.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_reset_reanchors() {
        let (mut clock, source) = manual_clock();
        source.advance(Duration::from_secs(5));
        clock.pause();
        source.advance(Duration::from_secs(5));
        clock.reset();
        assert!(!clock.is_paused());
        assert_eq!(clock.elapsed(), Duration::ZERO);
        source.advance(Duration::from_millis(250));
        assert_eq!(clock.elapsed(), Duration::from_millis(250));
    }

    #[test]
    fn test_monotonic_source_advances() {
        let clock = GameClock::new(Box::new(MonotonicSource::new()));
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }

    proptest! {
        /// Paused stretches never show up in elapsed time
        #[test]
        fn pause_invariance(steps in proptest::collection::vec((0u64..5_000, 0u64..5_000), 1..20)) {
            let (mut clock, source) = manual_clock();
            let mut running = Duration::ZERO;
            for (run_ms, pause_ms) in steps {
                source.advance(Duration::from_millis(run_ms));
                running += Duration::from_millis(run_ms);
                clock.pause();
                source.advance(Duration::from_millis(pause_ms));
                prop_assert_eq!(clock.elapsed(), running);
                clock.resume();
            }
            prop_assert_eq!(clock.elapsed(), running);
        }
    }
}

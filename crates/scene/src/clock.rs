use std::time::{Duration, Instant};

/// Weight of the newest sample in the smoothed frame time.
const SMOOTHING: f64 = 0.1;

/// Frame timing: elapsed seconds since the first frame plus a smoothed
/// frame-rate readout.
///
/// Elapsed time is 0 on the first frame and never decreases, even if the
/// caller hands in an instant earlier than the previous one.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start: Option<Instant>,
    last: Option<Instant>,
    elapsed: f32,
    smoothed_frame_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `now` and return elapsed seconds since the first frame.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let start = *self.start.get_or_insert(now);
        if let Some(last) = self.last {
            let dt = now.saturating_duration_since(last).as_secs_f64();
            self.smoothed_frame_time = Some(match self.smoothed_frame_time {
                Some(avg) => avg + (dt - avg) * SMOOTHING,
                None => dt,
            });
        }
        self.last = Some(self.last.map_or(now, |last| last.max(now)));
        self.elapsed = self
            .elapsed
            .max(now.saturating_duration_since(start).as_secs_f32());
        self.elapsed
    }

    /// Seconds since the first frame, as of the last tick.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Smoothed time between frames, once two frames have been seen.
    pub fn frame_time(&self) -> Option<Duration> {
        self.smoothed_frame_time.map(Duration::from_secs_f64)
    }

    pub fn fps(&self) -> Option<f64> {
        self.smoothed_frame_time
            .filter(|t| *t > 0.0)
            .map(|t| 1.0 / t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_starts_at_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(Instant::now()), 0.0);
        assert!(clock.fps().is_none());
    }

    #[test]
    fn elapsed_tracks_instants() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(t0);
        let e = clock.tick(t0 + Duration::from_millis(1500));
        assert!((e - 1.5).abs() < 1e-6);
    }

    #[test]
    fn elapsed_never_decreases() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        clock.tick(t0);
        let a = clock.tick(t0 + Duration::from_secs(2));
        let b = clock.tick(t0 + Duration::from_secs(1));
        assert!(b >= a);
    }

    #[test]
    fn fps_from_steady_frames() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new();
        for i in 0..10 {
            clock.tick(t0 + Duration::from_millis(20 * i));
        }
        let fps = clock.fps().unwrap();
        assert!((fps - 50.0).abs() < 0.5, "{fps}");
    }
}

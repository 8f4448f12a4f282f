use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped time since the previous tick, in seconds.
    pub dt: f32,

    /// Time since the clock was created, in seconds. Drives animation.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// make the next frame jump.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: Duration,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a new clock clamping dt to `[0.1ms, 250ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            last: now,
            elapsed: Duration::ZERO,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Resets the dt baseline without touching elapsed time.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        // Accumulate clamped steps so animation pauses with the app.
        self.elapsed += dt;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        let base = Instant::now();
        for i in 0..3u64 {
            let ft = clock.tick_at(base + Duration::from_millis(16 * (i + 1)));
            assert_eq!(ft.frame_index, i);
        }
    }

    #[test]
    fn dt_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(50));
        let t0 = clock.last;

        let stalled = clock.tick_at(t0 + Duration::from_secs(5));
        assert_eq!(stalled.dt, 0.05);

        let tight = clock.tick_at(t0 + Duration::from_secs(5));
        assert_eq!(tight.dt, 0.001);
    }

    #[test]
    fn elapsed_accumulates_clamped_dt() {
        let mut clock = FrameClock::with_clamps(Duration::ZERO, Duration::from_millis(100));
        let t0 = clock.last;
        clock.tick_at(t0 + Duration::from_millis(40));
        let ft = clock.tick_at(t0 + Duration::from_secs(10));
        assert!((ft.elapsed - 0.14).abs() < 1e-6);
    }
}

use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    /// Seconds since the clock started; feeds the shader `time` uniform.
    pub elapsed: f32,
    pub frame_index: u64,
}

/// Monotonic clock ticked once per frame.
///
/// `dt` is clamped so a debugger pause or a minimized window does not produce
/// a huge step. `elapsed` is not clamped.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            start: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Seconds since the clock was created.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
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
    fn frames_are_numbered_from_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
    }

    #[test]
    fn long_stall_is_clamped_but_elapsed_is_not() {
        let mut clock = FrameClock::new();
        let later = clock.start + Duration::from_secs(3);
        let ft = clock.tick_at(later);
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert!((ft.elapsed - 3.0).abs() < 1e-3);
    }

    #[test]
    fn zero_step_uses_minimum() {
        let mut clock = FrameClock::new();
        let at = clock.last;
        let ft = clock.tick_at(at);
        assert!(ft.dt > 0.0);
    }
}

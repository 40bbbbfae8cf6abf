use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, clamped.
    pub dt: Duration,

    /// Monotonic frame counter, starting at 0.
    pub frame_index: u64,
}

/// Produces [`FrameTime`] snapshots and accumulates totals for reporting.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// dominate the mean frame time.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    total: Duration,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            total: Duration::ZERO,
            dt_min: Duration::from_micros(100),
            dt_max: Duration::from_millis(250),
        }
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);

        self.last = now;
        self.total += dt;

        let ft = FrameTime {
            dt,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }

    /// Number of ticks so far.
    pub fn frames(&self) -> u64 {
        self.frame_index
    }

    /// Mean clamped delta over all ticks; `None` before the first tick.
    pub fn mean_frame_time(&self) -> Option<Duration> {
        let frames = u32::try_from(self.frame_index).ok().filter(|n| *n > 0)?;
        Some(self.total / frames)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

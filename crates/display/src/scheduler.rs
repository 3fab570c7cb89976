use core::time::Duration;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Instant;

/// Weight of the newest frame interval in the FPS moving average.
const FPS_SMOOTHING: f64 = 0.2;

/// Lock-free reader for the FPS measured by a [`FrameScheduler`].
#[derive(Debug, Clone, Default)]
pub struct FpsGauge {
    bits: Arc<AtomicU32>,
}

impl FpsGauge {
    /// Last published frames-per-second value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    #[inline]
    fn publish(&self, fps: f32) {
        self.bits.store(fps.to_bits(), Ordering::Relaxed);
    }
}

/// Frame pacer that caps the repaint loop to a frame budget.
///
/// Each call to [`wait_remainder`](Self::wait_remainder) sleeps until at least
/// one budget has passed since the previous call, then folds the real frame
/// interval into a moving FPS average. Frames that already overran the
/// budget do not sleep at all.
#[derive(Debug)]
pub struct FrameScheduler {
    /// The minimum duration of one frame.
    budget: Duration,
    /// End of the previous frame, or the moment pacing began.
    last_frame_end: Instant,
    /// Moving average of whole-frame intervals, in seconds.
    average_interval: Option<f64>,
    /// Number of frames whose work alone exceeded the budget.
    overruns: u64,
    fps: FpsGauge,
}

impl FrameScheduler {
    /// Creates a new frame scheduler with the specified time budget.
    ///
    /// Pacing begins immediately.
    #[inline]
    #[must_use]
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            last_frame_end: Instant::now(),
            average_interval: None,
            overruns: 0,
            fps: FpsGauge::default(),
        }
    }

    /// Creates a scheduler capped at `max_fps` frames per second.
    #[must_use]
    pub fn from_max_fps(max_fps: u32) -> Self {
        Self::new(Duration::from_secs(1) / max_fps.max(1))
    }

    /// Restart pacing with a new budget, forgetting the measured FPS.
    pub fn begin(&mut self, budget: Duration) {
        self.budget = budget;
        self.last_frame_end = Instant::now();
        self.average_interval = None;
        self.overruns = 0;
        self.fps.publish(0.0);
    }

    /// Returns the configured frame budget duration.
    #[inline]
    #[must_use]
    pub const fn budget(&self) -> Duration {
        self.budget
    }

    /// Sleep out what is left of the current frame's budget.
    ///
    /// Returns how long the call slept.
    pub fn wait_remainder(&mut self) -> Duration {
        let elapsed = self.last_frame_end.elapsed();
        let remaining = self.budget.saturating_sub(elapsed);
        if remaining.is_zero() {
            if elapsed > self.budget {
                self.overruns = self.overruns.saturating_add(1);
            }
        } else {
            thread::sleep(remaining);
        }

        let now = Instant::now();
        let interval = now.duration_since(self.last_frame_end).as_secs_f64();
        self.last_frame_end = now;
        let average = self.average_interval.map_or(interval, |previous| {
            previous + (interval - previous) * FPS_SMOOTHING
        });
        self.average_interval = Some(average);
        if average > 0.0 {
            self.fps.publish((1.0 / average) as f32);
        }
        remaining
    }

    /// Last computed frames-per-second value.
    #[inline]
    #[must_use]
    pub fn current_fps(&self) -> f32 {
        self.fps.get()
    }

    /// A handle other threads can use to read the FPS.
    #[inline]
    #[must_use]
    pub fn fps_gauge(&self) -> FpsGauge {
        self.fps.clone()
    }

    /// Returns the number of frames that exceeded the budget since pacing began.
    #[inline]
    #[must_use]
    pub const fn overruns(&self) -> u64 {
        self.overruns
    }
}

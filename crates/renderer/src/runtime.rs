use std::time::{Duration, Instant};

/// High-level behaviour requested by the caller.
///
/// The render policy decides whether frames should animate continuously or
/// be evaluated at a fixed timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPolicy {
    /// Run the render loop continuously, optionally clamping the frame rate.
    Animate {
        /// Optional requested frames-per-second cap; None renders once per
        /// display refresh.
        target_fps: Option<f32>,
    },
    /// Render the field frozen at a specific timestamp (seconds).
    Still { time: f32 },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed wall-clock or simulated time in seconds.
    pub seconds: f32,
    /// Monotonic frame counter for the running session.
    pub frame_index: u64,
}

impl TimeSample {
    /// Creates a new time sample.
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Produces a time sample for the next frame.
    fn sample(&mut self) -> TimeSample;
}

/// Time source backed by the system monotonic clock, started at mount.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    /// Creates a system time source initialised to `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Time source that always reports a fixed timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    time: f32,
}

impl FixedTimeSource {
    /// Constructs a fixed time source that always returns the provided time.
    pub fn new(time: f32) -> Self {
        Self { time }
    }
}

impl TimeSource for FixedTimeSource {
    fn reset(&mut self) {}

    fn sample(&mut self) -> TimeSample {
        TimeSample::new(self.time, 0)
    }
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemTimeSource::new()),
        RenderPolicy::Still { time } => Box::new(FixedTimeSource::new(*time)),
    }
}

#[derive(Debug, Clone, Copy)]
enum Pacing {
    /// Render on every display refresh.
    Continuous,
    /// Space frames a fixed interval apart.
    Interval(Duration),
    /// Render one frame, then only repaint on OS damage events.
    Once,
}

/// Paces redraw requests so exactly one frame is outstanding at a time.
///
/// Without an FPS cap every display-refresh callback renders. With a cap
/// the scheduler spaces deadlines `1/fps` apart, anchored to the previous
/// deadline rather than the render completion time so long frames do not
/// accumulate drift. Still policies render a single frame and go idle.
#[derive(Debug)]
pub struct FrameScheduler {
    pacing: Pacing,
    next_deadline: Option<Instant>,
    rendered: bool,
}

impl FrameScheduler {
    pub fn new(policy: RenderPolicy) -> Self {
        let pacing = match policy {
            RenderPolicy::Animate {
                target_fps: Some(fps),
            } if fps > 0.0 => Pacing::Interval(Duration::from_secs_f32(1.0 / fps)),
            RenderPolicy::Animate { .. } => Pacing::Continuous,
            RenderPolicy::Still { .. } => Pacing::Once,
        };
        Self {
            pacing,
            next_deadline: None,
            rendered: false,
        }
    }

    /// True when a redraw should be requested at `now`.
    pub fn ready_for_frame(&mut self, now: Instant) -> bool {
        match (self.pacing, self.next_deadline) {
            (Pacing::Continuous, _) => true,
            (Pacing::Interval(_), None) => true,
            (Pacing::Interval(_), Some(deadline)) => now >= deadline,
            (Pacing::Once, _) => !self.rendered,
        }
    }

    /// Records that a frame was just presented and schedules the next one.
    pub fn mark_rendered(&mut self) {
        self.rendered = true;
        if let Pacing::Interval(interval) = self.pacing {
            let now = Instant::now();
            let anchor = self
                .next_deadline
                .filter(|deadline| *deadline + interval > now)
                .unwrap_or(now);
            self.next_deadline = Some(anchor + interval);
        }
    }

    /// Deadline to sleep until when the scheduler is not ready; None for
    /// uncapped or one-shot rendering.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.pacing {
            Pacing::Interval(_) => self.next_deadline,
            _ => None,
        }
    }

    /// Clears any pending deadline and re-arms one-shot pacing.
    pub fn reset(&mut self) {
        self.next_deadline = None;
        self.rendered = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_scheduler_is_always_ready() {
        let mut scheduler = FrameScheduler::new(RenderPolicy::Animate { target_fps: None });
        let now = Instant::now();
        assert!(scheduler.ready_for_frame(now));
        scheduler.mark_rendered();
        assert!(scheduler.ready_for_frame(now));
        assert!(scheduler.next_deadline().is_none());
    }

    #[test]
    fn capped_scheduler_spaces_deadlines() {
        let mut scheduler = FrameScheduler::new(RenderPolicy::Animate {
            target_fps: Some(10.0),
        });
        let start = Instant::now();
        assert!(scheduler.ready_for_frame(start));
        scheduler.mark_rendered();
        let deadline = scheduler.next_deadline().expect("capped deadline");
        assert!(deadline >= start);
        assert!(!scheduler.ready_for_frame(start));
        assert!(scheduler.ready_for_frame(deadline + Duration::from_millis(1)));
    }

    #[test]
    fn zero_fps_treated_as_uncapped() {
        let mut scheduler = FrameScheduler::new(RenderPolicy::Animate {
            target_fps: Some(0.0),
        });
        scheduler.mark_rendered();
        assert!(scheduler.ready_for_frame(Instant::now()));
        assert!(scheduler.next_deadline().is_none());
    }

    #[test]
    fn reset_clears_pending_deadline() {
        let mut scheduler = FrameScheduler::new(RenderPolicy::Animate {
            target_fps: Some(5.0),
        });
        scheduler.mark_rendered();
        assert!(scheduler.next_deadline().is_some());
        scheduler.reset();
        assert!(scheduler.next_deadline().is_none());
        assert!(scheduler.ready_for_frame(Instant::now()));
    }

    #[test]
    fn still_scheduler_renders_exactly_once() {
        let mut scheduler = FrameScheduler::new(RenderPolicy::Still { time: 2.0 });
        let now = Instant::now();
        assert!(scheduler.ready_for_frame(now));
        scheduler.mark_rendered();
        assert!(!scheduler.ready_for_frame(now));
        assert!(scheduler.next_deadline().is_none());
        scheduler.reset();
        assert!(scheduler.ready_for_frame(now));
    }

    #[test]
    fn fixed_source_never_advances() {
        let mut source = FixedTimeSource::new(4.2);
        assert_eq!(source.sample(), TimeSample::new(4.2, 0));
        assert_eq!(source.sample(), TimeSample::new(4.2, 0));
    }

    #[test]
    fn system_source_counts_frames() {
        let mut source = SystemTimeSource::new();
        assert_eq!(source.sample().frame_index, 0);
        assert_eq!(source.sample().frame_index, 1);
        source.reset();
        assert_eq!(source.sample().frame_index, 0);
    }
}

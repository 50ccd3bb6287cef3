//! Time management utilities
//!
//! Wall-clock measurement plus the fixed-timestep accumulator that drives physics.

use std::time::{Duration, Instant};

/// Smallest time step accepted by [`FixedTimestep`], in seconds
pub const MIN_TIME_STEP: f32 = 1e-4;

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}

/// Fixed-timestep accumulator
///
/// Accumulates variable frame time and reports how many fixed-size steps
/// should run this frame:
///
/// ```text
/// while accumulator >= time_step { step(); accumulator -= time_step; }
/// ```
///
/// At most `max_steps_per_frame` steps are reported per call; any time left
/// beyond that is dropped so a slow frame cannot snowball into ever longer
/// catch-up loops.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    time_step: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
    total_steps: u64,
}

impl FixedTimestep {
    /// Create an accumulator with the given step (seconds)
    ///
    /// Non-positive or non-finite steps are clamped to [`MIN_TIME_STEP`].
    pub fn new(time_step: f32, max_steps_per_frame: u32) -> Self {
        Self {
            time_step: clamp_time_step(time_step),
            accumulator: 0.0,
            max_steps_per_frame: max_steps_per_frame.max(1),
            total_steps: 0,
        }
    }

    /// The fixed step length in seconds
    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    /// Change the step length, clamping invalid values
    pub fn set_time_step(&mut self, time_step: f32) {
        self.time_step = clamp_time_step(time_step);
    }

    /// Time carried over to the next frame
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Number of steps reported since creation
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Interpolation factor between the last and next step, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.time_step
    }

    /// Add elapsed frame time and return the number of steps to run
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.accumulator += elapsed;
        }

        let mut steps = 0;
        while self.accumulator >= self.time_step {
            if steps == self.max_steps_per_frame {
                log::warn!(
                    "Fixed timestep fell behind by {:.4}s; dropping accumulated time",
                    self.accumulator
                );
                self.accumulator %= self.time_step;
                break;
            }
            self.accumulator -= self.time_step;
            steps += 1;
        }

        self.total_steps += u64::from(steps);
        steps
    }

    /// Discard any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

fn clamp_time_step(time_step: f32) -> f32 {
    if time_step.is_finite() && time_step >= MIN_TIME_STEP {
        time_step
    } else {
        log::warn!("Invalid fixed time step {time_step}; clamping to {MIN_TIME_STEP}");
        MIN_TIME_STEP
    }
}

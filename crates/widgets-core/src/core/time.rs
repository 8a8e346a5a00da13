/// Shortest frame delta the clock will accept, in seconds.
pub const MIN_FRAME_DT: f64 = 0.001;
/// Longest frame delta the clock will accept, in seconds.
/// A backgrounded tab can hand us seconds at once; anything above this is dropped.
pub const MAX_FRAME_DT: f64 = 0.050;
/// Fixed physics step: one "frame" in per-frame velocity units.
pub const DEFAULT_STEP_DT: f64 = 1.0 / 60.0;
/// Cap on fixed steps run for a single animation frame.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Clamp a wall-clock frame delta into `[MIN_FRAME_DT, MAX_FRAME_DT]`.
/// NaN and negative deltas count as the minimum.
pub fn clamp_frame_dt(dt: f64) -> f64 {
    if !dt.is_finite() || dt < MIN_FRAME_DT {
        return MIN_FRAME_DT;
    }
    dt.min(MAX_FRAME_DT)
}

/// Fixed timestep accumulator fed by clamped wall-clock deltas.
///
/// Widget physics counts velocity in pixels per step, so running a fixed
/// number of steps per second keeps simulated speed independent of the
/// display refresh rate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// The fixed delta time per step.
    step_dt: f64,
    /// Accumulated time not yet consumed by steps.
    accumulator: f64,
}

impl FrameClock {
    pub fn new(step_dt: f64) -> Self {
        let step_dt = if step_dt.is_finite() && step_dt > 0.0 {
            step_dt
        } else {
            DEFAULT_STEP_DT
        };
        Self {
            step_dt,
            accumulator: 0.0,
        }
    }

    /// Add a wall-clock frame delta. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f64) -> u32 {
        self.accumulator += clamp_frame_dt(frame_dt);
        self.accumulator = self.accumulator.min(self.step_dt * MAX_STEPS_PER_FRAME as f64);
        // Tolerate a hair of float error so 1/60 + 1/60 yields two steps.
        let steps = ((self.accumulator + 1e-9) / self.step_dt) as u32;
        self.accumulator = (self.accumulator - steps as f64 * self.step_dt).max(0.0);
        steps
    }

    /// The fixed delta time.
    pub fn step_dt(&self) -> f64 {
        self.step_dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DT)
    }
}

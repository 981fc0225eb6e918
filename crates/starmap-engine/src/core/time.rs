/// Upper bound on steps per frame; a stalled tab must not replay minutes of animation.
const MAX_STEPS_PER_FRAME: u32 = 10;

/// Frame clock for the view loop.
/// Turns variable display-refresh deltas into whole fixed animation steps.
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f32,
    accumulator: f32,
    elapsed: f64,
    frame: u64,
}

impl FrameClock {
    pub fn new(step: f32) -> Self {
        Self {
            step: if step > 0.0 { step } else { 1.0 / 60.0 },
            accumulator: 0.0,
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Record one display frame of `frame_dt` seconds and return the number of
    /// fixed steps to run. Negative or non-finite deltas count as zero.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let frame_dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.frame += 1;
        self.elapsed += frame_dt as f64;
        self.accumulator = (self.accumulator + frame_dt).min(self.step * MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.step) as u32;
        self.accumulator -= steps as f32 * self.step;
        steps
    }

    /// The fixed step in seconds.
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Display frames seen so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Wall time fed to the clock, in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

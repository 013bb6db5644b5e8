/// Converts variable host frame times into whole animation steps.
///
/// The animation systems count in frames (angles are radians/frame, shooting
/// stars age one per frame), so the clock hands out integer step counts and
/// keeps the remainder for the next call.
pub struct FrameClock {
    /// Duration of one animation step in seconds.
    dt: f32,
    /// Unconsumed time carried between calls.
    accumulator: f32,
}

impl FrameClock {
    /// Cap on steps per call, so a backgrounded tab does not fast-forward on return.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add host frame time. Returns the number of steps to run now.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * Self::MAX_STEPS as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Forget any carried time. Called when the loop starts.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

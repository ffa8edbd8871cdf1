use std::time::Duration;

/// Timer ticks per second of the reference frontend
pub const TICKS_PER_SECOND: f64 = 60.0;
/// The reference frontend steps on every 8th tick
pub const TICKS_PER_GENERATION: u32 = 8;

/// Fixed-rate frame pacing: a timer ticks steadily and every
/// `ticks_per_generation`-th tick is due for a generation
#[derive(Debug, Clone)]
pub struct Cadence {
    ticks_per_second: f64,
    ticks_per_generation: u32,
    tick: u32,
}
impl Cadence {
    pub fn new(ticks_per_second: f64, ticks_per_generation: u32) -> Self {
        Self {
            ticks_per_second,
            ticks_per_generation: ticks_per_generation.max(1),
            tick: 0,
        }
    }

    /// Time between two timer ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ticks_per_second)
    }

    pub fn generations_per_second(&self) -> f64 {
        self.ticks_per_second / self.ticks_per_generation as f64
    }

    /// Advances the timer by one tick, returning whether a generation is due
    ///
    /// The very first tick is always due.
    pub fn tick(&mut self) -> bool {
        let due = self.tick % self.ticks_per_generation == 0;
        if due {
            self.tick = 0;
        }
        self.tick += 1;
        due
    }
}
impl Default for Cadence {
    fn default() -> Self {
        Self::new(TICKS_PER_SECOND, TICKS_PER_GENERATION)
    }
}

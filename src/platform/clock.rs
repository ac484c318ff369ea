//! Fixed timestep accumulator
//!
//! Physics is expressed per tick, so the game only feels right at 60 ticks
//! per second. Displays refreshing faster or slower get the same number of
//! ticks per wall-clock second.

/// One simulation tick in milliseconds
pub const SIM_DT_MS: f64 = 1000.0 / 60.0;
/// Cap on ticks per frame so a long stall doesn't fast-forward the run
pub const MAX_SUBSTEPS: u32 = 4;

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_time: Option<f64>,
    accumulator: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp (ms); returns how many ticks to run.
    /// The first frame only primes the clock and always runs one tick.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_time.replace(now_ms) else {
            return 1;
        };
        // Clamp large gaps (tab switch, breakpoint)
        let dt = (now_ms - last).clamp(0.0, 100.0);
        self.accumulator += dt;

        let mut ticks = 0;
        while self.accumulator >= SIM_DT_MS && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT_MS;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            // Drop the backlog rather than spiral
            self.accumulator = self.accumulator.min(SIM_DT_MS);
        }
        ticks
    }

    /// Forget the previous timestamp (e.g. after the page was hidden)
    pub fn reset(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }
}

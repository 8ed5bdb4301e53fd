//! Frame clock

use std::time::Instant;

/// Tracks wall-clock frame time for the simulation step
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Last tick instant
    last_instant: Instant,
    /// Whether this is the first tick
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;

        // Clamp to avoid spiral of death (max 250ms frame time)
        self.delta_time = elapsed.min(0.25);
        self.total_time += self.delta_time;
    }

    /// Frame delta as f32 for the simulation step
    pub fn delta_seconds(&self) -> f32 {
        self.delta_time as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
    }

    #[test]
    fn ticks_accumulate_total_time() {
        let mut clock = FrameClock::new();
        clock.tick();
        std::thread::sleep(std::time::Duration::from_millis(5));
        clock.tick();
        assert!(clock.delta_time > 0.0);
        assert!(clock.total_time >= clock.delta_time);
    }
}

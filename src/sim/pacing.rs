//! Fixed-interval pacing
//!
//! Turns variable frame deltas into discrete command ticks, the same
//! accumulator scheme a fixed-timestep game loop uses. The first tick of a
//! run is released immediately; later ones wait a full interval.

use crate::consts::MAX_CATCH_UP_TICKS;

#[derive(Debug, Clone)]
pub struct Pacer {
    interval: f32,
    accumulator: f32,
}

impl Pacer {
    pub fn new(interval: f32) -> Self {
        let interval = interval.max(f32::EPSILON);
        Self {
            interval,
            accumulator: interval,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Re-arm so the next update releases a tick right away
    pub fn reset(&mut self) {
        self.accumulator = self.interval;
    }

    /// Advance by `dt` seconds; returns how many ticks are due
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.interval && due < MAX_CATCH_UP_TICKS {
            self.accumulator -= self.interval;
            due += 1;
        }
        // Drop backlog beyond the cap (tab was hidden, debugger pause, ...)
        if due == MAX_CATCH_UP_TICKS {
            self.accumulator = self.accumulator.min(self.interval);
        }
        due
    }
}

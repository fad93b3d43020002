//! Simulation Time
//!
//! Tick counter plus accumulated continuous time. Ticks advance by one per
//! `update_tick` call; time advances by the host-supplied delta.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of completed ticks
    pub tick: u64,
    /// Accumulated simulated time (sum of all tick deltas)
    pub time: f64,
}

impl SimTime {
    /// Creates a new SimTime.
    pub fn new(tick: u64, time: f64) -> Self {
        Self { tick, time }
    }

    /// Advances by one tick of the given delta. Negative deltas are ignored.
    pub fn advance(&mut self, delta: f32) {
        self.tick += 1;
        if delta > 0.0 {
            self.time += f64::from(delta);
        }
    }

    /// Time elapsed since an earlier timestamp.
    pub fn since(&self, earlier: f64) -> f64 {
        (self.time - earlier).max(0.0)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick_{}@{:.2}", self.tick, self.time)
    }
}

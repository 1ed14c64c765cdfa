use std::thread;
use std::time::Duration;

use log::debug;
use rand::Rng;
use serde::Deserialize;

/// A randomized politeness pause between outbound requests.
///
/// `max_ms == 0` turns the pause off entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DelayRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl DelayRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        DelayRange { min_ms, max_ms }
    }

    pub const fn none() -> Self {
        DelayRange { min_ms: 0, max_ms: 0 }
    }

    pub fn is_disabled(&self) -> bool {
        self.max_ms == 0
    }

    /// Picks a duration inside the range. Returns `None` when disabled.
    pub fn sample(&self) -> Option<Duration> {
        if self.is_disabled() {
            return None;
        }
        let low = self.min_ms.min(self.max_ms);
        let mut rng = rand::thread_rng();
        Some(Duration::from_millis(rng.gen_range(low..=self.max_ms)))
    }

    pub fn pause(&self, label: &str) {
        if let Some(delay) = self.sample() {
            debug!("Waiting {} ms ({})", delay.as_millis(), label);
            thread::sleep(delay);
        }
    }
}

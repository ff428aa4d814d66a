//! Update rate control for record subscriptions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How often a subscriber wants records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpdateRate {
    /// Every record the game sends (60Hz for the dash format)
    Native,

    /// At most this many records per second.
    /// A rate at or above the source rate falls back to Native.
    Max(u32),
}

impl UpdateRate {
    /// Normalize against the source rate.
    pub fn normalize(self, source_hz: f64) -> Self {
        match self {
            UpdateRate::Native => UpdateRate::Native,
            UpdateRate::Max(0) => UpdateRate::Native,
            UpdateRate::Max(hz) if hz as f64 >= source_hz => UpdateRate::Native,
            UpdateRate::Max(hz) => UpdateRate::Max(hz),
        }
    }

    /// Sampling period, or `None` when every record is delivered.
    pub fn sample_interval(self, source_hz: f64) -> Option<Duration> {
        match self.normalize(source_hz) {
            UpdateRate::Native => None,
            UpdateRate::Max(hz) => Some(Duration::from_secs_f64(1.0 / hz as f64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_at_or_above_source_are_native() {
        assert_eq!(UpdateRate::Max(60).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(120).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(0).normalize(60.0), UpdateRate::Native);
        assert_eq!(UpdateRate::Max(10).normalize(60.0), UpdateRate::Max(10));
    }

    #[test]
    fn sample_interval_matches_rate() {
        assert_eq!(UpdateRate::Native.sample_interval(60.0), None);
        assert_eq!(UpdateRate::Max(4).sample_interval(60.0), Some(Duration::from_millis(250)));
    }
}

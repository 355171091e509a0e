//! Timing points

use serde::{Deserialize, Serialize};

/// A tempo change. The editing core reads these but never mutates them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimingPoint {
    /// Start time in milliseconds
    pub start_time: i32,
    /// Beats per minute
    pub bpm: f32,
    /// Beats per measure
    pub signature: u8,
    /// Hide the measure lines in this section
    pub hidden: bool,
}

impl TimingPoint {
    pub fn new(start_time: i32, bpm: f32) -> Self {
        Self {
            start_time,
            bpm,
            signature: 4,
            hidden: false,
        }
    }

    /// Duration of one beat in milliseconds.
    pub fn beat_length(&self) -> f32 {
        if self.bpm > 0.0 {
            60_000.0 / self.bpm
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beat_length() {
        assert_eq!(TimingPoint::new(0, 120.0).beat_length(), 500.0);
        assert_eq!(TimingPoint::new(0, 0.0).beat_length(), 0.0);
    }
}

//! Chart game modes

use serde::{Deserialize, Serialize};

/// Game mode of a chart. Fixes the lane count for its lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Keys4,
    Keys7,
}

impl GameMode {
    /// Number of lanes (`K`).
    pub const fn key_count(&self) -> u8 {
        match self {
            GameMode::Keys4 => 4,
            GameMode::Keys7 => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GameMode::Keys4 => "4K",
            GameMode::Keys7 => "7K",
        }
    }

    /// Check that `lane` is within `1..=K`.
    pub fn contains_lane(&self, lane: i32) -> bool {
        lane >= 1 && lane <= self.key_count() as i32
    }

    /// Mirror a lane horizontally: `K + 1 - lane`.
    pub fn mirror_lane(&self, lane: u8) -> u8 {
        self.key_count() + 1 - lane
    }
}

impl Default for GameMode {
    fn default() -> Self {
        Self::Keys4
    }
}

//! Hit objects - the timed notes of a chart

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};
use crate::hitsound::HitSounds;
use crate::id::HitObjectId;
use crate::mode::GameMode;

/// Opaque reference to an editor layer. Layers are owned elsewhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

/// A timed input event in a chart.
///
/// `end_time == 0` means a normal note; otherwise the object is a long note
/// and `end_time > start_time`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitObject {
    /// Identity (never compared by value)
    pub id: HitObjectId,
    /// Start time in milliseconds
    pub start_time: i32,
    /// End time in milliseconds, 0 for normal notes
    pub end_time: i32,
    /// Lane in `1..=K`
    pub lane: u8,
    /// Hitsound flags
    pub hit_sounds: HitSounds,
    /// Editor layer
    pub layer: Option<LayerId>,
}

impl HitObject {
    pub fn new(id: HitObjectId, start_time: i32, lane: u8) -> Self {
        Self {
            id,
            start_time,
            end_time: 0,
            lane,
            hit_sounds: HitSounds::NONE,
            layer: None,
        }
    }

    pub fn with_end_time(mut self, end_time: i32) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_hit_sounds(mut self, hit_sounds: HitSounds) -> Self {
        self.hit_sounds = hit_sounds;
        self
    }

    pub fn with_layer(mut self, layer: LayerId) -> Self {
        self.layer = Some(layer);
        self
    }

    #[inline]
    pub fn is_long_note(&self) -> bool {
        self.end_time != 0
    }

    /// Length of the long note body, 0 for normal notes.
    pub fn length(&self) -> i32 {
        if self.is_long_note() {
            self.end_time - self.start_time
        } else {
            0
        }
    }

    /// Ordering key used by [`crate::HitObjectList`].
    ///
    /// Start time first; lane and id break ties so that the order of
    /// simultaneous notes is canonical.
    #[inline]
    pub fn sort_key(&self) -> (i32, u8, HitObjectId) {
        (self.start_time, self.lane, self.id)
    }

    /// Check lane range, non-negative start and long note shape.
    pub fn validate(&self, mode: GameMode) -> Result<()> {
        if !mode.contains_lane(self.lane as i32) {
            return Err(ChartError::InvalidLane {
                lane: self.lane as i32,
                key_count: mode.key_count(),
            });
        }
        if self.start_time < 0 {
            return Err(ChartError::NegativeTime(self.start_time));
        }
        validate_end_time(self.start_time, self.end_time)
    }
}

/// `end_time` must be 0 or strictly after `start_time`.
pub fn validate_end_time(start_time: i32, end_time: i32) -> Result<()> {
    if end_time != 0 && end_time <= start_time {
        return Err(ChartError::InvalidLongNote { start_time, end_time });
    }
    Ok(())
}

//! Error types for chart document operations

use thiserror::Error;

use crate::id::{BookmarkId, HitObjectId};

/// Chart document errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    /// Lane outside `1..=key_count`
    #[error("Lane {lane} is outside 1..={key_count}")]
    InvalidLane { lane: i32, key_count: u8 },

    /// Start time before the beginning of the song
    #[error("Negative start time: {0}ms")]
    NegativeTime(i32),

    /// Long note whose end does not come after its start
    #[error("Long note end {end_time}ms must be after start {start_time}ms")]
    InvalidLongNote { start_time: i32, end_time: i32 },

    /// Hit object id is already present in the chart
    #[error("Hit object {0} is already in the chart")]
    DuplicateHitObject(HitObjectId),

    /// Hit object id is not present in the chart
    #[error("Hit object not found: {0}")]
    HitObjectNotFound(HitObjectId),

    /// Bookmark id is already present in the chart
    #[error("Bookmark {0} is already in the chart")]
    DuplicateBookmark(BookmarkId),

    /// Move offset that has no inverse
    #[error("Offset of {time_offset}ms, {lane_offset} lanes cannot be undone")]
    InvalidOffset { time_offset: i32, lane_offset: i32 },

    /// Bookmark id is not present in the chart
    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(BookmarkId),
}

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;

//! # chart_core - Chart Document
//!
//! In-memory storage for an editable rhythm-game chart:
//! - **Hit objects**: timed notes and long notes, kept sorted by start time
//! - **Timing points**: tempo changes (read-only for the editing core)
//! - **Bookmarks**: annotated positions on the timeline
//!
//! The hit object list is shared with background readers (density sampling,
//! playback) through [`SharedHitObjects`], a mutex-guarded collection.
//! Every structural mutation happens while holding that lock.

pub mod error;
pub mod id;
pub mod mode;
pub mod hitsound;
pub mod hit_object;
pub mod timing_point;
pub mod bookmark;
pub mod shared;
pub mod chart;

pub use error::*;
pub use id::*;
pub use mode::*;
pub use hitsound::*;
pub use hit_object::*;
pub use timing_point::*;
pub use bookmark::*;
pub use shared::*;
pub use chart::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::bookmark::Bookmark;
    pub use crate::chart::{ChartDocument, ChartSnapshot};
    pub use crate::error::{ChartError, Result};
    pub use crate::hit_object::{HitObject, LayerId};
    pub use crate::hitsound::HitSounds;
    pub use crate::id::{BookmarkId, HitObjectId, IdGenerator};
    pub use crate::mode::GameMode;
    pub use crate::shared::{HitObjectList, SharedHitObjects};
    pub use crate::timing_point::TimingPoint;
}

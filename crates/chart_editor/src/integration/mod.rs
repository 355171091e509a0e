//! Boundaries to the systems an edit touches besides the chart itself.
//!
//! Actions never own these collaborators; they receive them through the
//! [`crate::core::EditContext`] and call them once per affected hit object.
//! A failing collaborator aborts the action and the error reaches the
//! caller unchanged.

mod cursor;
mod density;
mod visual_pool;

pub use cursor::SnapCursor;
pub use density::{density_bins, DensityBins, DensitySampler, NoteDensityCache};
pub use visual_pool::{NoteProxy, ProxyPool};

use chart_core::HitObject;
use thiserror::Error;

/// Failure reported by a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CollaboratorError {
    pub message: String,
}

impl CollaboratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type CollaboratorResult = Result<(), CollaboratorError>;

/// Pool of drawable proxies, one per hit object.
pub trait VisualPool {
    fn add_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult;

    fn remove_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult;

    /// Lane or position changed; update image and geometry.
    fn refresh_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult;

    /// Long note body/tail changed.
    fn resize_long_note_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult;
}

/// Per-object density samples plus an aggregate view.
pub trait DensityCache {
    /// Re-read the sample for one object (added, removed or moved).
    fn refresh_sample(&mut self, hit_object: &HitObject) -> CollaboratorResult;

    /// Rebuild the aggregate. Called exactly once per structural action.
    fn force_recache(&mut self) -> CollaboratorResult;
}

/// Playback/snap cursor that tracks the next hit object to be played.
pub trait PlaybackCursor {
    /// Current song time in milliseconds.
    fn current_time(&self) -> i32;

    fn set_cursor_index(&mut self, index: usize) -> CollaboratorResult;
}

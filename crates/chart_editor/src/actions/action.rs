//! Action trait and result types.

use std::fmt;

use chart_core::ChartError;
use thiserror::Error;

use crate::core::EditContext;
use crate::integration::CollaboratorError;

/// Result type for action execution.
pub type ActionResult = Result<(), ActionError>;

/// Errors that abort an action.
///
/// None of these are recovered inside the engine. A collaborator failure
/// leaves the session in an unknown state and is reported to the caller.
#[derive(Debug, Error)]
pub enum ActionError {
    /// Chart lookup or validation failed
    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("Visual pool failed: {0}")]
    VisualPool(#[source] CollaboratorError),

    #[error("Density cache failed: {0}")]
    DensityCache(#[source] CollaboratorError),

    #[error("Playback cursor failed: {0}")]
    PlaybackCursor(#[source] CollaboratorError),
}

/// Tag identifying an action variant, for logging and inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    PlaceHitObject,
    DeleteHitObject,
    PlaceHitObjectBatch,
    DeleteHitObjectBatch,
    FlipHitObjects,
    MoveHitObjects,
    ResizeLongNote,
    AddHitsound,
    RemoveHitsound,
    AddBookmark,
    RemoveBookmark,
    EditBookmark,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::PlaceHitObject => "Place Hit Object",
            ActionKind::DeleteHitObject => "Delete Hit Object",
            ActionKind::PlaceHitObjectBatch => "Place Hit Objects",
            ActionKind::DeleteHitObjectBatch => "Delete Hit Objects",
            ActionKind::FlipHitObjects => "Flip Hit Objects",
            ActionKind::MoveHitObjects => "Move Hit Objects",
            ActionKind::ResizeLongNote => "Resize Long Note",
            ActionKind::AddHitsound => "Add Hitsound",
            ActionKind::RemoveHitsound => "Remove Hitsound",
            ActionKind::AddBookmark => "Add Bookmark",
            ActionKind::RemoveBookmark => "Remove Bookmark",
            ActionKind::EditBookmark => "Edit Bookmark",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reversible mutation of the chart.
///
/// `perform` and `undo` receive the [`EditContext`] of the session; an
/// action keeps only the ids or copies it needs to reverse itself. Redo is
/// `perform` called again.
///
/// # Example
///
/// ```ignore
/// struct Nudge {
///     target: HitObjectId,
///     delta: i32,
/// }
///
/// impl Action for Nudge {
///     fn kind(&self) -> ActionKind { ActionKind::MoveHitObjects }
///
///     fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
///         MoveHitObjects::new_unchecked(vec![self.target], self.delta, 0).perform(ctx)
///     }
///
///     fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
///         MoveHitObjects::new_unchecked(vec![self.target], -self.delta, 0).perform(ctx)
///     }
/// }
/// ```
pub trait Action: Send {
    fn kind(&self) -> ActionKind;

    /// Human-readable description for the undo/redo menu.
    fn description(&self) -> &str {
        self.kind().label()
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult;

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult;
}

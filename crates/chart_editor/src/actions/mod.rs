//! Reversible edit actions.
//!
//! Every chart modification that should be undoable goes through an
//! [`Action`] performed by the [`crate::core::ActionManager`].

mod action;
mod bookmark_actions;
mod hit_object_actions;
mod hitsound_actions;
mod transform_actions;

pub use action::{Action, ActionError, ActionKind, ActionResult};
pub use bookmark_actions::{AddBookmark, EditBookmark, RemoveBookmark};
pub use hit_object_actions::{
    BatchDeleteHitObjects,
    BatchPlaceHitObjects,
    DeleteHitObject,
    PlaceHitObject,
};
pub use hitsound_actions::{AddHitsound, RemoveHitsound};
pub use transform_actions::{FlipHitObjectsHorizontally, MoveHitObjects, ResizeLongNote};

use std::collections::HashSet;

use chart_core::{HitObject, HitObjectId};

/// Drop repeated ids, keeping the first occurrence.
pub(crate) fn dedup_by_id(targets: Vec<HitObject>, kind: ActionKind) -> Vec<HitObject> {
    let total = targets.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<_> = targets.into_iter().filter(|h| seen.insert(h.id)).collect();
    if unique.len() != total {
        log::warn!("{}: dropped {} duplicate targets", kind, total - unique.len());
    }
    unique
}

pub(crate) fn dedup_ids(targets: Vec<HitObjectId>, kind: ActionKind) -> Vec<HitObjectId> {
    let total = targets.len();
    let mut seen = HashSet::with_capacity(total);
    let unique: Vec<_> = targets.into_iter().filter(|id| seen.insert(*id)).collect();
    if unique.len() != total {
        log::warn!("{}: dropped {} duplicate targets", kind, total - unique.len());
    }
    unique
}

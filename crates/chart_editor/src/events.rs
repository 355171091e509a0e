//! Structural events raised by the action manager.
//!
//! Observers such as a timeline footer subscribe to these and pull whatever
//! else they need from the chart themselves. Undoing an action raises the
//! events of its inverse.

use chart_core::{Bookmark, HitObject, HitObjectId, HitSounds};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    HitObjectPlaced(HitObject),
    HitObjectRemoved(HitObject),
    HitObjectsBatchPlaced(Vec<HitObject>),
    HitObjectsBatchRemoved(Vec<HitObject>),
    HitObjectsFlipped(Vec<HitObject>),
    HitObjectsMoved {
        hit_objects: Vec<HitObject>,
        time_offset: i32,
        lane_offset: i32,
    },
    LongNoteResized {
        hit_object: HitObject,
        previous_end_time: i32,
    },
    HitsoundAdded {
        hit_objects: Vec<HitObjectId>,
        sound: HitSounds,
    },
    HitsoundRemoved {
        hit_objects: Vec<HitObjectId>,
        sound: HitSounds,
    },
    BookmarkAdded(Bookmark),
    BookmarkRemoved(Bookmark),
    BookmarkEdited {
        bookmark: Bookmark,
        previous_note: Option<String>,
    },
    /// Raised after every perform, undo, redo and clear.
    HistoryChanged { can_undo: bool, can_redo: bool },
}

impl EditorEvent {
    /// Whether the event changes the hit object list or its ordering.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EditorEvent::HitObjectPlaced(_)
                | EditorEvent::HitObjectRemoved(_)
                | EditorEvent::HitObjectsBatchPlaced(_)
                | EditorEvent::HitObjectsBatchRemoved(_)
                | EditorEvent::HitObjectsMoved { .. }
        )
    }
}

//! Timeline bookmarks

use serde::{Deserialize, Serialize};

use crate::id::BookmarkId;

/// An annotated position on the timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    /// Position in milliseconds
    pub start_time: i32,
    pub note: Option<String>,
}

impl Bookmark {
    pub fn new(id: BookmarkId, start_time: i32, note: Option<String>) -> Self {
        Self { id, start_time, note }
    }

    #[inline]
    pub fn sort_key(&self) -> (i32, BookmarkId) {
        (self.start_time, self.id)
    }
}

//! Bookmark creation, removal and editing.

use chart_core::{Bookmark, BookmarkId, ChartError};

use super::{Action, ActionKind, ActionResult};
use crate::core::EditContext;
use crate::events::EditorEvent;

/// Add a bookmark. The bookmark id is allocated on first perform and
/// reused on redo.
pub struct AddBookmark {
    start_time: i32,
    note: Option<String>,
    bookmark: Option<Bookmark>,
}

impl AddBookmark {
    pub fn new(start_time: i32, note: Option<String>) -> Self {
        Self {
            start_time,
            note,
            bookmark: None,
        }
    }

    /// Re-add a previously removed bookmark with its original id.
    pub fn restore(bookmark: Bookmark) -> Self {
        Self {
            start_time: bookmark.start_time,
            note: bookmark.note.clone(),
            bookmark: Some(bookmark),
        }
    }

    /// The bookmark once it has been created.
    pub fn bookmark(&self) -> Option<&Bookmark> {
        self.bookmark.as_ref()
    }
}

impl Action for AddBookmark {
    fn kind(&self) -> ActionKind {
        ActionKind::AddBookmark
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let bookmark = match &self.bookmark {
            Some(bookmark) => bookmark.clone(),
            None => {
                let created = ctx.chart().create_bookmark(self.start_time, self.note.clone());
                self.bookmark = Some(created.clone());
                created
            }
        };

        if !ctx.chart_mut().insert_bookmark(bookmark.clone()) {
            return Err(ChartError::DuplicateBookmark(bookmark.id).into());
        }
        log::debug!("Added {} at {}ms", bookmark.id, bookmark.start_time);
        ctx.emit(EditorEvent::BookmarkAdded(bookmark));
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        match &self.bookmark {
            Some(bookmark) => RemoveBookmark::new(bookmark.id).perform(ctx),
            None => Ok(()),
        }
    }
}

/// Remove a bookmark.
pub struct RemoveBookmark {
    target: BookmarkId,
    removed: Option<Bookmark>,
}

impl RemoveBookmark {
    pub fn new(target: BookmarkId) -> Self {
        Self {
            target,
            removed: None,
        }
    }
}

impl Action for RemoveBookmark {
    fn kind(&self) -> ActionKind {
        ActionKind::RemoveBookmark
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let removed = ctx.chart_mut().remove_bookmark(self.target)?;
        log::debug!("Removed {}", removed.id);
        ctx.emit(EditorEvent::BookmarkRemoved(removed.clone()));
        self.removed = Some(removed);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        match &self.removed {
            Some(bookmark) => AddBookmark::restore(bookmark.clone()).perform(ctx),
            None => Ok(()),
        }
    }
}

/// Replace the note of a bookmark.
pub struct EditBookmark {
    target: BookmarkId,
    note: Option<String>,
    previous_note: Option<Option<String>>,
}

impl EditBookmark {
    pub fn new(target: BookmarkId, note: Option<String>) -> Self {
        Self {
            target,
            note,
            previous_note: None,
        }
    }

    fn set_note(ctx: &mut EditContext<'_>, target: BookmarkId, note: Option<String>) -> Result<Option<String>, ChartError> {
        let bookmark = ctx
            .chart_mut()
            .bookmark_mut(target)
            .ok_or(ChartError::BookmarkNotFound(target))?;
        let previous = std::mem::replace(&mut bookmark.note, note);
        let edited = bookmark.clone();
        ctx.emit(EditorEvent::BookmarkEdited {
            bookmark: edited,
            previous_note: previous.clone(),
        });
        Ok(previous)
    }
}

impl Action for EditBookmark {
    fn kind(&self) -> ActionKind {
        ActionKind::EditBookmark
    }

    fn perform(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        let previous = Self::set_note(ctx, self.target, self.note.clone())?;
        self.previous_note = Some(previous);
        Ok(())
    }

    fn undo(&mut self, ctx: &mut EditContext<'_>) -> ActionResult {
        if let Some(previous) = self.previous_note.clone() {
            Self::set_note(ctx, self.target, previous)?;
        }
        Ok(())
    }
}

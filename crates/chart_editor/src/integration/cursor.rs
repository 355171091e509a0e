use super::{CollaboratorResult, PlaybackCursor};

/// Cursor driven by an externally supplied song time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapCursor {
    time: i32,
    index: usize,
    updates: usize,
}

impl SnapCursor {
    pub fn new(time: i32) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// Move the song position. The index is refreshed on the next edit.
    pub fn seek(&mut self, time: i32) {
        self.time = time;
    }

    /// Index of the next hit object at or after the current time.
    pub fn index(&self) -> usize {
        self.index
    }

    /// How many times the index was refreshed.
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl PlaybackCursor for SnapCursor {
    fn current_time(&self) -> i32 {
        self.time
    }

    fn set_cursor_index(&mut self, index: usize) -> CollaboratorResult {
        self.index = index;
        self.updates += 1;
        Ok(())
    }
}

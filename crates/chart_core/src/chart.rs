//! The chart document - single source of truth for an editing session.

use serde::{Deserialize, Serialize};

use crate::bookmark::Bookmark;
use crate::error::{ChartError, Result};
use crate::hit_object::HitObject;
use crate::id::{BookmarkId, HitObjectId, IdGenerator};
use crate::mode::GameMode;
use crate::shared::{HitObjectList, SharedHitObjects};
use crate::timing_point::TimingPoint;

/// Plain-data copy of a chart, used by external serializers and for
/// structural comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub mode: GameMode,
    pub hit_objects: Vec<HitObject>,
    pub timing_points: Vec<TimingPoint>,
    pub bookmarks: Vec<Bookmark>,
}

/// An editable chart.
///
/// Owns no behaviour beyond storage and ordering. Mutation happens through
/// editor actions; the hit object list can additionally be shared with
/// background readers via [`ChartDocument::hit_objects`].
#[derive(Debug)]
pub struct ChartDocument {
    mode: GameMode,
    hit_objects: SharedHitObjects,
    timing_points: Vec<TimingPoint>,
    bookmarks: Vec<Bookmark>,
    ids: IdGenerator,
}

impl ChartDocument {
    /// Create an empty chart.
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            hit_objects: SharedHitObjects::default(),
            timing_points: Vec::new(),
            bookmarks: Vec::new(),
            ids: IdGenerator::new(),
        }
    }

    /// Rebuild a chart from plain data. Collections are sorted and the id
    /// generator continues after the highest loaded id.
    pub fn from_snapshot(snapshot: ChartSnapshot) -> Self {
        let max_hit_object = snapshot.hit_objects.iter().map(|h| h.id.to_raw().saturating_add(1)).max();
        let max_bookmark = snapshot.bookmarks.iter().map(|b| b.id.to_raw().saturating_add(1)).max();
        let first_free = max_hit_object.max(max_bookmark).unwrap_or(0);

        let mut timing_points = snapshot.timing_points;
        timing_points.sort_by_key(|t| t.start_time);
        let mut bookmarks = snapshot.bookmarks;
        bookmarks.sort_by_key(Bookmark::sort_key);

        Self {
            mode: snapshot.mode,
            hit_objects: SharedHitObjects::new(HitObjectList::from_vec(snapshot.hit_objects)),
            timing_points,
            bookmarks,
            ids: IdGenerator::starting_at(first_free),
        }
    }

    /// Copy the current state.
    pub fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            mode: self.mode,
            hit_objects: self.hit_objects.snapshot(),
            timing_points: self.timing_points.clone(),
            bookmarks: self.bookmarks.clone(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn key_count(&self) -> u8 {
        self.mode.key_count()
    }

    // ---- Hit objects ----

    /// Shared handle to the hit object list.
    pub fn hit_objects(&self) -> &SharedHitObjects {
        &self.hit_objects
    }

    /// Allocate a fresh normal note. It is not inserted into the chart.
    pub fn create_hit_object(&self, start_time: i32, lane: u8) -> HitObject {
        HitObject::new(self.ids.next_hit_object(), start_time, lane)
    }

    /// Allocate a fresh long note. It is not inserted into the chart.
    pub fn create_long_note(&self, start_time: i32, end_time: i32, lane: u8) -> HitObject {
        self.create_hit_object(start_time, lane).with_end_time(end_time)
    }

    /// Check a hit object against this chart's lane count and timing rules.
    pub fn validate_hit_object(&self, object: &HitObject) -> Result<()> {
        object.validate(self.mode)
    }

    // ---- Timing points ----

    pub fn timing_points(&self) -> &[TimingPoint] {
        &self.timing_points
    }

    /// Add a timing point while building a chart. Not an undoable edit.
    pub fn add_timing_point(&mut self, point: TimingPoint) {
        self.timing_points.push(point);
        self.timing_points.sort_by_key(|t| t.start_time);
    }

    /// Timing point in effect at `time`.
    pub fn timing_point_at(&self, time: i32) -> Option<&TimingPoint> {
        let index = self.timing_points.partition_point(|t| t.start_time <= time);
        if index == 0 {
            self.timing_points.first()
        } else {
            self.timing_points.get(index - 1)
        }
    }

    // ---- Bookmarks ----

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Allocate a fresh bookmark. It is not inserted into the chart.
    pub fn create_bookmark(&self, start_time: i32, note: Option<String>) -> Bookmark {
        Bookmark::new(self.ids.next_bookmark(), start_time, note)
    }

    pub fn bookmark(&self, id: BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    pub fn bookmark_mut(&mut self, id: BookmarkId) -> Option<&mut Bookmark> {
        self.bookmarks.iter_mut().find(|b| b.id == id)
    }

    /// Insert a bookmark at its sorted position. Returns false if a
    /// bookmark with the same id is already present.
    pub fn insert_bookmark(&mut self, bookmark: Bookmark) -> bool {
        if self.bookmark(bookmark.id).is_some() {
            return false;
        }
        let key = bookmark.sort_key();
        let index = self.bookmarks.partition_point(|b| b.sort_key() < key);
        self.bookmarks.insert(index, bookmark);
        true
    }

    pub fn remove_bookmark(&mut self, id: BookmarkId) -> Result<Bookmark> {
        let index = self
            .bookmarks
            .iter()
            .position(|b| b.id == id)
            .ok_or(ChartError::BookmarkNotFound(id))?;
        Ok(self.bookmarks.remove(index))
    }

    /// Current copy of a hit object, or `HitObjectNotFound`.
    pub fn require_hit_object(&self, id: HitObjectId) -> Result<HitObject> {
        self.hit_objects.get(id).ok_or(ChartError::HitObjectNotFound(id))
    }
}

impl Default for ChartDocument {
    fn default() -> Self {
        Self::new(GameMode::default())
    }
}

//! The hit object list and its shared, lock-guarded handle
//!
//! The list is read by background tasks (density sampling, playback cursor
//! refresh) while the editing thread mutates it. Readers and writers go
//! through [`SharedHitObjects::lock`]; a batch mutation holds the guard for
//! its entire read-modify-write so no reader observes a torn list.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::hit_object::HitObject;
use crate::id::HitObjectId;

/// Hit objects ordered by [`HitObject::sort_key`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitObjectList {
    objects: Vec<HitObject>,
}

impl HitObjectList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from arbitrary input; the result is sorted.
    pub fn from_vec(objects: Vec<HitObject>) -> Self {
        let mut list = Self { objects };
        list.sort();
        list
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HitObject> {
        self.objects.iter()
    }

    pub fn as_slice(&self) -> &[HitObject] {
        &self.objects
    }

    pub fn to_vec(&self) -> Vec<HitObject> {
        self.objects.clone()
    }

    pub fn contains(&self, id: HitObjectId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: HitObjectId) -> Option<usize> {
        self.objects.iter().position(|h| h.id == id)
    }

    pub fn get(&self, id: HitObjectId) -> Option<&HitObject> {
        self.objects.iter().find(|h| h.id == id)
    }

    /// Mutable access by id. Callers that change `start_time` or `lane`
    /// must call [`Self::sort`] before releasing the lock.
    pub fn get_mut(&mut self, id: HitObjectId) -> Option<&mut HitObject> {
        self.objects.iter_mut().find(|h| h.id == id)
    }

    /// Append without sorting. Pair with [`Self::sort`].
    pub fn push(&mut self, object: HitObject) {
        self.objects.push(object);
    }

    /// Remove by id without disturbing the order of the rest.
    pub fn remove(&mut self, id: HitObjectId) -> Option<HitObject> {
        let index = self.position(id)?;
        Some(self.objects.remove(index))
    }

    /// Remove every object whose id is in `ids`, returning them in list order.
    pub fn remove_all(&mut self, ids: &HashSet<HitObjectId>) -> Vec<HitObject> {
        let mut removed = Vec::new();
        self.objects.retain(|h| {
            if ids.contains(&h.id) {
                removed.push(h.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Restore ascending order.
    pub fn sort(&mut self) {
        self.objects.sort_by_key(HitObject::sort_key);
    }

    /// Check the ordering invariant.
    pub fn is_sorted(&self) -> bool {
        self.objects
            .windows(2)
            .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
    }

    /// Index of the first object starting at or after `time`.
    pub fn index_at_time(&self, time: i32) -> usize {
        self.objects.partition_point(|h| h.start_time < time)
    }

    /// Objects whose start time lies in `[start, end)`.
    pub fn in_range(&self, start: i32, end: i32) -> &[HitObject] {
        let lo = self.index_at_time(start);
        let hi = self.index_at_time(end).max(lo);
        &self.objects[lo..hi]
    }
}

/// Cloneable handle to the hit object list of a chart.
#[derive(Clone, Debug, Default)]
pub struct SharedHitObjects {
    inner: Arc<Mutex<HitObjectList>>,
}

impl SharedHitObjects {
    pub fn new(list: HitObjectList) -> Self {
        Self {
            inner: Arc::new(Mutex::new(list)),
        }
    }

    /// Enter the critical section.
    pub fn lock(&self) -> MutexGuard<'_, HitObjectList> {
        self.inner.lock()
    }

    /// Copy the current contents.
    pub fn snapshot(&self) -> Vec<HitObject> {
        self.lock().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current copy of one object.
    pub fn get(&self, id: HitObjectId) -> Option<HitObject> {
        self.lock().get(id).cloned()
    }

    pub fn contains(&self, id: HitObjectId) -> bool {
        self.lock().contains(id)
    }

    /// Whether two handles point at the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

//! Pooled note proxies.

use std::collections::HashMap;

use chart_core::{HitObject, HitObjectId};

use super::{CollaboratorError, CollaboratorResult, VisualPool};

/// Drawable stand-in for a hit object.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteProxy {
    pub lane: u8,
    pub start_time: i32,
    /// Body length in milliseconds, 0 for normal notes
    pub body_length: i32,
}

impl NoteProxy {
    fn sync(&mut self, hit_object: &HitObject) {
        self.lane = hit_object.lane;
        self.start_time = hit_object.start_time;
        self.body_length = hit_object.length();
    }
}

/// Reuses released proxies instead of allocating new ones.
#[derive(Debug, Default)]
pub struct ProxyPool {
    active: HashMap<HitObjectId, NoteProxy>,
    free: Vec<NoteProxy>,
}

impl ProxyPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: HitObjectId) -> Option<&NoteProxy> {
        self.active.get(&id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    fn active_mut(&mut self, hit_object: &HitObject) -> Result<&mut NoteProxy, CollaboratorError> {
        self.active
            .get_mut(&hit_object.id)
            .ok_or_else(|| CollaboratorError::new(format!("No proxy for {}", hit_object.id)))
    }
}

impl VisualPool for ProxyPool {
    fn add_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult {
        let mut proxy = self.free.pop().unwrap_or_default();
        proxy.sync(hit_object);
        if self.active.insert(hit_object.id, proxy).is_some() {
            log::warn!("Replaced existing proxy for {}", hit_object.id);
        }
        Ok(())
    }

    fn remove_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult {
        let proxy = self
            .active
            .remove(&hit_object.id)
            .ok_or_else(|| CollaboratorError::new(format!("No proxy for {}", hit_object.id)))?;
        self.free.push(proxy);
        Ok(())
    }

    fn refresh_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult {
        self.active_mut(hit_object)?.sync(hit_object);
        Ok(())
    }

    fn resize_long_note_proxy(&mut self, hit_object: &HitObject) -> CollaboratorResult {
        self.active_mut(hit_object)?.body_length = hit_object.length();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proxies_are_recycled() {
        let mut pool = ProxyPool::new();
        let note = HitObject::new(HitObjectId::from_raw(1), 100, 2);

        pool.add_proxy(&note).unwrap();
        assert_eq!(pool.get(note.id).unwrap().lane, 2);

        pool.remove_proxy(&note).unwrap();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 1);

        pool.add_proxy(&note).unwrap();
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_missing_proxy_is_an_error() {
        let mut pool = ProxyPool::new();
        let note = HitObject::new(HitObjectId::from_raw(9), 100, 1);
        assert!(pool.remove_proxy(&note).is_err());
        assert!(pool.refresh_proxy(&note).is_err());
    }

    #[test]
    fn test_resize() {
        let mut pool = ProxyPool::new();
        let mut note = HitObject::new(HitObjectId::from_raw(1), 100, 1).with_end_time(400);
        pool.add_proxy(&note).unwrap();
        assert_eq!(pool.get(note.id).unwrap().body_length, 300);

        note.end_time = 0;
        pool.resize_long_note_proxy(&note).unwrap();
        assert_eq!(pool.get(note.id).unwrap().body_length, 0);
    }
}

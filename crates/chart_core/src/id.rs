//! Stable identifiers for chart elements
//!
//! Hit objects and bookmarks are identified by handle, never by value:
//! two notes may share a start time and lane and still be distinct.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identity of a hit object within a chart.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitObjectId(u64);

/// Identity of a bookmark within a chart.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(u64);

macro_rules! impl_id {
    ($name:ident, $label:literal) => {
        impl $name {
            /// Create from a raw value
            #[inline]
            pub const fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw value
            #[inline]
            pub const fn to_raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

impl_id!(HitObjectId, "HitObject");
impl_id!(BookmarkId, "Bookmark");

/// Thread-safe monotonic ID generator
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    /// Create a new ID generator
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a generator whose first ID is `first`.
    ///
    /// Used when a chart is rebuilt from a snapshot so that fresh IDs never
    /// collide with loaded ones.
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Generate the next raw ID
    pub fn next_raw(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Generate the next hit object ID
    pub fn next_hit_object(&self) -> HitObjectId {
        HitObjectId(self.next_raw())
    }

    /// Generate the next bookmark ID
    pub fn next_bookmark(&self) -> BookmarkId {
        BookmarkId(self.next_raw())
    }

    /// Peek at the next ID without consuming it
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_is_monotonic() {
        let gen = IdGenerator::new();
        let a = gen.next_hit_object();
        let b = gen.next_hit_object();
        let c = gen.next_bookmark();

        assert!(a < b);
        assert_eq!(c.to_raw(), 2);
        assert_eq!(gen.peek(), 3);
    }

    #[test]
    fn test_starting_at() {
        let gen = IdGenerator::starting_at(40);
        assert_eq!(gen.next_hit_object(), HitObjectId::from_raw(40));
    }

    #[test]
    fn test_display() {
        assert_eq!(HitObjectId::from_raw(7).to_string(), "HitObject#7");
        assert_eq!(format!("{:?}", BookmarkId::from_raw(3)), "Bookmark(3)");
    }
}

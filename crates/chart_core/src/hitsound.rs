//! HitSounds - bit-level hitsound flags

use core::fmt;
use core::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Set of hitsounds played when a hit object is hit.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HitSounds {
    bits: u8,
}

impl HitSounds {
    pub const NONE: Self = Self { bits: 0 };
    pub const NORMAL: Self = Self { bits: 1 << 0 };
    pub const WHISTLE: Self = Self { bits: 1 << 1 };
    pub const FINISH: Self = Self { bits: 1 << 2 };
    pub const CLAP: Self = Self { bits: 1 << 3 };

    /// Every defined flag
    pub const ALL: Self = Self { bits: 0b1111 };

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits: bits & Self::ALL.bits }
    }

    #[inline]
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Check that every bit of `other` is set
    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Set the bits of `other`
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.bits |= other.bits;
    }

    /// Clear the bits of `other`
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.bits &= !other.bits;
    }

    /// Bits set in both
    #[inline]
    pub const fn intersection(self, other: Self) -> Self {
        Self { bits: self.bits & other.bits }
    }

    fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        [
            (Self::NORMAL, "Normal"),
            (Self::WHISTLE, "Whistle"),
            (Self::FINISH, "Finish"),
            (Self::CLAP, "Clap"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
    }
}

impl BitOr for HitSounds {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self { bits: self.bits | rhs.bits }
    }
}

impl BitOrAssign for HitSounds {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitAnd for HitSounds {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl fmt::Debug for HitSounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HitSounds({})", self)
    }
}

impl fmt::Display for HitSounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "None");
        }
        let names: Vec<_> = self.names().collect();
        write!(f, "{}", names.join("|"))
    }
}

//! Path hashing.
//!
//! Every namespace slot is addressed by the SDBM hash of its normalized path.
//! The hash is case-sensitive and does no normalization of its own, so callers
//! must pass paths through [`crate::path::normalize`] first.
//!
//! Collisions are possible and are not detected: two distinct paths with the
//! same hash share one slot, and the later `add` wins.

use std::fmt;

/// Identifier of a namespace slot, derived from the slot's normalized path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

/// Hash a normalized path string into an [`EntryId`].
///
/// Seed 0; for each character `c`: `hash = c + (hash << 6) + (hash << 16) - hash`,
/// all arithmetic wrapping at 2^32.
#[inline]
pub fn hash(path: &str) -> EntryId {
    let mut hash: u32 = 0;
    for c in path.chars() {
        hash = (c as u32)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash);
    }
    EntryId(hash)
}

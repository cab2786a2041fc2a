// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! External point identifiers and the dense vertex index map.

use core::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// External identifier carried by a point entity.
///
/// Supplied by the upstream stream, unique per point, up to 64 bits wide.
/// Never used to address the store directly — lookups go through
/// [`IdIndex`] to obtain a dense [`VertexIdx`].
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dense, zero-based index of a vertex inside [`crate::RoadGraph`].
///
/// Assigned in first-seen order, monotonically increasing, never reused.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VertexIdx(pub u32);

impl VertexIdx {
    /// Returns the index as a `usize` for slice addressing.
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// A chain referenced a point id never seen in the stream.
///
/// This is a usage-order violation by the producer: every point a chain
/// references must have been delivered before the chain itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown point id: {0}")]
pub struct UnknownPointId(pub PointId);

/// Maps external point ids to dense vertex indices in first-seen order.
///
/// The index only grows; removal is unsupported, so the next dense index
/// is always the current entry count.
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    map: FxHashMap<PointId, VertexIdx>,
}

impl IdIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `id`, assigning the next dense index on first sight.
    ///
    /// Returns `None` when `id` was already interned — the caller must
    /// not treat a repeat as a fresh vertex. The returned index must be
    /// kept in lockstep with a matching `add_vertex` on the store.
    pub fn insert(&mut self, id: PointId) -> Option<VertexIdx> {
        if self.map.contains_key(&id) {
            return None;
        }
        debug_assert!(self.map.len() < u32::MAX as usize);
        #[allow(clippy::cast_possible_truncation)]
        let idx = VertexIdx(self.map.len() as u32);
        self.map.insert(id, idx);
        Some(idx)
    }

    /// Resolves an external id to its dense index.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownPointId`] when `id` was never interned.
    pub fn lookup(&self, id: PointId) -> Result<VertexIdx, UnknownPointId> {
        self.map.get(&id).copied().ok_or(UnknownPointId(id))
    }

    /// Returns `true` if `id` has been interned.
    pub fn contains(&self, id: PointId) -> bool {
        self.map.contains_key(&id)
    }

    /// Number of interned ids.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_first_seen_ordered() {
        let mut index = IdIndex::new();
        assert_eq!(index.insert(PointId(42)), Some(VertexIdx(0)));
        assert_eq!(index.insert(PointId(7)), Some(VertexIdx(1)));
        assert_eq!(index.insert(PointId(1000)), Some(VertexIdx(2)));
        assert_eq!(index.len(), 3);

        assert_eq!(index.lookup(PointId(7)), Ok(VertexIdx(1)));
        assert_eq!(index.lookup(PointId(42)), Ok(VertexIdx(0)));
    }

    #[test]
    fn repeat_insert_is_a_no_op() {
        let mut index = IdIndex::new();
        assert_eq!(index.insert(PointId(1)), Some(VertexIdx(0)));
        assert_eq!(index.insert(PointId(1)), None);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(PointId(1)), Ok(VertexIdx(0)));
    }

    #[test]
    fn lookup_of_unseen_id_fails() {
        let index = IdIndex::new();
        assert_eq!(
            index.lookup(PointId(99)),
            Err(UnknownPointId(PointId(99)))
        );
    }
}

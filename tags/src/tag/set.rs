use fixedbitset::FixedBitSet;

use crate::tag::Id;

/// Bitset-based set of tag ids.
///
/// Bit N set means tag id N is in the set. The bitset grows on demand to fit any id, so sets
/// built at different times against the same registry can be compared directly.
#[derive(Debug, Clone, Default)]
pub struct Set {
    bits: FixedBitSet,
}

impl Set {
    /// Empty set with no tags.
    pub const EMPTY: Self = Self {
        bits: FixedBitSet::new(),
    };

    /// Create an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Insert a tag id. Returns true if it was not already present.
    #[inline]
    pub fn insert(&mut self, id: Id) -> bool {
        let index = id.index();
        if self.bits.contains(index) {
            return false;
        }
        self.bits.grow(index + 1);
        self.bits.insert(index);
        true
    }

    /// Remove a tag id. Returns true if it was present.
    #[inline]
    pub fn remove(&mut self, id: Id) -> bool {
        let index = id.index();
        if !self.bits.contains(index) {
            return false;
        }
        self.bits.set(index, false);
        true
    }

    /// Check if the set contains the given tag id.
    #[inline]
    pub fn contains(&self, id: Id) -> bool {
        self.bits.contains(id.index())
    }

    /// Iterate the tag ids in ascending order.
    #[inline]
    pub fn ids(&self) -> impl Iterator<Item = Id> + '_ {
        self.bits.ones().map(|index| Id::new(index as u32))
    }

    /// Check if this set is empty (no tags).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Get the number of tags in this set.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }
}

impl PartialEq for Set {
    /// Sets are equal when they hold the same ids, regardless of how far either bitset grew.
    fn eq(&self, other: &Self) -> bool {
        self.bits.ones().eq(other.bits.ones())
    }
}

impl Eq for Set {}

impl FromIterator<Id> for Set {
    fn from_iter<I: IntoIterator<Item = Id>>(iter: I) -> Self {
        let mut set = Set::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

//! The weighted multi-tag index.
//!
//! A [`TagIndex`] keeps two maps that are always exact inverses of each other:
//!
//! - **by value**: each value's slot holds the [`tag::Set`] of tag ids attached to it
//! - **by tag**: each tag id holds a bitset of the value slots carrying it
//!
//! so `value ∈ values_for_tag(tag)` iff `tag ∈ tags_for_value(value)` after any sequence of
//! operations.
//!
//! # Slots
//!
//! Values are stored in slots assigned in insertion order. Slot order is what makes rankings
//! deterministic: values with equal weight come back in the order they were first added.
//! Removing a value vacates its slot; vacant slots are reclaimed by [`TagIndex::compact`], which
//! also runs automatically once enough of them pile up (see [`Config::compact_threshold`]).
//!
//! # Dormant values
//!
//! A value can lose all of its tags without being removed, through
//! [`remove_tags_from_value`](TagIndex::remove_tags_from_value) or
//! [`remove_values_for_tag`](TagIndex::remove_values_for_tag). Such a value is *dormant*: it keeps
//! its slot but is not present. It is skipped by [`values`](TagIndex::values), iteration, rankings
//! and listings, and [`contains`](TagIndex::contains) reports false. Adding tags to it again
//! revives it in its original position. [`remove`](TagIndex::remove) discards it for good.
//!
//! # Snapshots
//!
//! Every query returns owned values (`Vec<V>`, `Vec<T>`) rather than views into the maps, so
//! callers can keep results across later mutations.
//!
//! # Example
//!
//! ```rust
//! use rusty_tags::TagIndex;
//!
//! let mut index = TagIndex::new();
//! index.add("X", ["a"]).unwrap();
//! index.add("Y", ["b"]).unwrap();
//! index.add("Z", ["a", "b"]).unwrap();
//!
//! // Weights: a = 6, b = 4, c = 2
//! assert_eq!(index.find_matches(&["a", "b", "c"]), vec!["Z", "X", "Y"]);
//! ```

use std::{collections::HashMap, hash::Hash, sync::Arc};

use fixedbitset::FixedBitSet;
use log::{debug, trace};

use crate::{
    error::Error,
    tag::{self, Registry},
};

mod config;
mod iter;
mod query;
mod rank;
mod select;

pub use config::Config;
pub use iter::Iter;
pub use query::{Query, Weight};

/// Position of a value in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Slot(usize);

impl Slot {
    #[inline]
    const fn index(&self) -> usize {
        self.0
    }
}

/// A stored value together with the tags attached to it.
#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    tags: tag::Set,
}

impl<V> Entry<V> {
    /// A value is present while it carries at least one tag.
    #[inline]
    fn is_present(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// A bidirectional index between tags and values, with ranked retrieval.
///
/// `T` and `V` must be hashable and comparable; both are cloned into query results.
///
/// The index is a single-owner structure with no internal locking. Mutations take `&mut self`,
/// so they are serialized against each other and against queries by the borrow checker. Use an
/// [`EditBuffer`](crate::EditBuffer) to collect edits from shared contexts.
#[derive(Debug, Clone)]
pub struct TagIndex<T, V> {
    /// Settings shared with selected sub-indices.
    config: Config,

    /// Tag interner shared with selected sub-indices.
    registry: Arc<Registry<T>>,

    /// Entries in insertion order. Vacated slots stay `None` until compaction.
    entries: Vec<Option<Entry<V>>>,

    /// Slot lookup by value, including dormant values.
    slots: HashMap<V, Slot>,

    /// Value slots carrying each tag, indexed by tag id.
    holders: Vec<FixedBitSet>,

    /// Number of present values.
    len: usize,

    /// Number of `None` slots in `entries`.
    vacant: usize,
}

impl<T: Eq + Hash + Clone, V: Eq + Hash + Clone> Default for TagIndex<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone, V: Eq + Hash + Clone> TagIndex<T, V> {
    /// Create an empty index with the default configuration and its own tag registry.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(Config::DEFAULT)
    }

    /// Create an empty index with the given configuration.
    #[inline]
    pub fn with_config(config: Config) -> Self {
        Self::with_registry(config, Arc::new(Registry::new()))
    }

    /// Create an empty index that interns tags through an existing registry.
    ///
    /// Indices sharing a registry agree on tag ids.
    pub fn with_registry(config: Config, registry: Arc<Registry<T>>) -> Self {
        Self {
            config,
            registry,
            entries: Vec::new(),
            slots: HashMap::new(),
            holders: Vec::new(),
            len: 0,
            vacant: 0,
        }
    }

    /// The configuration of this index.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The tag registry of this index.
    #[inline]
    pub fn registry(&self) -> &Arc<Registry<T>> {
        &self.registry
    }

    /// Number of present values (values with at least one tag).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no value is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Associate `value` with every tag in `tags`.
    ///
    /// Re-adding an existing association is a no-op for that pair, so adding the same value and
    /// tags twice leaves the index as if it was added once.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `tags` is empty. The index is left unchanged.
    pub fn add<I>(&mut self, value: V, tags: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = T>,
    {
        let ids: Vec<tag::Id> = tags
            .into_iter()
            .map(|tag| self.registry.register(&tag))
            .collect();
        if ids.is_empty() {
            return Err(Error::EMPTY_TAGS);
        }

        let slot = self.slot_or_insert(value);
        let linked = ids.into_iter().filter(|id| self.link(slot, *id)).count();
        trace!("linked {linked} new tag(s) to slot {}", slot.index());

        Ok(())
    }

    /// Remove `value` and every association it has.
    ///
    /// Returns true if at least one association was dropped. Removing an unknown or dormant value
    /// returns false (a dormant value is still discarded).
    pub fn remove(&mut self, value: &V) -> bool {
        let Some(slot) = self.slots.remove(value) else {
            return false;
        };
        let Some(entry) = self.entries.get_mut(slot.index()).and_then(Option::take) else {
            return false;
        };
        self.vacant += 1;

        for id in entry.tags.ids() {
            if let Some(holders) = self.holders.get_mut(id.index()) {
                clear_bit(holders, slot.index());
            }
        }

        let removed = entry.is_present();
        if removed {
            self.len -= 1;
        }
        trace!("removed slot {} (present: {removed})", slot.index());

        self.maybe_compact();
        removed
    }

    /// Drop `tag` from every value carrying it. Those values stay indexed under their other tags;
    /// values left with no tag become dormant.
    ///
    /// Returns true if any value carried the tag.
    pub fn remove_values_for_tag(&mut self, tag: &T) -> bool {
        let Some(id) = self.registry.get(tag) else {
            return false;
        };
        let Some(holders) = self.holders.get_mut(id.index()) else {
            return false;
        };
        let slots: Vec<usize> = holders.ones().collect();
        holders.clear();

        for slot in &slots {
            if let Some(Some(entry)) = self.entries.get_mut(*slot) {
                entry.tags.remove(id);
                if !entry.is_present() {
                    self.len -= 1;
                }
            }
        }
        trace!("dropped tag {} from {} value(s)", id.index(), slots.len());

        !slots.is_empty()
    }

    /// Remove the listed tags from `value`.
    ///
    /// Returns true if at least one association was removed. The value is never deleted, even
    /// when it is left with no tags; it becomes dormant instead. Call [`remove`](Self::remove) to
    /// discard it.
    pub fn remove_tags_from_value<I>(&mut self, value: &V, tags: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let Some(slot) = self.slots.get(value).copied() else {
            return false;
        };

        let mut removed = false;
        for tag in tags {
            if let Some(id) = self.registry.get(&tag) {
                removed |= self.unlink(slot, id);
            }
        }
        removed
    }

    /// All values currently carrying `tag`, in insertion order. Empty if the tag is unknown.
    pub fn values_for_tag(&self, tag: &T) -> Vec<V> {
        self.registry
            .get(tag)
            .and_then(|id| self.holders.get(id.index()))
            .map(|holders| {
                holders
                    .ones()
                    .filter_map(|slot| self.entry(slot))
                    .map(|entry| entry.value.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All tags currently attached to `value`, in registration order. Empty if the value is
    /// unknown or dormant.
    pub fn tags_for_value(&self, value: &V) -> Vec<T> {
        self.entry_for(value)
            .map(|entry| self.registry.resolve_set(&entry.tags))
            .unwrap_or_default()
    }

    /// Returns true if `value` is present (carries at least one tag).
    #[inline]
    pub fn contains(&self, value: &V) -> bool {
        self.entry_for(value).is_some_and(Entry::is_present)
    }

    /// Returns true if `value` carries `tag`.
    pub fn has_tag(&self, value: &V, tag: &T) -> bool {
        match (self.entry_for(value), self.registry.get(tag)) {
            (Some(entry), Some(id)) => entry.tags.contains(id),
            _ => false,
        }
    }

    /// All present values in insertion order.
    pub fn values(&self) -> Vec<V> {
        self.present()
            .map(|(_, entry)| entry.value.clone())
            .collect()
    }

    /// All tags carried by at least one value, in registration order.
    pub fn tags(&self) -> Vec<T> {
        let used: tag::Set = self
            .holders
            .iter()
            .enumerate()
            .filter(|(_, holders)| !holders.is_clear())
            .map(|(id, _)| tag::Id::new(id as u32))
            .collect();
        self.registry.resolve_set(&used)
    }

    /// Remove every value. The tag registry keeps its ids.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.slots.clear();
        self.holders.clear();
        self.len = 0;
        self.vacant = 0;
    }

    /// Reclaim vacant slots, keeping present and dormant values in their relative order.
    pub fn compact(&mut self) {
        if self.vacant == 0 {
            return;
        }
        let before = self.entries.len();

        let entries: Vec<Entry<V>> = std::mem::take(&mut self.entries)
            .into_iter()
            .flatten()
            .collect();
        self.slots.clear();
        for holders in &mut self.holders {
            holders.clear();
        }

        for (index, entry) in entries.iter().enumerate() {
            self.slots.insert(entry.value.clone(), Slot(index));
            for id in entry.tags.ids() {
                set_bit(holders_for(&mut self.holders, id), index);
            }
        }
        self.entries = entries.into_iter().map(Some).collect();
        self.vacant = 0;

        debug!(
            "compacted tag index from {before} to {} slots",
            self.entries.len()
        );
    }

    /// Compact once vacant slots reach the configured threshold and outnumber occupied ones.
    fn maybe_compact(&mut self) {
        let occupied = self.entries.len() - self.vacant;
        if self.vacant >= self.config.compact_threshold && self.vacant > occupied {
            self.compact();
        }
    }

    /// Get the slot for `value`, appending a new (dormant) entry if it is unknown.
    fn slot_or_insert(&mut self, value: V) -> Slot {
        if let Some(slot) = self.slots.get(&value) {
            return *slot;
        }
        let slot = Slot(self.entries.len());
        self.slots.insert(value.clone(), slot);
        self.entries.push(Some(Entry {
            value,
            tags: tag::Set::new(),
        }));
        slot
    }

    /// Append a value that is not in this index with an existing tag set. The tag ids must come
    /// from this index's registry.
    fn insert_entry(&mut self, value: V, tags: &tag::Set) {
        let slot = self.slot_or_insert(value);
        for id in tags.ids() {
            self.link(slot, id);
        }
    }

    /// Associate a slot with a tag on both sides. Returns true if the pair is new.
    fn link(&mut self, slot: Slot, id: tag::Id) -> bool {
        let Some(Some(entry)) = self.entries.get_mut(slot.index()) else {
            return false;
        };
        let revived = !entry.is_present();
        if !entry.tags.insert(id) {
            return false;
        }
        if revived {
            self.len += 1;
        }
        set_bit(holders_for(&mut self.holders, id), slot.index());
        true
    }

    /// Dissociate a slot from a tag on both sides. Returns true if the pair existed.
    fn unlink(&mut self, slot: Slot, id: tag::Id) -> bool {
        let Some(Some(entry)) = self.entries.get_mut(slot.index()) else {
            return false;
        };
        if !entry.tags.remove(id) {
            return false;
        }
        if !entry.is_present() {
            self.len -= 1;
        }
        if let Some(holders) = self.holders.get_mut(id.index()) {
            clear_bit(holders, slot.index());
        }
        true
    }

    /// The entry at a slot, if it is occupied and present.
    #[inline]
    fn entry(&self, slot: usize) -> Option<&Entry<V>> {
        self.entries
            .get(slot)
            .and_then(Option::as_ref)
            .filter(|entry| entry.is_present())
    }

    /// The entry for a value, present or dormant.
    #[inline]
    fn entry_for(&self, value: &V) -> Option<&Entry<V>> {
        let slot = self.slots.get(value)?;
        self.entries.get(slot.index())?.as_ref()
    }

    /// Present entries with their slot index, in insertion order.
    fn present(&self) -> impl Iterator<Item = (usize, &Entry<V>)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| Some((slot, entry.as_ref()?)))
            .filter(|(_, entry)| entry.is_present())
    }
}

/// Get the holder bitset for a tag id, growing the table as needed.
fn holders_for(holders: &mut Vec<FixedBitSet>, id: tag::Id) -> &mut FixedBitSet {
    if id.index() >= holders.len() {
        holders.resize_with(id.index() + 1, FixedBitSet::new);
    }
    &mut holders[id.index()]
}

#[inline]
fn set_bit(bits: &mut FixedBitSet, index: usize) {
    bits.grow(index + 1);
    bits.insert(index);
}

#[inline]
fn clear_bit(bits: &mut FixedBitSet, index: usize) {
    if index < bits.len() {
        bits.set(index, false);
    }
}

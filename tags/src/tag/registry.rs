use std::{
    fmt,
    hash::Hash,
    sync::{
        PoisonError, RwLock,
        atomic::{AtomicU32, Ordering},
    },
};

use dashmap::DashMap;

use crate::tag::{Id, Set};

/// A thread-safe tag interner. Maps each distinct tag to a dense [`Id`] and back.
///
/// Tag→Id lookups are lock-free reads through `DashMap`. Registration only takes a single shard
/// of the map plus a write lock on the reverse table, and only the first time a tag is seen.
///
/// Ids are never recycled: a tag that no longer has any values in an index keeps its id, which
/// keeps every [`Set`] built against this registry valid.
pub struct Registry<T> {
    /// Map from tag to its id.
    ids: DashMap<T, Id>,

    /// Reverse table indexed by id.
    tags: RwLock<Vec<Option<T>>>,

    /// Next available tag identifier.
    next_id: AtomicU32,
}

impl<T: fmt::Debug> fmt::Debug for Registry<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry")
            .field("tags", &self.tags)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<T: Eq + Hash + Clone> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash + Clone> Registry<T> {
    /// Create an empty tag registry.
    #[inline]
    pub fn new() -> Self {
        Self {
            ids: DashMap::new(),
            tags: RwLock::new(Vec::new()),
            next_id: AtomicU32::new(0),
        }
    }

    /// Register a tag and get its id. Registering a known tag returns the existing id.
    pub fn register(&self, tag: &T) -> Id {
        // Fast path: already interned
        if let Some(id) = self.ids.get(tag) {
            return *id;
        }

        // Entry API so two threads missing the fast path agree on one id
        *self
            .ids
            .entry(tag.clone())
            .or_insert_with(|| {
                let id = Id::new(self.next_id.fetch_add(1, Ordering::Relaxed));

                let mut tags = self.tags.write().unwrap_or_else(PoisonError::into_inner);
                if id.index() >= tags.len() {
                    tags.resize(id.index() + 1, None);
                }
                tags[id.index()] = Some(tag.clone());

                id
            })
            .value()
    }

    /// Get the id of a tag, if it has been registered. Never registers.
    #[inline]
    pub fn get(&self, tag: &T) -> Option<Id> {
        self.ids.get(tag).map(|entry| *entry.value())
    }

    /// Get the tag for an id.
    pub fn resolve(&self, id: Id) -> Option<T> {
        let tags = self.tags.read().unwrap_or_else(PoisonError::into_inner);
        tags.get(id.index()).and_then(Clone::clone)
    }

    /// Resolve every id in the set under a single read lock, in id order.
    pub fn resolve_set(&self, set: &Set) -> Vec<T> {
        let tags = self.tags.read().unwrap_or_else(PoisonError::into_inner);
        set.ids()
            .filter_map(|id| tags.get(id.index()).and_then(Clone::clone))
            .collect()
    }

    /// Number of registered tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if no tag has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

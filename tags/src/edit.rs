//! Deferred edit buffer for tag index mutations.
//!
//! A [`TagIndex`] needs `&mut self` to change. Code that only holds a shared reference (a loop
//! iterating the index, worker threads scanning query results, ...) queues its edits in an
//! [`EditBuffer`] instead, and the owner of the index flushes them when it has exclusive access.
//!
//! # Thread Safety
//!
//! - [`EditBuffer::push`] is lock-free and can be called from multiple threads
//! - [`EditBuffer::flush`] takes `&mut TagIndex`, so it runs from the single owner
//!
//! # Example
//!
//! ```rust
//! use rusty_tags::{EditBuffer, TagIndex};
//!
//! let mut index = TagIndex::new();
//! index.add("torch", ["light", "fire"]).unwrap();
//! index.add("lantern", ["light"]).unwrap();
//!
//! let edits = EditBuffer::new();
//! for (tags, value) in &index {
//!     if tags.contains(&"fire") {
//!         edits.remove(*value);
//!     }
//! }
//! edits.flush(&mut index);
//!
//! assert_eq!(index.values(), vec!["lantern"]);
//! ```

use std::hash::Hash;

use crossbeam::queue::SegQueue;
use log::{debug, warn};

use crate::{Error, TagIndex};

/// A deferred index edit. Each variant mirrors one [`TagIndex`] mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T, V> {
    /// [`TagIndex::add`].
    Add {
        /// The value to tag.
        value: V,
        /// Tags to attach. Never empty once queued.
        tags: Vec<T>,
    },

    /// [`TagIndex::remove`].
    Remove {
        /// The value to remove.
        value: V,
    },

    /// [`TagIndex::remove_values_for_tag`].
    RemoveTag {
        /// The tag to drop from every value.
        tag: T,
    },

    /// [`TagIndex::remove_tags_from_value`].
    RemoveTagsFromValue {
        /// The value to untag.
        value: V,
        /// Tags to detach.
        tags: Vec<T>,
    },
}

/// Thread-safe edit queue using a lock-free `SegQueue`.
pub struct EditBuffer<T, V> {
    edits: SegQueue<Edit<T, V>>,
}

impl<T, V> Default for EditBuffer<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V> EditBuffer<T, V> {
    /// Create a new empty edit buffer.
    pub const fn new() -> Self {
        Self {
            edits: SegQueue::new(),
        }
    }

    /// Queue an edit.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] for an [`Edit::Add`] without tags. Nothing is queued.
    pub fn push(&self, edit: Edit<T, V>) -> Result<(), Error> {
        if let Edit::Add { tags, .. } = &edit {
            if tags.is_empty() {
                return Err(Error::EMPTY_TAGS);
            }
        }
        self.edits.push(edit);
        Ok(())
    }

    /// Queue an [`Edit::Add`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `tags` is empty.
    pub fn add(&self, value: V, tags: impl IntoIterator<Item = T>) -> Result<(), Error> {
        self.push(Edit::Add {
            value,
            tags: tags.into_iter().collect(),
        })
    }

    /// Queue an [`Edit::Remove`].
    pub fn remove(&self, value: V) {
        self.edits.push(Edit::Remove { value });
    }

    /// Queue an [`Edit::RemoveTag`].
    pub fn remove_tag(&self, tag: T) {
        self.edits.push(Edit::RemoveTag { tag });
    }

    /// Queue an [`Edit::RemoveTagsFromValue`].
    pub fn remove_tags_from_value(&self, value: V, tags: impl IntoIterator<Item = T>) {
        self.edits.push(Edit::RemoveTagsFromValue {
            value,
            tags: tags.into_iter().collect(),
        });
    }

    /// Number of queued edits.
    #[inline]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if no edit is queued.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Drain all queued edits in FIFO order. The buffer is empty afterwards.
    pub fn drain(&self) -> Vec<Edit<T, V>> {
        let mut edits = Vec::with_capacity(self.edits.len());
        while let Some(edit) = self.edits.pop() {
            edits.push(edit);
        }
        edits
    }
}

impl<T: Eq + Hash + Clone, V: Eq + Hash + Clone> EditBuffer<T, V> {
    /// Apply every queued edit to `index` in the order they were pushed.
    ///
    /// Returns the number of edits applied.
    pub fn flush(&self, index: &mut TagIndex<T, V>) -> usize {
        let edits = self.drain();
        let count = edits.len();

        for edit in edits {
            match edit {
                Edit::Add { value, tags } => {
                    if let Err(err) = index.add(value, tags) {
                        warn!("skipping queued add: {err}");
                    }
                }
                Edit::Remove { value } => {
                    index.remove(&value);
                }
                Edit::RemoveTag { tag } => {
                    index.remove_values_for_tag(&tag);
                }
                Edit::RemoveTagsFromValue { value, tags } => {
                    index.remove_tags_from_value(&value, tags);
                }
            }
        }

        debug!("flushed {count} edit(s)");
        count
    }
}

use std::{hash::Hash, iter::FusedIterator, slice};

use crate::index::{Entry, TagIndex};

/// Iterator over the `(tags, value)` pairs of an index, in insertion order.
///
/// Borrows the index, so the sequence is consistent for as long as the iterator lives. Call
/// [`TagIndex::iter`] again to restart.
pub struct Iter<'a, T, V> {
    index: &'a TagIndex<T, V>,
    entries: slice::Iter<'a, Option<Entry<V>>>,
}

impl<T: Eq + Hash + Clone, V: Eq + Hash + Clone> TagIndex<T, V> {
    /// Iterate the present values with their tags.
    pub fn iter(&self) -> Iter<'_, T, V> {
        Iter {
            index: self,
            entries: self.entries.iter(),
        }
    }
}

impl<'a, T: Eq + Hash + Clone, V: Eq + Hash + Clone> Iterator for Iter<'a, T, V> {
    type Item = (Vec<T>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .by_ref()
            .flatten()
            .find(|entry| entry.is_present())
            .map(|entry| (self.index.registry.resolve_set(&entry.tags), &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.entries.len()))
    }
}

impl<T: Eq + Hash + Clone, V: Eq + Hash + Clone> FusedIterator for Iter<'_, T, V> {}

impl<'a, T: Eq + Hash + Clone, V: Eq + Hash + Clone> IntoIterator for &'a TagIndex<T, V> {
    type Item = (Vec<T>, &'a V);
    type IntoIter = Iter<'a, T, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

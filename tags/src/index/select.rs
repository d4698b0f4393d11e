use std::hash::Hash;

use fixedbitset::FixedBitSet;
use log::debug;

use crate::index::{Query, TagIndex, Weight};

impl<T: Eq + Hash + Clone, V: Eq + Hash + Clone> TagIndex<T, V> {
    /// Narrow the index to the values matching `query`.
    ///
    /// The result is a new index holding each matching value with its complete original tag set,
    /// not just the query tags it matched. Values are inserted best first, so the sub-index's
    /// insertion order is the ranking order. The sub-index shares this index's tag registry and
    /// configuration.
    pub fn select(&self, query: &Query<'_, T>) -> TagIndex<T, V> {
        let mut selected = TagIndex::with_registry(self.config, self.registry.clone());
        for scored in self.score(query) {
            if let Some(entry) = self.entry(scored.slot) {
                selected.insert_entry(entry.value.clone(), &entry.tags);
            }
        }
        debug!("selected {} of {} values", selected.len(), self.len());
        selected
    }

    /// Sub-index of the values matching `tags` weighted by position.
    pub fn select_matches(&self, tags: &[T]) -> TagIndex<T, V> {
        self.select(&Query::positional(tags))
    }

    /// Sub-index of the values matching `tags` weighted by position, with an explicit multiplier.
    pub fn select_matches_with_multiplier(&self, tags: &[T], multiplier: Weight) -> TagIndex<T, V> {
        self.select(&Query::positional(tags).with_multiplier(multiplier))
    }

    /// Sub-index of the values matching explicit `(tag, weight)` pairs.
    pub fn select_weighted_matches(&self, pairs: &[(T, Weight)]) -> TagIndex<T, V> {
        self.select(&Query::weighted(pairs))
    }

    /// Sub-index of the values holding at least one of `tags`, ranked by match count.
    pub fn select_best_matches(&self, tags: &[T]) -> TagIndex<T, V> {
        self.select(&Query::best(tags))
    }

    /// The first value, in insertion order, that holds every tag in `tags`.
    ///
    /// Among values holding every tag, insertion order wins over weight. This can differ from the
    /// head of [`find_matches`](Self::find_matches) when the configured multiplier and decay make
    /// late query tags weigh negative: a value holding them all then scores below one holding only
    /// the leading tags.
    ///
    /// When no value holds them all, falls back to the head of
    /// [`all_sorted_by_weight`](Self::all_sorted_by_weight). Returns `None` only when the index is
    /// empty.
    pub fn first_match(&self, tags: &[T]) -> Option<V> {
        let exact = self
            .exact_matches(tags)
            .and_then(|slots| slots.ones().find_map(|slot| self.entry(slot)));
        if let Some(entry) = exact {
            return Some(entry.value.clone());
        }
        self.all_sorted_by_weight(tags).into_iter().next()
    }

    /// [`first_match`](Self::first_match), or `V::default()` when the index is empty.
    pub fn first_match_or_default(&self, tags: &[T]) -> V
    where
        V: Default,
    {
        self.first_match(tags).unwrap_or_default()
    }

    /// Slots holding every tag in `tags`. `None` when a tag is unknown. An empty tag list matches
    /// every slot.
    fn exact_matches(&self, tags: &[T]) -> Option<FixedBitSet> {
        let mut slots = FixedBitSet::with_capacity(self.entries.len());
        slots.insert_range(..);

        for tag in tags {
            let id = self.registry.get(tag)?;
            let holders = self.holders.get(id.index())?;
            slots.intersect_with(holders);
        }
        Some(slots)
    }
}

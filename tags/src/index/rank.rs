//! Ranked retrieval.
//!
//! Ranking resolves a [`Query`] into weighted tag ids, then walks the holder bitset of each query
//! tag and accumulates the tag's weight into every slot it touches. Only touched slots are
//! visited, so the cost follows the number of matches rather than the size of the index (except
//! for the full-universe listings, which append every untouched value).
//!
//! Results are ordered by descending weight with a stable sort over slots, so ties keep
//! insertion order.

use std::hash::Hash;

use fixedbitset::FixedBitSet;

use crate::index::{Query, TagIndex, Weight};

/// A slot that holds at least one query tag, with its accumulated weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Scored {
    pub(super) slot: usize,
    pub(super) weight: Weight,
}

impl<T: Eq + Hash + Clone, V: Eq + Hash + Clone> TagIndex<T, V> {
    /// Score every present value holding at least one query tag, best first.
    pub(super) fn score(&self, query: &Query<'_, T>) -> Vec<Scored> {
        let capacity = self.entries.len();
        let mut matched = FixedBitSet::with_capacity(capacity);
        let mut totals: Vec<Weight> = vec![0; capacity];

        for (id, weight) in query.resolve(&self.registry, &self.config) {
            let Some(holders) = self.holders.get(id.index()) else {
                continue;
            };
            for slot in holders.ones().filter(|slot| *slot < capacity) {
                matched.insert(slot);
                totals[slot] = totals[slot].saturating_add(weight);
            }
        }

        let mut scored: Vec<Scored> = matched
            .ones()
            .filter(|slot| self.entry(*slot).is_some())
            .map(|slot| Scored {
                slot,
                weight: totals[slot],
            })
            .collect();
        // Stable, so equal weights stay in slot order
        scored.sort_by(|a, b| b.weight.cmp(&a.weight));
        scored
    }

    /// Values matching the query, best first, with their weights.
    pub fn scores(&self, query: &Query<'_, T>) -> Vec<(V, Weight)> {
        self.score(query)
            .into_iter()
            .filter_map(|scored| {
                self.entry(scored.slot)
                    .map(|entry| (entry.value.clone(), scored.weight))
            })
            .collect()
    }

    /// Values matching the query, best first. Values holding none of the query tags are excluded.
    pub fn find(&self, query: &Query<'_, T>) -> Vec<V> {
        self.values_at(self.score(query).into_iter().map(|scored| scored.slot))
    }

    /// Values matching `tags` weighted by position, using the configured multiplier.
    ///
    /// With `tags = [a, b, c]` and the default multiplier of 2, `a` weighs 6, `b` 4 and `c` 2.
    pub fn find_matches(&self, tags: &[T]) -> Vec<V> {
        self.find(&Query::positional(tags))
    }

    /// Values matching `tags` weighted by position, with an explicit multiplier.
    pub fn find_matches_with_multiplier(&self, tags: &[T], multiplier: Weight) -> Vec<V> {
        self.find(&Query::positional(tags).with_multiplier(multiplier))
    }

    /// Values matching explicit `(tag, weight)` pairs. Repeated tags add up.
    pub fn find_weighted_matches(&self, pairs: &[(T, Weight)]) -> Vec<V> {
        self.find(&Query::weighted(pairs))
    }

    /// Values ranked by how many distinct query tags they hold.
    pub fn find_best_matches(&self, tags: &[T]) -> Vec<V> {
        self.find(&Query::best(tags))
    }

    /// Every present value: those matching the query first, best first, then the rest in
    /// insertion order. Nothing is dropped.
    pub fn all_sorted(&self, query: &Query<'_, T>) -> Vec<V> {
        let scored = self.score(query);

        let mut seen = FixedBitSet::with_capacity(self.entries.len());
        for s in &scored {
            seen.insert(s.slot);
        }
        let remainder = self
            .present()
            .map(|(slot, _)| slot)
            .filter(|slot| !seen.contains(*slot));

        self.values_at(scored.iter().map(|s| s.slot).chain(remainder))
    }

    /// [`all_sorted`](Self::all_sorted) with positional weights and the configured multiplier.
    pub fn all_sorted_by_weight(&self, tags: &[T]) -> Vec<V> {
        self.all_sorted(&Query::positional(tags))
    }

    /// [`all_sorted`](Self::all_sorted) with positional weights and an explicit multiplier.
    pub fn all_sorted_by_weight_with_multiplier(&self, tags: &[T], multiplier: Weight) -> Vec<V> {
        self.all_sorted(&Query::positional(tags).with_multiplier(multiplier))
    }

    /// [`all_sorted`](Self::all_sorted) with explicit `(tag, weight)` pairs.
    pub fn all_sorted_by_explicit_weights(&self, pairs: &[(T, Weight)]) -> Vec<V> {
        self.all_sorted(&Query::weighted(pairs))
    }

    /// [`all_sorted`](Self::all_sorted) ranked by the number of distinct query tags held.
    pub fn all_sorted_by_match_count(&self, tags: &[T]) -> Vec<V> {
        self.all_sorted(&Query::best(tags))
    }

    fn values_at(&self, slots: impl Iterator<Item = usize>) -> Vec<V> {
        slots
            .filter_map(|slot| self.entry(slot))
            .map(|entry| entry.value.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::index::{Config, Query, TagIndex};

    type Index = TagIndex<&'static str, &'static str>;

    fn xyz() -> Index {
        let mut index = Index::new();
        index.add("X", ["a"]).unwrap();
        index.add("Y", ["b"]).unwrap();
        index.add("Z", ["a", "b"]).unwrap();
        index
    }

    fn armory() -> Index {
        let mut index = Index::new();
        index.add("sword", ["weapon", "metal"]).unwrap();
        index.add("shield", ["armor", "metal"]).unwrap();
        index.add("robe", ["armor", "cloth"]).unwrap();
        index
    }

    #[test]
    fn positional_ranking() {
        // Given
        let index = xyz();

        // When
        let scores = index.scores(&Query::positional(&["a", "b", "c"]));

        // Then - a = 6, b = 4
        assert_eq!(scores, vec![("Z", 10), ("X", 6), ("Y", 4)]);
        assert_eq!(index.find_matches(&["a", "b", "c"]), vec!["Z", "X", "Y"]);
    }

    #[test]
    fn positional_multiplier_changes_spread() {
        // Given
        let index = xyz();

        // When - W = 3 * 1 = 3, so a = 3, b = 1, c = -1
        let scores = index.scores(&Query::positional(&["a", "b", "c"]).with_multiplier(1));

        // Then
        assert_eq!(scores, vec![("Z", 4), ("X", 3), ("Y", 1)]);
        assert_eq!(
            index.find_matches_with_multiplier(&["a", "b", "c"], 1),
            vec!["Z", "X", "Y"]
        );
    }

    #[test]
    fn negative_weights_still_match() {
        // Given
        let mut index = Index::new();
        index.add("late", ["e"]).unwrap();
        index.add("early", ["a"]).unwrap();

        // When - W = 5 * 1 = 5; e is fifth and weighs -3
        let query = Query::positional(&["a", "b", "c", "d", "e"]).with_multiplier(1);
        let scores = index.scores(&query);

        // Then
        assert_eq!(scores, vec![("early", 5), ("late", -3)]);
    }

    #[test]
    fn no_matches_excluded() {
        // Given
        let index = armory();

        // Then
        assert!(index.find_matches(&["wood"]).is_empty());
        assert!(index.find_matches(&[]).is_empty());
        assert_eq!(index.find_matches(&["cloth"]), vec!["robe"]);
    }

    #[test]
    fn explicit_weights_accumulate() {
        // Given
        let index = armory();

        // When
        let scores = index.scores(&Query::weighted(&[
            ("cloth", 5),
            ("metal", 3),
            ("weapon", 1),
            ("metal", 2),
        ]));

        // Then - sword: 3 + 1 + 2, robe: 5, shield: 3 + 2
        assert_eq!(scores, vec![("sword", 6), ("shield", 5), ("robe", 5)]);
        assert_eq!(
            index.find_weighted_matches(&[("armor", -1), ("weapon", 1)]),
            vec!["sword", "shield", "robe"]
        );
    }

    #[test]
    fn zero_total_is_still_a_match() {
        let index = armory();
        let scores = index.scores(&Query::weighted(&[("weapon", 2), ("metal", -2)]));
        assert_eq!(scores, vec![("sword", 0), ("shield", -2)]);
    }

    #[test]
    fn best_matches_count_tags() {
        // Given
        let index = armory();

        // When
        let scores = index.scores(&Query::best(&["metal", "armor"]));

        // Then - shield holds both, sword and robe tie in insertion order
        assert_eq!(scores, vec![("shield", 2), ("sword", 1), ("robe", 1)]);
        assert_eq!(
            index.find_best_matches(&["metal", "armor"]),
            vec!["shield", "sword", "robe"]
        );
    }

    #[test]
    fn best_matches_count_each_tag_once() {
        // Given
        let index = armory();

        // When - repeating a tag must not inflate the score
        let scores = index.scores(&Query::best(&["metal", "metal", "metal", "armor"]));

        // Then
        assert_eq!(scores, vec![("shield", 2), ("sword", 1), ("robe", 1)]);
    }

    #[test]
    fn best_matches_accumulate_beyond_first_match() {
        // Given
        let mut index = Index::new();
        index.add("one", ["a"]).unwrap();
        index.add("three", ["a", "b", "c"]).unwrap();
        index.add("two", ["b", "c"]).unwrap();

        // When
        let scores = index.scores(&Query::best(&["a", "b", "c"]));

        // Then
        assert_eq!(scores, vec![("three", 3), ("two", 2), ("one", 1)]);
    }

    #[test]
    fn all_sorted_keeps_non_matches_last() {
        // Given
        let mut index = xyz();
        index.add("W", ["w"]).unwrap();
        index.add("V", ["v"]).unwrap();

        // When
        let all = index.all_sorted_by_weight(&["b", "a"]);

        // Then - b = 4, a = 2, then the remainder in insertion order
        assert_eq!(all, vec!["Z", "Y", "X", "W", "V"]);
    }

    #[test]
    fn all_sorted_variants() {
        // Given
        let mut index = armory();
        index.add("plank", ["wood"]).unwrap();

        // Then
        assert_eq!(
            index.all_sorted_by_match_count(&["armor", "metal"]),
            vec!["shield", "sword", "robe", "plank"]
        );
        assert_eq!(
            index.all_sorted_by_explicit_weights(&[("cloth", 9)]),
            vec!["robe", "sword", "shield", "plank"]
        );
        assert_eq!(
            index.all_sorted_by_weight_with_multiplier(&["metal", "cloth"], 1),
            vec!["sword", "shield", "robe", "plank"]
        );
        assert_eq!(
            index.all_sorted_by_weight(&["nothing"]),
            vec!["sword", "shield", "robe", "plank"]
        );
    }

    #[test]
    fn all_sorted_skips_dormant_and_removed() {
        // Given
        let mut index = armory();
        index.remove(&"shield");
        index.remove_tags_from_value(&"robe", ["armor", "cloth"]);

        // Then
        assert_eq!(index.all_sorted_by_weight(&["armor"]), vec!["sword"]);
        assert!(index.find_best_matches(&["armor", "cloth"]).is_empty());
    }

    #[test]
    fn ranking_uses_config_multiplier() {
        // Given - a multiplier of 1 and decay of 3 make the second tag negative
        let mut index: Index =
            TagIndex::with_config(Config::new().with_multiplier(1).with_decay(3));
        index.add("first", ["a"]).unwrap();
        index.add("second", ["b"]).unwrap();

        // When - a = 2, b = -1
        let scores = index.scores(&Query::positional(&["a", "b"]));

        // Then
        assert_eq!(scores, vec![("first", 2), ("second", -1)]);
    }

    #[test]
    fn queries_do_not_register_tags() {
        let index = armory();
        let before = index.registry().len();
        index.find_matches(&["dragon", "bone"]);
        index.all_sorted_by_match_count(&["dragon"]);
        assert_eq!(index.registry().len(), before);
    }
}

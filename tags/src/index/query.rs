use std::hash::Hash;

use crate::{
    index::Config,
    tag::{self, Registry},
};

/// A ranking score accumulated per value from the query tags it holds.
pub type Weight = i64;

/// How a ranked query weighs its tags.
///
/// Every mode yields a weight per query tag; a value's score is the sum of the weights of the
/// query tags it holds. Values holding none of them are not scored.
///
/// ```ignore
/// // First tag weighs 3 * 2 = 6, then 4, then 2.
/// let query = Query::positional(&["a", "b", "c"]);
///
/// // Explicit weights, duplicates add up.
/// let query = Query::weighted(&[("a", 5), ("b", -1), ("a", 1)]);
///
/// // Each distinct matching tag counts once.
/// let query = Query::best(&["a", "b"]);
/// ```
#[derive(Debug)]
pub enum Query<'q, T> {
    /// Ordered tags with decaying weights. The first tag weighs `tags.len() * multiplier` and each
    /// following one [`Config::decay`] less. Weights go negative on long tag lists.
    Positional {
        /// Query tags, most important first.
        tags: &'q [T],
        /// Overrides [`Config::multiplier`] when set.
        multiplier: Option<Weight>,
    },

    /// Explicit `(tag, weight)` pairs, applied exactly as given.
    Weighted(&'q [(T, Weight)]),

    /// Every distinct tag weighs 1, so a value's score is the number of query tags it holds.
    Best(&'q [T]),
}

impl<T> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Query<'_, T> {}

impl<'q, T> Query<'q, T> {
    /// A positional query using the index's default multiplier.
    #[inline]
    pub const fn positional(tags: &'q [T]) -> Self {
        Query::Positional {
            tags,
            multiplier: None,
        }
    }

    /// A query with explicit per-tag weights.
    #[inline]
    pub const fn weighted(pairs: &'q [(T, Weight)]) -> Self {
        Query::Weighted(pairs)
    }

    /// A flat match-count query.
    #[inline]
    pub const fn best(tags: &'q [T]) -> Self {
        Query::Best(tags)
    }

    /// Override the multiplier of a positional query. Other modes are returned unchanged.
    #[inline]
    pub fn with_multiplier(self, multiplier: Weight) -> Self {
        match self {
            Query::Positional { tags, .. } => Query::Positional {
                tags,
                multiplier: Some(multiplier),
            },
            other => other,
        }
    }

    /// Returns true if the query has no tags.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        match self {
            Query::Positional { tags, .. } | Query::Best(tags) => tags.is_empty(),
            Query::Weighted(pairs) => pairs.is_empty(),
        }
    }
}

impl<T: Eq + Hash + Clone> Query<'_, T> {
    /// Resolve the query into weighted tag ids. Tags the registry has never seen are dropped; they
    /// still take up their position in a positional query.
    pub(crate) fn resolve(
        &self,
        registry: &Registry<T>,
        config: &Config,
    ) -> Vec<(tag::Id, Weight)> {
        match *self {
            Query::Positional { tags, multiplier } => {
                let multiplier = multiplier.unwrap_or(config.multiplier);
                let first = (tags.len() as Weight).saturating_mul(multiplier);
                tags.iter()
                    .enumerate()
                    .filter_map(|(position, tag)| {
                        let id = registry.get(tag)?;
                        let decay = config.decay.saturating_mul(position as Weight);
                        Some((id, first.saturating_sub(decay)))
                    })
                    .collect()
            }
            Query::Weighted(pairs) => pairs
                .iter()
                .filter_map(|(tag, weight)| registry.get(tag).map(|id| (id, *weight)))
                .collect(),
            Query::Best(tags) => {
                let mut seen = tag::Set::new();
                tags.iter()
                    .filter_map(|tag| registry.get(tag))
                    .filter(|id| seen.insert(*id))
                    .map(|id| (id, 1))
                    .collect()
            }
        }
    }
}

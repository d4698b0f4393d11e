//! Seeded item catalogs.
//!
//! Generates game-like items ("item-42") tagged from a fixed vocabulary, with a skewed
//! distribution so a few tags (materials, slots) are common and the rest are rare. The same seed
//! always produces the same catalog.

use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use rusty_tags::{Config, Error, TagIndex};

/// Tags carried by many items.
pub const COMMON_TAGS: &[&str] = &["metal", "wood", "cloth", "leather", "weapon", "armor"];

/// Tags carried by few items.
pub const RARE_TAGS: &[&str] = &[
    "fire", "frost", "shock", "holy", "cursed", "blessed", "ancient", "elven", "dwarven", "orcish",
    "heavy", "light", "two-handed", "ranged", "magic", "quest", "unique", "broken",
];

/// Configuration for catalog generation.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Number of items.
    pub item_count: usize,
    /// Minimum tags per item.
    pub min_tags: usize,
    /// Maximum tags per item (inclusive).
    pub max_tags: usize,
    /// Chance that each tag is drawn from the common vocabulary.
    pub common_ratio: f64,
    /// Random seed for reproducibility.
    pub seed: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            item_count: 10_000,
            min_tags: 1,
            max_tags: 5,
            common_ratio: 0.6,
            seed: 12345,
        }
    }
}

/// A generated catalog: item names paired with their tags.
pub struct Catalog {
    items: Vec<(String, Vec<&'static str>)>,
}

impl Catalog {
    /// Generate a catalog with the default configuration.
    pub fn new() -> Self {
        Self::with_config(CatalogConfig::default())
    }

    /// Generate a catalog with a custom configuration.
    pub fn with_config(config: CatalogConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        // Either vocabulary alone must be able to fill an item
        let max_tags = config.max_tags.clamp(1, COMMON_TAGS.len().min(RARE_TAGS.len()));
        let min_tags = config.min_tags.clamp(1, max_tags);
        let common_ratio = config.common_ratio.clamp(0.0, 1.0);

        let items = (0..config.item_count)
            .map(|i| {
                let count = rng.gen_range(min_tags..=max_tags);
                let mut tags = Vec::with_capacity(count);
                while tags.len() < count {
                    let vocabulary = if rng.gen_bool(common_ratio) {
                        COMMON_TAGS
                    } else {
                        RARE_TAGS
                    };
                    if let Some(tag) = vocabulary.choose(&mut rng) {
                        if !tags.contains(tag) {
                            tags.push(*tag);
                        }
                    }
                }
                (format!("item-{i}"), tags)
            })
            .collect();

        Self { items }
    }

    /// The generated items.
    pub fn items(&self) -> &[(String, Vec<&'static str>)] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build an index holding every item.
    pub fn index(&self) -> Result<TagIndex<&'static str, String>, Error> {
        self.index_with_config(Config::new())
    }

    /// Build an index holding every item, with a custom index configuration.
    pub fn index_with_config(
        &self,
        config: Config,
    ) -> Result<TagIndex<&'static str, String>, Error> {
        let mut index = TagIndex::with_config(config);
        for (name, tags) in &self.items {
            index.add(name.clone(), tags.iter().copied())?;
        }
        Ok(index)
    }

    /// A query of `len` tags mixing common and rare vocabulary.
    pub fn query(&self, len: usize, seed: u64) -> Vec<&'static str> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut tags: Vec<&'static str> = COMMON_TAGS.iter().chain(RARE_TAGS).copied().collect();
        tags.shuffle(&mut rng);
        tags.truncate(len);
        tags
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_reproducible() {
        let config = CatalogConfig {
            item_count: 100,
            ..Default::default()
        };
        let first = Catalog::with_config(config.clone());
        let second = Catalog::with_config(config);
        assert_eq!(first.items(), second.items());
    }

    #[test]
    fn catalog_respects_tag_bounds() {
        let catalog = Catalog::with_config(CatalogConfig {
            item_count: 200,
            min_tags: 2,
            max_tags: 3,
            ..Default::default()
        });

        assert_eq!(catalog.len(), 200);
        for (_, tags) in catalog.items() {
            assert!((2..=3).contains(&tags.len()));
        }
    }

    #[test]
    fn catalog_index_holds_every_item() {
        let catalog = Catalog::with_config(CatalogConfig {
            item_count: 500,
            ..Default::default()
        });
        let index = catalog.index().unwrap();

        assert_eq!(index.len(), 500);
        let (name, tags) = &catalog.items()[42];
        assert_eq!(index.tags_for_value(name).len(), tags.len());
    }

    #[test]
    fn query_has_requested_length() {
        let catalog = Catalog::with_config(CatalogConfig {
            item_count: 10,
            ..Default::default()
        });
        assert_eq!(catalog.query(4, 1).len(), 4);
        assert_eq!(catalog.query(4, 1), catalog.query(4, 1));
    }
}

//! Weighted multi-tag indexing.
//!
//! `rusty_tags` keeps a bidirectional many-to-many association between opaque tags and opaque
//! values, and answers ranked queries against a set of query tags.
//!
//! - [`TagIndex`]: the index itself, with insertion, removal, lookups and ranked retrieval.
//! - [`Query`]: how weights are assigned to query tags (positional decay, explicit pairs or a
//!   flat match count).
//! - [`tag::Registry`]: the shared tag interner that lets an index and its selected sub-indices
//!   agree on tag identifiers.
//! - [`EditBuffer`]: a thread-safe queue of deferred edits, flushed into an index by its owner.
//!
//! ```rust
//! use rusty_tags::TagIndex;
//!
//! let mut index = TagIndex::new();
//! index.add("sword", ["weapon", "metal"]).unwrap();
//! index.add("shield", ["armor", "metal"]).unwrap();
//! index.add("robe", ["armor", "cloth"]).unwrap();
//!
//! let best = index.find_best_matches(&["metal", "armor"]);
//! assert_eq!(best, vec!["shield", "sword", "robe"]);
//! ```

pub mod edit;
mod error;
pub mod index;
pub mod tag;

pub use edit::{Edit, EditBuffer};
pub use error::Error;
pub use index::{Config, Iter, Query, TagIndex, Weight};

//! Tag identifiers and interning.
//!
//! Tags are caller supplied keys (strings, enums, ...). The index never works with them directly
//! on its hot paths; every tag is interned once into a dense [`Id`] by a [`Registry`], and the
//! tags held by a value are tracked as a bitset of those ids in a [`Set`].
//!
//! ## Sharing
//!
//! A [`Registry`] is shared behind an `Arc` between an index and every sub-index selected from
//! it, so a [`Set`] can be copied between them without translating ids.
//!
//! ```ignore
//! use rusty_tags::tag::Registry;
//!
//! let registry = Registry::new();
//! let metal = registry.register(&"metal");
//! assert_eq!(registry.register(&"metal"), metal);
//! assert_eq!(registry.resolve(metal), Some("metal"));
//! ```

mod registry;
mod set;

pub use registry::Registry;
pub use set::Set;

/// A tag identifier. Ids are allocated densely from zero by a [`Registry`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new tag Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this tag if it were to live in indexable storage (e.g. Vec)
    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Id {
    #[inline]
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

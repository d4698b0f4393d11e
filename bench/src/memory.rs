//! Heap footprint of tag indices, measured with dhat.
//!
//! Numbers are only real when the binary installs `dhat::Alloc` as its global allocator and is
//! built with the `memory_profiling` feature (see `benches/memory.rs`):
//!
//! ```bash
//! cargo bench -p rusty_tags_bench --features memory_profiling --bench memory
//! ```
//!
//! Without the feature every measurement runs its closure and reports zeros.
//!
//! Each profiling session also writes `dhat-heap.json`, viewable at
//! <https://nnethercote.github.io/dh_view/dh_view.html>.

use std::fmt;

use rusty_tags::{Config, Error, TagIndex};

use crate::catalog::Catalog;

/// Heap counters captured over one profiling session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Heap {
    /// Bytes allocated during the session, freed or not.
    pub total_bytes: u64,
    /// Number of allocations during the session.
    pub total_blocks: u64,
    /// Largest live heap seen during the session.
    pub peak_bytes: u64,
}

/// Heap cost of an index, relative to what it holds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Footprint {
    /// Present values in the index.
    pub values: usize,
    /// Value-tag associations in the index.
    pub links: usize,
    /// Counters for the measured operation.
    pub heap: Heap,
}

impl Footprint {
    pub fn bytes_per_value(&self) -> f64 {
        per(self.heap.total_bytes, self.values)
    }

    pub fn allocations_per_value(&self) -> f64 {
        per(self.heap.total_blocks, self.values)
    }

    pub fn bytes_per_link(&self) -> f64 {
        per(self.heap.total_bytes, self.links)
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} values / {} links: {:.1} B/value, {:.1} B/link, {:.2} allocs/value, peak {} B",
            self.values,
            self.links,
            self.bytes_per_value(),
            self.bytes_per_link(),
            self.allocations_per_value(),
            self.heap.peak_bytes
        )
    }
}

fn per(total: u64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Run `f` under a dhat heap profiler. Only one session may be active at a time.
#[cfg(feature = "memory_profiling")]
pub fn profile<R>(f: impl FnOnce() -> R) -> (R, Heap) {
    let _profiler = dhat::Profiler::new_heap();
    let result = f();
    let stats = dhat::HeapStats::get();
    let heap = Heap {
        total_bytes: stats.total_bytes,
        total_blocks: stats.total_blocks,
        peak_bytes: stats.max_bytes as u64,
    };
    (result, heap)
}

/// Run `f`. Profiling is disabled, so the counters stay at zero.
#[cfg(not(feature = "memory_profiling"))]
pub fn profile<R>(f: impl FnOnce() -> R) -> (R, Heap) {
    (f(), Heap::default())
}

/// Build an index from `catalog` and measure the build.
pub fn index_footprint(
    catalog: &Catalog,
) -> Result<(TagIndex<&'static str, String>, Footprint), Error> {
    let (index, heap) = profile(|| catalog.index());
    let index = index?;
    let footprint = Footprint {
        values: index.len(),
        links: links(&index),
        heap,
    };
    Ok((index, footprint))
}

/// Build an index from `catalog` with automatic compaction off, remove every `stride`-th item,
/// then measure [`TagIndex::compact`].
pub fn compaction_footprint(
    catalog: &Catalog,
    stride: usize,
) -> Result<(TagIndex<&'static str, String>, Footprint), Error> {
    let mut index = catalog.index_with_config(Config::new().with_compact_threshold(usize::MAX))?;
    for (name, _) in catalog.items().iter().step_by(stride.max(1)) {
        index.remove(name);
    }

    let ((), heap) = profile(|| index.compact());
    let footprint = Footprint {
        values: index.len(),
        links: links(&index),
        heap,
    };
    Ok((index, footprint))
}

fn links(index: &TagIndex<&'static str, String>) -> usize {
    index.iter().map(|(tags, _)| tags.len()).sum()
}

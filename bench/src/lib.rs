//! Benchmark utilities for Rusty Tags.
//!
//! This crate provides benchmarking infrastructure for the tag index:
//!
//! - **Microbenchmarks**: Individual index operations (add, remove, lookups)
//! - **Ranking benchmarks**: Ranked queries, full-universe listings and selection over a
//!   generated item catalog
//! - **Memory footprint**: Heap cost per value of index builds and compaction, via dhat
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p rusty_tags_bench
//!
//! # Run specific benchmark group
//! cargo bench -p rusty_tags_bench -- rank
//!
//! # Footprint report with real heap counters (slower)
//! cargo bench -p rusty_tags_bench --features memory_profiling --bench memory
//! ```
//!
//! # Benchmark Results
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.
//! Memory profiling results are written to `dhat-heap.json` for viewing with
//! DHAT's viewer.

pub mod catalog;
pub mod memory;

//! Ranked query benchmarks using Criterion.
//!
//! These benchmarks measure ranking over a generated item catalog:
//! - Ranked matches for each weighting mode
//! - Full-universe listings
//! - Sub-index selection
//! - First match lookups

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rusty_tags::{Query, TagIndex, Weight};
use rusty_tags_bench::catalog::{Catalog, CatalogConfig};

fn make_index(count: usize) -> (Catalog, TagIndex<&'static str, String>) {
    let catalog = Catalog::with_config(CatalogConfig {
        item_count: count,
        ..Default::default()
    });
    let index = catalog.index().expect("catalog items carry tags");
    (catalog, index)
}

// =============================================================================
// Ranked Match Benchmarks
// =============================================================================

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");

    for count in [1_000, 10_000, 50_000] {
        let (catalog, index) = make_index(count);
        let tags = catalog.query(4, 7);
        let pairs: Vec<(&'static str, Weight)> =
            tags.iter().zip([5, 3, -1, 2]).map(|(tag, w)| (*tag, w)).collect();

        group.bench_with_input(BenchmarkId::new("positional", count), &index, |b, index| {
            b.iter(|| black_box(index.find_matches(&tags)));
        });

        group.bench_with_input(BenchmarkId::new("weighted", count), &index, |b, index| {
            b.iter(|| black_box(index.find_weighted_matches(&pairs)));
        });

        group.bench_with_input(BenchmarkId::new("best", count), &index, |b, index| {
            b.iter(|| black_box(index.find_best_matches(&tags)));
        });
    }

    group.finish();
}

// Query length drives the number of holder bitsets walked
fn bench_query_length(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank/query_length");
    let (catalog, index) = make_index(10_000);

    for len in [1, 4, 12, 24] {
        let tags = catalog.query(len, 11);
        group.bench_with_input(BenchmarkId::new("positional", len), &tags, |b, tags| {
            b.iter(|| black_box(index.scores(&Query::positional(tags))));
        });
    }

    group.finish();
}

// =============================================================================
// Listing and Selection Benchmarks
// =============================================================================

fn bench_all_sorted(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_sorted");

    for count in [1_000, 10_000] {
        let (catalog, index) = make_index(count);
        let tags = catalog.query(3, 5);

        group.bench_with_input(BenchmarkId::new("by_weight", count), &index, |b, index| {
            b.iter(|| black_box(index.all_sorted_by_weight(&tags)));
        });

        group.bench_with_input(BenchmarkId::new("by_match_count", count), &index, |b, index| {
            b.iter(|| black_box(index.all_sorted_by_match_count(&tags)));
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("select");

    for count in [1_000, 10_000] {
        let (catalog, index) = make_index(count);
        let tags = catalog.query(2, 3);

        group.bench_with_input(BenchmarkId::new("matches", count), &index, |b, index| {
            b.iter(|| black_box(index.select_matches(&tags)));
        });

        // Narrow, then query the sub-index
        group.bench_with_input(BenchmarkId::new("narrow_then_rank", count), &index, |b, index| {
            b.iter(|| {
                let narrowed = index.select_best_matches(&tags[..1]);
                black_box(narrowed.find_matches(&tags))
            });
        });

        group.bench_with_input(BenchmarkId::new("first_match", count), &index, |b, index| {
            b.iter(|| black_box(index.first_match(&tags)));
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_rank,
    bench_query_length,
    bench_all_sorted,
    bench_select,
);

criterion_main!(benches);

//! Benchmark for the tree containers vs standard BTreeSet/BTreeMap.
//!
//! Compares insert, lookup, bound queries, erase and iteration for
//! rbtree's Set/Map against the standard library's B-tree collections.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rbtree::collections::{Map, MultiSet, Set};
use std::collections::{BTreeMap, BTreeSet};

/// Deterministic key shuffle so inserts do not arrive sorted.
fn scrambled(size: u64) -> Vec<u64> {
    (0..size)
        .map(|index| index.wrapping_mul(0x9E37_79B9_7F4A_7C15) % (size * 4))
        .collect()
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in [100, 1000, 10000] {
        let keys = scrambled(size);

        group.bench_with_input(BenchmarkId::new("Set", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut set = Set::new();
                for key in keys {
                    set.insert(black_box(*key));
                }
                black_box(set)
            });
        });

        group.bench_with_input(BenchmarkId::new("MultiSet", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut set = MultiSet::new();
                for key in keys {
                    set.insert(black_box(*key));
                }
                black_box(set)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                let mut set = BTreeSet::new();
                for key in keys {
                    set.insert(black_box(*key));
                }
                black_box(set)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in [100, 1000, 10000] {
        let keys = scrambled(size);
        let map: Map<u64, u64> = keys.iter().map(|key| (*key, key * 2)).collect();
        let standard: BTreeMap<u64, u64> = keys.iter().map(|key| (*key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("Map", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                for key in keys {
                    black_box(map.get(black_box(key)));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &keys, |bencher, keys| {
            bencher.iter(|| {
                for key in keys {
                    black_box(standard.get(black_box(key)));
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// lower_bound Benchmark
// =============================================================================

fn benchmark_lower_bound(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("lower_bound");

    for size in [1000, 10000] {
        let keys = scrambled(size);
        let set: Set<u64> = keys.iter().copied().collect();
        let standard: BTreeSet<u64> = keys.iter().copied().collect();
        let probes: Vec<u64> = (0..size).map(|index| index * 3 + 1).collect();

        group.bench_with_input(BenchmarkId::new("Set", size), &probes, |bencher, probes| {
            bencher.iter(|| {
                for probe in probes {
                    black_box(set.key(set.lower_bound(black_box(probe))));
                }
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &probes, |bencher, probes| {
            bencher.iter(|| {
                for probe in probes {
                    black_box(standard.range(black_box(*probe)..).next());
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// erase Benchmark
// =============================================================================

fn benchmark_erase(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("erase");

    for size in [1000, 10000] {
        let keys = scrambled(size);
        let set: Set<u64> = keys.iter().copied().collect();
        let standard: BTreeSet<u64> = keys.iter().copied().collect();

        group.bench_with_input(BenchmarkId::new("Set", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || set.clone(),
                |mut set| {
                    for key in keys {
                        set.erase(black_box(key));
                    }
                    set
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("BTreeSet", size), &keys, |bencher, keys| {
            bencher.iter_batched(
                || standard.clone(),
                |mut set| {
                    for key in keys {
                        set.remove(black_box(key));
                    }
                    set
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in [1000, 10000] {
        let keys = scrambled(size);
        let set: Set<u64> = keys.iter().copied().collect();
        let standard: BTreeSet<u64> = keys.iter().copied().collect();

        group.bench_function(BenchmarkId::new("Set", size), |bencher| {
            bencher.iter(|| black_box(set.iter().sum::<u64>()));
        });

        group.bench_function(BenchmarkId::new("Set positions", size), |bencher| {
            bencher.iter(|| {
                let mut position = set.begin();
                let mut total = 0u64;
                while position != set.end() {
                    total += set.key(position).copied().unwrap_or_default();
                    position = set.next(position);
                }
                black_box(total)
            });
        });

        group.bench_function(BenchmarkId::new("BTreeSet", size), |bencher| {
            bencher.iter(|| black_box(standard.iter().sum::<u64>()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_lower_bound,
    benchmark_erase,
    benchmark_iteration
);
criterion_main!(benches);

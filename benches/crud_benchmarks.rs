use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap as StdBTreeMap;

use keyspan::{BTreeMap, Key, OrderedMap, RbTreeMap, SkipListMap};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<Key> {
    (0..n as i32).collect()
}

fn random_keys(n: usize) -> Vec<Key> {
    // Simple LCG for a deterministic pseudo-random sequence.
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i32);
    }
    keys
}

fn filled<M: OrderedMap>(mut map: M, keys: &[Key]) -> M {
    for &k in keys {
        map.insert(k, k).unwrap();
    }
    map
}

// ─── Insert benchmarks ──────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[Key]) {
    let mut group = c.benchmark_group(name);

    group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
        b.iter(|| filled(RbTreeMap::new(), keys));
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| filled(BTreeMap::new(), keys));
    });

    group.bench_function(BenchmarkId::new("SkipListMap", N), |b| {
        b.iter(|| filled(SkipListMap::with_seed(0.5, 42), keys));
    });

    group.bench_function(BenchmarkId::new("std::BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = StdBTreeMap::new();
            for &k in keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "insert_ordered", &ordered_keys(N));
}

fn bench_insert_random(c: &mut Criterion) {
    bench_insert(c, "insert_random", &random_keys(N));
}

// ─── Lookup benchmark ───────────────────────────────────────────────────────

fn bench_lookup_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb = filled(RbTreeMap::new(), &keys);
    let bt = filled(BTreeMap::new(), &keys);
    let sl = filled(SkipListMap::with_seed(0.5, 42), &keys);

    let mut group = c.benchmark_group("lookup_random");

    group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
        b.iter(|| keys.iter().filter(|&&k| rb.get(k).is_some()).count());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| keys.iter().filter(|&&k| bt.get(k).is_some()).count());
    });

    group.bench_function(BenchmarkId::new("SkipListMap", N), |b| {
        b.iter(|| keys.iter().filter(|&&k| sl.get(k).is_some()).count());
    });

    group.finish();
}

// ─── Range benchmark ────────────────────────────────────────────────────────

fn bench_range(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let rb = filled(RbTreeMap::new(), &keys);
    let bt = filled(BTreeMap::new(), &keys);
    let sl = filled(SkipListMap::with_seed(0.5, 42), &keys);

    let mut group = c.benchmark_group("range_tenth");
    let (lo, hi) = (0, (N / 10) as i32);

    group.bench_function(BenchmarkId::new("RbTreeMap", N), |b| {
        let mut out = vec![0; N / 10 + 1];
        b.iter(|| rb.range(lo, hi, &mut out));
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        let mut out = vec![0; N / 10 + 1];
        b.iter(|| bt.range(lo, hi, &mut out));
    });

    group.bench_function(BenchmarkId::new("SkipListMap", N), |b| {
        let mut out = vec![0; N / 10 + 1];
        b.iter(|| sl.range(lo, hi, &mut out));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_insert_ordered,
    bench_insert_random,
    bench_lookup_random,
    bench_range
);
criterion_main!(benches);

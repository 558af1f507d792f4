//! Criterion benchmarks for range reductions and the result codec.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use num_bigint::BigInt;
use num_rational::BigRational;

use psum_core::arith::{range_product, range_sum};
use psum_core::codec::{decode, encode};
use psum_core::constants::DEFAULT_MAX_MESSAGE_BYTES;
use psum_core::verify::product_tree;

fn bench_reductions(c: &mut Criterion) {
    let ns: Vec<u64> = vec![1_000, 10_000, 100_000];

    let mut group = c.benchmark_group("RangeSum");
    for &n in &ns {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| range_sum(1, n));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("RangeProduct");
    for &n in &ns[..2] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| range_product(1, n));
        });
    }
    group.finish();

    let mut group = c.benchmark_group("ProductTree");
    for &n in &ns[..2] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| product_tree(1, n));
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("Codec");
    for &n in &[1_000u64, 10_000] {
        let value = BigRational::from_integer(BigInt::from(range_product(1, n)));
        let bytes = encode(&value, DEFAULT_MAX_MESSAGE_BYTES).unwrap();
        group.bench_with_input(BenchmarkId::new("encode", n), &value, |b, v| {
            b.iter(|| encode(v, DEFAULT_MAX_MESSAGE_BYTES).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &bytes, |b, bytes| {
            b.iter(|| decode(bytes, DEFAULT_MAX_MESSAGE_BYTES).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reductions, bench_codec);
criterion_main!(benches);

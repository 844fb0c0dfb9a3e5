//! Criterion micro-benchmarks for snapshot construction and the tensor codec.

use criterion::{criterion_group, criterion_main, Criterion};
use midway_bench::crowded_park;
use midway_core::{CodecConfig, ObsLayout, ViewContext};
use midway_obs::{wire, TensorCodec};
use midway_snapshot::DomainSnapshot;

/// Benchmark: Build a detailed snapshot from raw JSON text.
fn bench_snapshot_from_json(c: &mut Criterion) {
    let config = CodecConfig::default();
    let text = crowded_park(8).to_string();

    c.bench_function("snapshot_from_json", |b| {
        b.iter(|| {
            let snap = DomainSnapshot::from_json_str(&text, ViewContext::DETAILED, &config).unwrap();
            std::hint::black_box(&snap);
        });
    });
}

/// Benchmark: Encode a crowded park with the full layout.
fn bench_encode_full(c: &mut Criterion) {
    let config = CodecConfig::default();
    let snap = DomainSnapshot::from_value(crowded_park(8), ViewContext::ORACLE, &config).unwrap();
    let codec = TensorCodec::new(config).unwrap();

    c.bench_function("encode_full", |b| {
        b.iter(|| {
            let bundle = codec.encode(&snap).unwrap();
            std::hint::black_box(&bundle);
        });
    });
}

/// Benchmark: Encode the same park with the compact layout.
fn bench_encode_compact(c: &mut Criterion) {
    let config = CodecConfig {
        layout: ObsLayout::Compact,
        ..CodecConfig::default()
    };
    let snap = DomainSnapshot::from_value(crowded_park(8), ViewContext::ORACLE, &config).unwrap();
    let codec = TensorCodec::new(config).unwrap();

    c.bench_function("encode_compact", |b| {
        b.iter(|| {
            let bundle = codec.encode(&snap).unwrap();
            std::hint::black_box(&bundle);
        });
    });
}

/// Benchmark: Decode a full bundle back into a snapshot.
fn bench_decode_full(c: &mut Criterion) {
    let config = CodecConfig::default();
    let snap = DomainSnapshot::from_value(crowded_park(8), ViewContext::ORACLE, &config).unwrap();
    let codec = TensorCodec::new(config).unwrap();
    let bundle = codec.encode(&snap).unwrap();

    c.bench_function("decode_full", |b| {
        b.iter(|| {
            let decoded = codec.decode(&bundle, ViewContext::ORACLE).unwrap();
            std::hint::black_box(&decoded);
        });
    });
}

/// Benchmark: Serialize and deserialize a full bundle.
fn bench_wire_round_trip(c: &mut Criterion) {
    let config = CodecConfig::default();
    let snap = DomainSnapshot::from_value(crowded_park(8), ViewContext::ORACLE, &config).unwrap();
    let bundle = TensorCodec::new(config).unwrap().encode(&snap).unwrap();

    c.bench_function("wire_round_trip", |b| {
        b.iter(|| {
            let bytes = wire::serialize(&bundle).unwrap();
            let back = wire::deserialize(&bytes).unwrap();
            std::hint::black_box(&back);
        });
    });
}

criterion_group!(
    benches,
    bench_snapshot_from_json,
    bench_encode_full,
    bench_encode_compact,
    bench_decode_full,
    bench_wire_round_trip
);
criterion_main!(benches);

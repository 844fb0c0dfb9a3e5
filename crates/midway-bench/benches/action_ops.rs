//! Criterion micro-benchmarks for the action codec.

use criterion::{criterion_group, criterion_main, Criterion};
use midway_action::{Action, ActionSpace, CompactActionSpace};
use midway_bench::{crowded_park, ACTION_TEXTS};
use midway_core::{CodecConfig, ViewContext};
use midway_snapshot::DomainSnapshot;

/// Benchmark: Parse and validate every sample action.
fn bench_decode_text(c: &mut Criterion) {
    c.bench_function("action_decode_text", |b| {
        b.iter(|| {
            for text in ACTION_TEXTS {
                let action = Action::decode(text).unwrap();
                std::hint::black_box(&action);
            }
        });
    });
}

/// Benchmark: Text → vector → text for every sample action.
fn bench_vector_round_trip(c: &mut Criterion) {
    let space = ActionSpace::new(&CodecConfig::default()).unwrap();

    c.bench_function("action_vector_round_trip", |b| {
        b.iter(|| {
            for text in ACTION_TEXTS {
                let v = space.from_text(text).unwrap();
                let back = space.to_text(&v).unwrap();
                std::hint::black_box(&back);
            }
        });
    });
}

/// Benchmark: Complete compact placements against a crowded park.
fn bench_compact_placement(c: &mut Criterion) {
    let config = CodecConfig::default();
    let snap = DomainSnapshot::from_value(crowded_park(8), ViewContext::DETAILED, &config).unwrap();
    let space = CompactActionSpace::new(&config).unwrap();
    let place_ride = [0, 0, 2, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    let place_shop = [0, 1, 4, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

    c.bench_function("compact_placement", |b| {
        b.iter(|| {
            let ride = space.decode(&place_ride, &snap).unwrap();
            let shop = space.decode(&place_shop, &snap).unwrap();
            std::hint::black_box((&ride, &shop));
        });
    });
}

criterion_group!(
    benches,
    bench_decode_text,
    bench_vector_round_trip,
    bench_compact_placement
);
criterion_main!(benches);

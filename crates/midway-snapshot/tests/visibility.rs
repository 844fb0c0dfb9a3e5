//! Visibility filtering: absent markers, monotonicity, narrowing.

use midway_core::{
    CodecConfig, ConfigError, Field, Granularity, Observability, Record, ViewContext,
};
use midway_snapshot::DomainSnapshot;
use midway_test_utils::{complex_park, RawSnapshotBuilder};
use proptest::prelude::*;

const SUMMARY_ORACLE: ViewContext = ViewContext::new(Granularity::Summary, Observability::Oracle);

fn build(raw: serde_json::Value, ctx: ViewContext) -> DomainSnapshot {
    DomainSnapshot::from_value(raw, ctx, &CodecConfig::default()).unwrap()
}

fn is_subset(a: &[String], b: &[String]) -> bool {
    a.iter().all(|f| b.contains(f))
}

#[test]
fn summary_hides_itemized_data() {
    let s = build(complex_park(), ViewContext::SUMMARY);
    assert!(s.rides.ride_list.is_absent());
    assert!(s.shops.shop_list.is_absent());
    assert!(s.staff.staff_list.is_absent());
    assert!(s.paths.is_absent());
    assert!(s.waters.is_absent());
    assert!(s.research_operating_cost.is_absent());
    assert!(s.fast_days_since_last_new_entity.is_absent());
    assert!(s.guests.avg_happiness.is_absent());
    // Aggregates stay.
    assert_eq!(s.rides.total_rides, 1);
    assert_eq!(s.staff.janitors, [1, 1, 0, 0]);
}

#[test]
fn oracle_fields_need_oracle_context() {
    let detailed = build(complex_park(), ViewContext::DETAILED);
    assert!(detailed.rides.ride_list.is_present());
    assert!(detailed.guests.avg_hunger.is_absent());

    let oracle = build(complex_park(), SUMMARY_ORACLE);
    assert_eq!(oracle.guests.avg_hunger, Field::Present(1.0));
    assert!(oracle.rides.ride_list.is_absent());
}

#[test]
fn zero_is_not_absent() {
    let s = build(complex_park(), ViewContext::DETAILED);
    assert_eq!(s.research_operating_cost, Field::Present(0));
}

#[test]
fn present_fields_grow_with_context() {
    let summary = build(complex_park(), ViewContext::SUMMARY).present_fields();
    let detailed = build(complex_park(), ViewContext::DETAILED).present_fields();
    let oracle = build(complex_park(), ViewContext::ORACLE).present_fields();

    assert!(is_subset(&summary, &detailed));
    assert!(is_subset(&detailed, &oracle));
    assert!(!summary.contains(&"rides.ride_list".to_string()));
    assert!(detailed.contains(&"rides.ride_list".to_string()));
    assert!(oracle.contains(&"guests.avg_thirst".to_string()));
    assert!(!detailed.contains(&"guests.avg_thirst".to_string()));
}

#[test]
fn narrowing_matches_direct_construction() {
    let full = build(complex_park(), ViewContext::ORACLE);
    for ctx in [ViewContext::SUMMARY, ViewContext::DETAILED, SUMMARY_ORACLE, ViewContext::ORACLE] {
        assert_eq!(full.narrow(ctx).unwrap(), build(complex_park(), ctx), "{ctx}");
    }
}

#[test]
fn widening_is_rejected() {
    let summary = build(complex_park(), ViewContext::SUMMARY);
    assert_eq!(
        summary.narrow(ViewContext::DETAILED),
        Err(ConfigError::ContextWidening {
            from: ViewContext::SUMMARY,
            to: ViewContext::DETAILED
        })
    );
    let detailed = build(complex_park(), ViewContext::DETAILED);
    assert!(detailed.narrow(SUMMARY_ORACLE).is_err());
}

fn arb_park() -> impl Strategy<Value = serde_json::Value> {
    (
        prop::collection::btree_set((1i64..19, 1i64..19), 0..8),
        prop::collection::vec((0usize..3, 0usize..4, 0i64..20, 0i64..20), 0..6),
        0i64..100_000,
    )
        .prop_map(|(cells, staff, money)| {
            let rides = ["carousel", "ferris_wheel", "roller_coaster"];
            let shops = ["drink", "food", "specialty"];
            let roles = ["janitor", "mechanic", "specialist"];
            let colors = ["yellow", "blue", "green", "red"];
            let mut b = RawSnapshotBuilder::new().money(money);
            for (i, (x, y)) in cells.into_iter().enumerate() {
                b = match i % 3 {
                    0 => b.ride(rides[i % 3], colors[i % 4], x, y),
                    1 => b.shop(shops[i % 3], colors[i % 4], x, y),
                    _ => b.path(x, y, 0.5),
                };
            }
            for (r, c, x, y) in staff {
                b = b.staff(roles[r], colors[c], x, y);
            }
            b.build()
        })
}

proptest! {
    #[test]
    fn visibility_is_monotonic(raw in arb_park()) {
        let summary = build(raw.clone(), ViewContext::SUMMARY).present_fields();
        let detailed = build(raw.clone(), ViewContext::DETAILED).present_fields();
        let oracle = build(raw.clone(), ViewContext::ORACLE).present_fields();
        prop_assert!(is_subset(&summary, &detailed));
        prop_assert!(is_subset(&detailed, &oracle));
    }

    #[test]
    fn narrowing_is_exact(raw in arb_park()) {
        let full = build(raw.clone(), ViewContext::ORACLE);
        prop_assert_eq!(full.narrow(ViewContext::SUMMARY).unwrap(), build(raw, ViewContext::SUMMARY));
    }
}

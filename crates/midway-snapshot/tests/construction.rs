//! Raw snapshot → DomainSnapshot construction against canned parks.

use midway_core::{
    CodecConfig, Color, ContractViolation, Field, ResearchSpeed, RideKind, ShopKind, StaffRole,
    Subtype, ViewContext,
};
use midway_snapshot::{Coord, DomainSnapshot};
use midway_test_utils::{complex_park, empty_park, RawSnapshotBuilder};

// ── Helpers ─────────────────────────────────────────────────────

fn build(raw: serde_json::Value, ctx: ViewContext) -> Result<DomainSnapshot, ContractViolation> {
    DomainSnapshot::from_value(raw, ctx, &CodecConfig::default())
}

// ── Aggregates ──────────────────────────────────────────────────

#[test]
fn complex_park_aggregates() {
    let s = build(complex_park(), ViewContext::ORACLE).unwrap();

    assert_eq!(s.park_id.as_deref(), Some("17"));
    assert_eq!(s.step, 17);
    assert_eq!(s.horizon, 50);
    assert_eq!(s.money, 2041);
    assert_eq!(s.profit, 466 - 161);
    assert_eq!(s.park_rating, 57.25);

    assert_eq!(s.rides.total_rides, 1);
    assert_eq!(s.rides.min_uptime, 10.0);
    assert_eq!(s.rides.total_operating_cost, 193);
    assert_eq!(s.rides.total_revenue_generated, 700);
    assert_eq!(s.rides.total_excitement, 1.0);
    assert_eq!(s.rides.avg_intensity, 1.0);
    assert_eq!(s.rides.total_capacity, 6);

    assert_eq!(s.shops.total_shops, 2);
    assert_eq!(s.shops.total_revenue_generated, 735 + 1374);
    assert_eq!(s.shops.total_operating_cost, 60);
    assert_eq!(s.shops.min_uptime, 0.01);

    assert_eq!(s.staff.janitors, [1, 1, 0, 0]);
    assert_eq!(s.staff.mechanics, [0, 0, 1, 0]);
    assert_eq!(s.staff.specialists, [0, 0, 0, 0]);
    assert_eq!(s.staff.total_salary_paid, 80);
    assert_eq!(s.staff.total_operating_cost, 3);

    assert_eq!(s.guests.total_guests, 31);
    assert_eq!(s.guests.avg_time_in_park, 71.55);
    assert_eq!(s.guests.avg_happiness, Field::Present(0.51));

    assert_eq!(s.survey.age_of_results, 7);
    assert!(s.survey.results.is_empty());

    assert_eq!(s.research_speed, ResearchSpeed::None);
    assert_eq!(s.research_topics.len(), 9);
    assert!(s.available_entities.contains(Subtype::Specialty, Color::Yellow));
    assert!(!s.available_entities.contains(Subtype::Specialty, Color::Red));

    assert_eq!(s.entrance, Coord::new(0, 0));
    assert_eq!(s.exit, Coord::new(19, 19));
    assert_eq!(s.path_list().len(), 59);
    assert_eq!(s.min_cleanliness, 0.96);
}

#[test]
fn itemized_lists_are_canonical() {
    let s = build(complex_park(), ViewContext::DETAILED).unwrap();

    let ride = &s.ride_list()[0];
    assert_eq!(ride.subtype, RideKind::Carousel);
    assert_eq!(ride.position, Coord::new(1, 2));
    assert_eq!(ride.breakdown_rate, 0.001);

    let shops: Vec<_> = s.shop_list().iter().map(|s| (s.subtype, s.position)).collect();
    assert_eq!(
        shops,
        [
            (ShopKind::Specialty, Coord::new(3, 3)),
            (ShopKind::Food, Coord::new(3, 4)),
        ]
    );
    assert!(s.shop_list().iter().all(|s| s.number_of_restocks == 0));

    let staff: Vec<_> = s
        .staff_list()
        .iter()
        .map(|e| (e.role, e.subclass, e.position))
        .collect();
    assert_eq!(
        staff,
        [
            (StaffRole::Janitor, Color::Yellow, Coord::new(1, 2)),
            (StaffRole::Janitor, Color::Blue, Coord::new(2, 2)),
            (StaffRole::Mechanic, Color::Green, Coord::new(10, 11)),
        ]
    );

    let paths = s.path_list();
    assert!(paths.windows(2).all(|w| w[0].position < w[1].position));
}

#[test]
fn empty_park_defaults() {
    let s = build(empty_park(), ViewContext::ORACLE).unwrap();
    assert_eq!(s.rides.min_uptime, 1.0);
    assert_eq!(s.shops.min_uptime, 1.0);
    assert_eq!(s.min_cleanliness, 1.0);
    assert_eq!(s.rides.avg_intensity, 0.0);
    assert_eq!(s.rides.ride_list, Field::Present(vec![]));
}

#[test]
fn input_order_does_not_matter() {
    let a = RawSnapshotBuilder::new()
        .ride("carousel", "red", 5, 5)
        .ride("roller_coaster", "blue", 2, 9)
        .staff("mechanic", "yellow", 4, 4)
        .staff("janitor", "green", 9, 1)
        .path(3, 3, 0.5)
        .path(1, 1, 0.75)
        .build();
    let b = RawSnapshotBuilder::new()
        .ride("roller_coaster", "blue", 2, 9)
        .ride("carousel", "red", 5, 5)
        .staff("janitor", "green", 9, 1)
        .staff("mechanic", "yellow", 4, 4)
        .path(1, 1, 0.75)
        .path(3, 3, 0.5)
        .build();
    assert_eq!(
        build(a, ViewContext::ORACLE).unwrap(),
        build(b, ViewContext::ORACLE).unwrap()
    );
}

#[test]
fn min_cleanliness_covers_paths() {
    let raw = RawSnapshotBuilder::new()
        .ride("carousel", "yellow", 5, 5)
        .path(1, 1, 0.424)
        .build();
    let s = build(raw, ViewContext::SUMMARY).unwrap();
    assert_eq!(s.min_cleanliness, 0.42);
    // Paths are hidden at summary, but still count toward the minimum.
    assert!(s.paths.is_absent());
}

#[test]
fn survey_ids_resolve_to_descriptions() {
    let raw = RawSnapshotBuilder::new().survey_result(1, 7).build();
    let s = build(raw, ViewContext::SUMMARY).unwrap();
    let r = &s.survey.results[0];
    assert_eq!(r.reason_for_exit, "Day ended");
    assert_eq!(r.preference, "carousel enthusiast");
    assert_eq!(r.remaining_money, 33.25);
}

#[test]
fn unknown_research_entries_are_tolerated() {
    let raw = RawSnapshotBuilder::new()
        .research("warp", &["carousel", "time_machine"])
        .available("dragon", &["yellow"])
        .build();
    let s = build(raw, ViewContext::SUMMARY).unwrap();
    assert_eq!(s.research_speed, ResearchSpeed::None);
    assert_eq!(s.research_topics.iter().collect::<Vec<_>>(), [Subtype::Carousel]);
}

// ── Contract violations ─────────────────────────────────────────

#[test]
fn missing_required_key_fails() {
    let raw = RawSnapshotBuilder::new().without("state.money").build();
    let err = build(raw, ViewContext::SUMMARY).unwrap_err();
    match err {
        ContractViolation::MalformedSnapshot { detail } => assert!(detail.contains("money")),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn missing_guest_stats_fails() {
    let raw = RawSnapshotBuilder::new().without("guestStats").build();
    assert!(matches!(
        build(raw, ViewContext::SUMMARY),
        Err(ContractViolation::MalformedSnapshot { .. })
    ));
}

#[test]
fn unknown_survey_id_fails() {
    let raw = RawSnapshotBuilder::new().survey_result(99, 0).build();
    assert_eq!(
        build(raw, ViewContext::SUMMARY).unwrap_err(),
        ContractViolation::UnknownValue {
            field: "reason_for_exit_id",
            value: "99".into()
        }
    );
}

#[test]
fn out_of_park_coordinates_fail() {
    let raw = RawSnapshotBuilder::new().ride("carousel", "yellow", 20, 3).build();
    assert!(matches!(
        build(raw, ViewContext::SUMMARY),
        Err(ContractViolation::OutOfBounds { what: "ride", x: 20, y: 3, size: 20 })
    ));
}

#[test]
fn json_text_entry_point() {
    let text = complex_park().to_string();
    let s = DomainSnapshot::from_json_str(&text, ViewContext::SUMMARY, &CodecConfig::default())
        .unwrap();
    assert_eq!(s.money, 2041);
    assert!(matches!(
        DomainSnapshot::from_json_str("{", ViewContext::SUMMARY, &CodecConfig::default()),
        Err(ContractViolation::MalformedSnapshot { .. })
    ));
}

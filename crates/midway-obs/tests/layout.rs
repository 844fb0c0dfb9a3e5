//! Full-layout placement, truncation and decode failure cases.

use midway_core::{CodecConfig, ContractViolation, ObsError, StaffRole, ViewContext};
use midway_obs::{names, Channel, Measure, Tensor, TensorBundle, TensorCodec};
use midway_snapshot::{Coord, DomainSnapshot};
use midway_test_utils::{complex_park, RawSnapshotBuilder};

fn build(raw: serde_json::Value, ctx: ViewContext) -> DomainSnapshot {
    DomainSnapshot::from_value(raw, ctx, &CodecConfig::default()).unwrap()
}

fn codec() -> TensorCodec {
    TensorCodec::new(CodecConfig::default()).unwrap()
}

#[test]
fn carousel_lands_on_its_cell() {
    let raw = RawSnapshotBuilder::new()
        .money(5000)
        .step(7)
        .ride_with("carousel", "yellow", 1, 2, |r| {
            r.insert("ticket_price".into(), 2.into());
        })
        .build();
    let codec = codec();
    let bundle = codec.encode(&build(raw, ViewContext::DETAILED)).unwrap();

    let grid = bundle.get(names::GRID).unwrap();
    assert_eq!(grid.get(&[1, 2, Channel::IsCarousel.index()]), 1.0);
    assert_eq!(grid.get(&[1, 2, Channel::IsYellow.index()]), 1.0);
    assert_eq!(
        grid.get(&[1, 2, Channel::Price.index()]),
        codec.norms().normalize(Measure::Price, 2.0).unwrap()
    );
    assert_eq!(grid.get(&[2, 1, Channel::IsCarousel.index()]), 0.0);

    let back = codec.decode(&bundle, ViewContext::DETAILED).unwrap();
    assert_eq!(back.money, 5000);
    assert_eq!(back.step, 7);
    assert_eq!(back.ride_list()[0].position, Coord::new(1, 2));
    assert_eq!(back.ride_list()[0].ticket_price, 2);
}

#[test]
fn each_cell_holds_at_most_one_category() {
    let bundle = codec()
        .encode(&build(complex_park(), ViewContext::ORACLE))
        .unwrap();
    let grid = bundle.get(names::GRID).unwrap();
    for x in 0..20 {
        for y in 0..20 {
            let cell = grid.row(&[x, y]);
            let set = Channel::CATEGORIES
                .iter()
                .filter(|c| cell[c.index()] == 1.0)
                .count();
            assert!(set <= 1, "cell ({x}, {y}) has {set} categories");
        }
    }
    assert_eq!(grid.get(&[0, 0, Channel::IsEntrance.index()]), 1.0);
    assert_eq!(grid.get(&[19, 19, Channel::IsExit.index()]), 1.0);
}

#[test]
fn summary_grid_has_landmarks_only() {
    let bundle = codec()
        .encode(&build(complex_park(), ViewContext::SUMMARY))
        .unwrap();
    let grid = bundle.get(names::GRID).unwrap();
    let nonzero = grid.data().iter().filter(|&&v| v != 0.0).count();
    assert_eq!(nonzero, 2);
}

#[test]
fn overlapping_entities_conflict() {
    let raw = RawSnapshotBuilder::new()
        .ride("carousel", "yellow", 4, 4)
        .shop("food", "blue", 4, 4)
        .build();
    let err = codec()
        .encode(&build(raw, ViewContext::DETAILED))
        .unwrap_err();
    assert_eq!(
        err,
        ContractViolation::CellConflict {
            x: 4,
            y: 4,
            existing: "ride",
            incoming: "shop"
        }
    );
}

#[test]
fn building_on_the_entrance_conflicts() {
    let raw = RawSnapshotBuilder::new().path(0, 0, 1.0).build();
    let err = codec()
        .encode(&build(raw, ViewContext::DETAILED))
        .unwrap_err();
    assert!(matches!(
        err,
        ContractViolation::CellConflict { existing: "entrance", incoming: "path", .. }
    ));
}

#[test]
fn staff_tables_keep_the_first_positions() {
    let mut b = RawSnapshotBuilder::new();
    for x in (0..12).rev() {
        b = b.staff("janitor", "yellow", x, 5);
    }
    let codec = codec();
    let snap = build(b.build(), ViewContext::DETAILED);
    assert_eq!(snap.staff.headcount(StaffRole::Janitor), 12);

    let bundle = codec.encode(&snap).unwrap();
    let table = bundle.get(names::JANITORS).unwrap();
    assert_eq!(table.shape(), &[10, 8]);
    for row in 0..10 {
        assert_eq!(
            table.get(&[row, 0]),
            codec.norms().normalize(Measure::Coordinate, row as f64).unwrap()
        );
    }

    let back = codec.decode(&bundle, ViewContext::DETAILED).unwrap();
    let xs: Vec<u32> = back.staff_list().iter().map(|e| e.position.x).collect();
    assert_eq!(xs, (0..10).collect::<Vec<u32>>());
    assert_eq!(back.staff.janitors[0], 12);

    // Truncation does not depend on input order.
    let mut b = RawSnapshotBuilder::new();
    for x in 0..12 {
        b = b.staff("janitor", "yellow", x, 5);
    }
    let again = codec
        .encode(&build(b.build(), ViewContext::DETAILED))
        .unwrap();
    assert_eq!(again.get(names::JANITORS), Some(table));
}

fn encoded() -> TensorBundle {
    codec()
        .encode(&build(complex_park(), ViewContext::ORACLE))
        .unwrap()
}

fn replace(bundle: &TensorBundle, name: &str, tensor: Tensor) -> TensorBundle {
    let mut out = TensorBundle::new();
    for (n, t) in bundle.iter() {
        if n == name {
            out.insert(n, tensor.clone());
        } else {
            out.insert(n, t.clone());
        }
    }
    out
}

#[test]
fn missing_tensor_is_reported() {
    let bundle = encoded();
    let mut partial = TensorBundle::new();
    for (n, t) in bundle.iter().filter(|(n, _)| *n != names::PARK) {
        partial.insert(n, t.clone());
    }
    let err = codec().decode(&partial, ViewContext::ORACLE).unwrap_err();
    assert_eq!(
        err,
        ObsError::Contract(ContractViolation::MissingTensor {
            name: "park_vector".into()
        })
    );
}

#[test]
fn wrong_shape_is_reported() {
    let bundle = replace(&encoded(), names::RIDES, Tensor::zeros(&[6]));
    let err = codec().decode(&bundle, ViewContext::ORACLE).unwrap_err();
    assert_eq!(
        err,
        ObsError::Contract(ContractViolation::TensorShape {
            name: "rides_vector".into(),
            expected: vec![7],
            found: vec![6]
        })
    );
}

#[test]
fn flagless_nonzero_cell_is_unrecognized() {
    let mut grid = encoded().get(names::GRID).unwrap().clone();
    grid.set(&[5, 15, Channel::Price.index()], 0.3);
    let bundle = replace(&encoded(), names::GRID, grid);
    let err = codec().decode(&bundle, ViewContext::ORACLE).unwrap_err();
    assert_eq!(
        err,
        ObsError::Contract(ContractViolation::UnrecognizedCell { x: 5, y: 15 })
    );
}

#[test]
fn staff_rows_off_the_grid_are_rejected() {
    let codec = codec();
    let raw = RawSnapshotBuilder::new().staff("janitor", "yellow", 1, 1).build();
    let bundle = codec.encode(&build(raw, ViewContext::DETAILED)).unwrap();

    let mut table = bundle.get(names::JANITORS).unwrap().clone();
    table.set(&[0, 0], 5.0);
    let err = codec
        .decode(&replace(&bundle, names::JANITORS, table), ViewContext::DETAILED)
        .unwrap_err();
    assert_eq!(
        err,
        ObsError::Contract(ContractViolation::OutOfBounds {
            what: "staff",
            x: 100,
            y: 1,
            size: 20,
        })
    );

    let mut table = bundle.get(names::JANITORS).unwrap().clone();
    table.set(&[0, 0], -3.0);
    let err = codec
        .decode(&replace(&bundle, names::JANITORS, table), ViewContext::DETAILED)
        .unwrap_err();
    assert!(matches!(
        err,
        ObsError::Contract(ContractViolation::OutOfBounds { what: "staff", x, y: 1, .. }) if x < 0
    ));
}

#[test]
fn all_zero_survey_rows_read_as_padding() {
    let codec = codec();
    let raw = RawSnapshotBuilder::new()
        .survey_result(0, 0)
        .survey_result(2, 5)
        .build();
    let bundle = codec.encode(&build(raw, ViewContext::DETAILED)).unwrap();

    // A guest whose values and ids all encode to zero is indistinguishable
    // from an empty row.
    let mut table = bundle.get(names::SURVEY_RESULTS).unwrap().clone();
    for col in 0..table.shape()[1] {
        table.set(&[0, col], 0.0);
    }
    let back = codec
        .decode(&replace(&bundle, names::SURVEY_RESULTS, table), ViewContext::DETAILED)
        .unwrap();
    assert_eq!(back.survey.results.len(), 1);
    assert_eq!(back.survey.results[0].happiness_at_exit, 0.42);
}

#[test]
fn colorless_ride_is_unrecognized() {
    let mut grid = encoded().get(names::GRID).unwrap().clone();
    grid.set(&[1, 2, Channel::IsYellow.index()], 0.0);
    let bundle = replace(&encoded(), names::GRID, grid);
    let err = codec().decode(&bundle, ViewContext::ORACLE).unwrap_err();
    assert_eq!(
        err,
        ObsError::Contract(ContractViolation::UnrecognizedCell { x: 1, y: 2 })
    );
}

#[test]
fn missing_exit_is_reported() {
    let mut grid = encoded().get(names::GRID).unwrap().clone();
    grid.set(&[19, 19, Channel::IsExit.index()], 0.0);
    let bundle = replace(&encoded(), names::GRID, grid);
    let err = codec().decode(&bundle, ViewContext::ORACLE).unwrap_err();
    assert_eq!(
        err,
        ObsError::Contract(ContractViolation::MissingLandmark { which: "exit" })
    );
}

#[test]
fn soft_flags_use_the_threshold() {
    let mut grid = encoded().get(names::GRID).unwrap().clone();
    grid.set(&[1, 2, Channel::IsCarousel.index()], 0.6);
    grid.set(&[1, 2, Channel::IsYellow.index()], 0.51);
    let bundle = replace(&encoded(), names::GRID, grid);
    let back = codec().decode(&bundle, ViewContext::ORACLE).unwrap();
    assert_eq!(back.ride_list().len(), 1);
}

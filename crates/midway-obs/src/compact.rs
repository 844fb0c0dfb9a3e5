//! The compact layout: aggregate vectors only, no grid or tables.
//!
//! Per subtype and color counts come from the itemized lists, so they
//! read as zero for a snapshot built at summary granularity. Staff
//! counts come from the aggregates and are always populated.

use midway_core::{round_to, Color, ContractViolation, RideKind, ShopKind, StaffRole};
use midway_snapshot::DomainSnapshot;

use crate::codec::{names, TensorCodec};
use crate::encode::{guests, VecWriter};
use crate::norm::Measure;
use crate::tensor::TensorBundle;

pub(crate) fn encode_compact(
    codec: &TensorCodec,
    s: &DomainSnapshot,
) -> Result<TensorBundle, ContractViolation> {
    let norms = codec.norms();
    let mut bundle = TensorBundle::new();

    let rides = s.ride_list();
    let mut w = VecWriter::new(norms, 19);
    for &kind in RideKind::ALL {
        for &color in Color::ALL {
            let n = rides
                .iter()
                .filter(|r| r.subtype == kind && r.subclass == color)
                .count();
            w.norm(Measure::EntityCount, n as f64)?;
        }
    }
    w.unit(s.rides.min_uptime);
    w.int(Measure::RidesOperatingCost, s.rides.total_operating_cost)?;
    w.int(Measure::RidesRevenue, s.rides.total_revenue_generated)?;
    w.norm(Measure::TotalExcitement, s.rides.total_excitement)?;
    w.norm(Measure::AvgIntensity, s.rides.avg_intensity)?;
    w.int(Measure::TotalCapacity, s.rides.total_capacity)?;
    let avg_wait = if rides.is_empty() {
        0.0
    } else {
        rides.iter().map(|r| r.avg_wait_time).sum::<f64>() / rides.len() as f64
    };
    w.norm(Measure::AvgWaitTime, round_to(avg_wait, 2))?;
    bundle.insert(names::RIDES, w.finish(&[19])?);

    let shops = s.shop_list();
    let mut w = VecWriter::new(norms, 15);
    for &kind in ShopKind::ALL {
        for &color in Color::ALL {
            let n = shops
                .iter()
                .filter(|sh| sh.subtype == kind && sh.subclass == color)
                .count();
            w.norm(Measure::EntityCount, n as f64)?;
        }
    }
    w.int(Measure::ShopsRevenue, s.shops.total_revenue_generated)?;
    w.int(Measure::ShopsOperatingCost, s.shops.total_operating_cost)?;
    w.unit(s.shops.min_uptime);
    bundle.insert(names::SHOPS, w.finish(&[15])?);

    let mut w = VecWriter::new(norms, 14);
    for &role in StaffRole::ALL {
        for &n in s.staff.counts(role) {
            w.norm(Measure::EntityCount, f64::from(n))?;
        }
    }
    w.int(Measure::TotalSalaryPaid, s.staff.total_salary_paid)?;
    w.int(Measure::StaffOperatingCost, s.staff.total_operating_cost)?;
    bundle.insert(names::STAFF, w.finish(&[14])?);

    bundle.insert(names::GUESTS, guests(norms, &s.guests, false)?);

    let mut w = VecWriter::new(norms, 10);
    w.int(Measure::Step, s.step)?;
    w.int(Measure::Horizon, s.horizon)?;
    w.int(Measure::Value, s.value)?;
    w.int(Measure::Money, s.money)?;
    w.int(Measure::Revenue, s.revenue)?;
    w.int(Measure::Expenses, s.expenses)?;
    w.signed(Measure::Profit, s.profit)?;
    w.norm(Measure::ParkRating, s.park_rating)?;
    w.unit(s.min_cleanliness);
    bundle.insert(names::PARK, w.finish(&[10])?);

    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use midway_core::{CodecConfig, ObsLayout, ViewContext};
    use midway_test_utils::RawSnapshotBuilder;

    use super::*;

    fn codec() -> TensorCodec {
        TensorCodec::new(CodecConfig {
            layout: ObsLayout::Compact,
            ..CodecConfig::default()
        })
        .unwrap()
    }

    fn snapshot(ctx: ViewContext) -> DomainSnapshot {
        let raw = RawSnapshotBuilder::new()
            .ride("roller_coaster", "blue", 4, 4)
            .ride("roller_coaster", "blue", 5, 4)
            .shop("food", "red", 6, 6)
            .staff("mechanic", "green", 1, 1)
            .revenue(100)
            .expenses(250)
            .build();
        DomainSnapshot::from_value(raw, ctx, &CodecConfig::default()).unwrap()
    }

    #[test]
    fn compact_vectors() {
        let codec = codec();
        let b = codec.encode(&snapshot(ViewContext::DETAILED)).unwrap();
        let names: Vec<_> = b.names().collect();
        assert_eq!(
            names,
            ["rides_vector", "shops_vector", "staff_vector", "guests_vector", "park_vector"]
        );

        let rides = b.get("rides_vector").unwrap().data();
        // roller_coaster is the third ride kind, blue the second color.
        assert_eq!(rides[2 * 4 + 1], 2.0 / 50.0);
        assert_eq!(rides.iter().take(12).filter(|&&v| v != 0.0).count(), 1);
        assert_eq!(rides[18], codec.norms().normalize(Measure::AvgWaitTime, 6.5).unwrap());

        let shops = b.get("shops_vector").unwrap().data();
        assert_eq!(shops[4 + 3], 1.0 / 50.0);

        let staff = b.get("staff_vector").unwrap().data();
        assert_eq!(staff[4 + 2], 1.0 / 50.0);

        let park = b.get("park_vector").unwrap().data();
        assert_eq!(park[6], 0.0, "loss has a zero sign flag");
        assert_eq!(park[7], codec.norms().normalize(Measure::Profit, 150.0).unwrap());
    }

    #[test]
    fn summary_has_no_itemized_counts() {
        let b = codec().encode(&snapshot(ViewContext::SUMMARY)).unwrap();
        let rides = b.get("rides_vector").unwrap().data();
        assert!(rides[..12].iter().all(|&v| v == 0.0));
        let staff = b.get("staff_vector").unwrap().data();
        assert_eq!(staff[4 + 2], 1.0 / 50.0);
    }
}

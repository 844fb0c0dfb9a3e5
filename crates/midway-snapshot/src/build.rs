//! Raw snapshot → [`DomainSnapshot`] construction.

use midway_core::{
    round_to, AvailableEntities, CodecConfig, ContractViolation, GuestEnums, Record,
    ResearchSpeed, TopicSet, ViewContext, VisibilityMask,
};

use crate::model::{
    Coord, DomainSnapshot, Employee, GuestStats, PathTile, Ride, Rides, Shop, Shops, Staff,
    SurveyResult, SurveyResults, WaterTile,
};
use crate::raw::{RawGuestStats, RawSnapshot, RawSurvey, RawTerrain};

impl DomainSnapshot {
    /// Build a filtered snapshot from the server's JSON text.
    pub fn from_json_str(
        json: &str,
        ctx: ViewContext,
        config: &CodecConfig,
    ) -> Result<Self, ContractViolation> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        Self::from_raw(&raw, ctx, config)
    }

    /// Build a filtered snapshot from an already-parsed JSON value.
    pub fn from_value(
        value: serde_json::Value,
        ctx: ViewContext,
        config: &CodecConfig,
    ) -> Result<Self, ContractViolation> {
        let raw: RawSnapshot = serde_json::from_value(value)?;
        Self::from_raw(&raw, ctx, config)
    }

    /// Build a filtered snapshot.
    ///
    /// Aggregates are always computed from the full raw lists; the
    /// itemized lists are kept only when `ctx` is detailed. Coordinates
    /// outside the configured park and survey ids outside the guest enum
    /// tables are contract violations.
    pub fn from_raw(
        raw: &RawSnapshot,
        ctx: ViewContext,
        config: &CodecConfig,
    ) -> Result<Self, ContractViolation> {
        let size = config.park_size;
        let mask = VisibilityMask::compile(Self::SCHEMA, ctx);
        let state = &raw.state;

        let mut cleanliness: Vec<f64> = Vec::new();

        let mut rides = raw
            .rides
            .iter()
            .map(|r| {
                cleanliness.push(r.cleanliness);
                Ok(Ride {
                    subtype: r.subtype,
                    subclass: r.subclass,
                    position: Coord::checked("ride", r.x, r.y, size)?,
                    out_of_service: r.out_of_service,
                    uptime: round_to(r.uptime, 2),
                    cleanliness: round_to(r.cleanliness, 2),
                    ticket_price: r.ticket_price,
                    operating_cost: r.operating_cost,
                    revenue_generated: r.revenue_generated,
                    capacity: r.capacity,
                    intensity: r.intensity,
                    excitement: r.excitement,
                    guests_entertained: r.guests_entertained,
                    times_operated: r.times_operated,
                    cost_per_operation: r.cost_per_operation,
                    avg_wait_time: round_to(r.avg_wait_time, 2),
                    avg_guests_per_operation: round_to(r.avg_guests_per_operation, 2),
                    breakdown_rate: round_to(r.breakdown_rate, 3),
                })
            })
            .collect::<Result<Vec<_>, ContractViolation>>()?;
        rides.sort_by_key(|r| r.position);

        let mut shops = raw
            .shops
            .iter()
            .map(|s| {
                cleanliness.push(s.cleanliness);
                Ok(Shop {
                    subtype: s.subtype,
                    subclass: s.subclass,
                    position: Coord::checked("shop", s.x, s.y, size)?,
                    item_price: s.item_price,
                    item_cost: s.item_cost,
                    operating_cost: s.operating_cost,
                    uptime: round_to(s.uptime, 2),
                    number_of_restocks: s.number_of_restocks,
                    order_quantity: s.order_quantity,
                    inventory: s.inventory,
                    revenue_generated: s.revenue_generated,
                    cleanliness: round_to(s.cleanliness, 2),
                    guests_served: s.guests_served,
                    out_of_service: s.out_of_service,
                })
            })
            .collect::<Result<Vec<_>, ContractViolation>>()?;
        shops.sort_by_key(|s| s.position);

        let mut staff_list = raw
            .staff
            .iter()
            .map(|e| {
                Ok(Employee {
                    role: e.subtype,
                    subclass: e.subclass,
                    position: Coord::checked("staff", e.x, e.y, size)?,
                    salary: e.salary,
                    operating_cost: e.operating_cost,
                    success_metric: e.success_metric,
                    success_metric_value: round_to(e.success_metric_value, 2),
                    tiles_traversed: e.tiles_traversed,
                })
            })
            .collect::<Result<Vec<_>, ContractViolation>>()?;
        staff_list.sort_by_key(|e| (e.role, e.position, e.subclass));

        let mut paths = Vec::new();
        let mut waters = Vec::new();
        for tile in &raw.terrain {
            match *tile {
                RawTerrain::Path { x, y, cleanliness: c } => {
                    cleanliness.push(c);
                    paths.push(PathTile {
                        position: Coord::checked("path", x, y, size)?,
                        cleanliness: round_to(c, 2),
                    });
                }
                RawTerrain::Water { x, y } => waters.push(WaterTile {
                    position: Coord::checked("water", x, y, size)?,
                }),
                RawTerrain::Other => log::debug!("skipping terrain tile of unknown type"),
            }
        }
        paths.sort_by_key(|p| p.position);
        waters.sort_by_key(|w| w.position);

        let min_cleanliness = cleanliness
            .iter()
            .copied()
            .reduce(f64::min)
            .map_or(1.0, |c| round_to(c, 2));

        let rides = summarize_rides(rides, state.park_excitement, ctx);
        let shops = summarize_shops(shops, ctx);
        let staff = summarize_staff(staff_list, state.total_salary_paid, ctx);

        let available_entities = AvailableEntities::from_listing(
            state
                .available_entities
                .iter()
                .map(|(k, v)| (k.as_str(), v.iter().map(String::as_str))),
        );

        let snapshot = DomainSnapshot {
            context: ctx,
            park_id: state.park_id.clone(),
            step: state.step,
            horizon: state.horizon,
            value: state.value,
            money: state.money,
            revenue: state.revenue,
            expenses: state.expenses,
            profit: state.revenue - state.expenses,
            park_rating: round_to(state.park_rating, 2),
            guests: guest_stats(&raw.guest_stats, ctx),
            survey: survey(&raw.guest_survey_results, &config.guest_enums)?,
            rides,
            shops,
            staff,
            research_speed: ResearchSpeed::from_name_lossy(&state.research_speed),
            research_topics: TopicSet::from_names_lossy(&state.research_topics),
            research_operating_cost: mask
                .gate("research_operating_cost", state.research_operating_cost),
            available_entities,
            fast_days_since_last_new_entity: mask.gate(
                "fast_days_since_last_new_entity",
                state.fast_days_since_last_new_entity,
            ),
            medium_days_since_last_new_entity: mask.gate(
                "medium_days_since_last_new_entity",
                state.medium_days_since_last_new_entity,
            ),
            slow_days_since_last_new_entity: mask.gate(
                "slow_days_since_last_new_entity",
                state.slow_days_since_last_new_entity,
            ),
            new_entity_available: state.new_entity_available,
            entrance: Coord::checked("entrance", raw.entrance.x, raw.entrance.y, size)?,
            exit: Coord::checked("exit", raw.exit.x, raw.exit.y, size)?,
            paths: mask.gate("paths", paths),
            waters: mask.gate("waters", waters),
            min_cleanliness,
        };

        log::debug!(
            "built snapshot step={} ctx={} rides={} shops={} staff={}",
            snapshot.step,
            ctx,
            snapshot.rides.total_rides,
            snapshot.shops.total_shops,
            raw.staff.len(),
        );
        Ok(snapshot)
    }
}

fn guest_stats(raw: &RawGuestStats, ctx: ViewContext) -> GuestStats {
    let mask = VisibilityMask::compile(GuestStats::SCHEMA, ctx);
    GuestStats {
        total_guests: raw.total_guests,
        avg_money_spent: round_to(raw.avg_money_spent, 2),
        avg_time_in_park: round_to(raw.avg_time_in_park, 2),
        avg_rides_visited: round_to(raw.avg_rides_visited, 2),
        avg_food_shops_visited: round_to(raw.avg_food_shops_visited, 2),
        avg_drink_shops_visited: round_to(raw.avg_drink_shops_visited, 2),
        avg_specialty_shops_visited: round_to(raw.avg_specialty_shops_visited, 2),
        avg_happiness: mask.gate("avg_happiness", round_to(raw.avg_happiness, 2)),
        avg_hunger: mask.gate("avg_hunger", round_to(raw.avg_hunger, 2)),
        avg_thirst: mask.gate("avg_thirst", round_to(raw.avg_thirst, 2)),
    }
}

fn survey(raw: &RawSurvey, enums: &GuestEnums) -> Result<SurveyResults, ContractViolation> {
    let results = raw
        .list_of_results
        .iter()
        .map(|r| {
            let reason = enums.exit_reason(r.reason_for_exit_id).ok_or_else(|| {
                ContractViolation::UnknownValue {
                    field: "reason_for_exit_id",
                    value: r.reason_for_exit_id.to_string(),
                }
            })?;
            let preference = enums.preference(r.preference_id).ok_or_else(|| {
                ContractViolation::UnknownValue {
                    field: "preference_id",
                    value: r.preference_id.to_string(),
                }
            })?;
            Ok(SurveyResult {
                happiness_at_exit: round_to(r.happiness_at_exit, 2),
                hunger_at_exit: round_to(r.hunger_at_exit, 2),
                thirst_at_exit: round_to(r.thirst_at_exit, 2),
                remaining_energy: round_to(r.remaining_energy, 2),
                remaining_money: round_to(r.remaining_money, 2),
                percent_of_money_spent: round_to(r.percent_of_money_spent, 2),
                reason_for_exit: reason.to_string(),
                preference: preference.to_string(),
            })
        })
        .collect::<Result<Vec<_>, ContractViolation>>()?;
    Ok(SurveyResults {
        age_of_results: raw.age_of_results,
        results,
    })
}

fn summarize_rides(list: Vec<Ride>, park_excitement: f64, ctx: ViewContext) -> Rides {
    let mask = VisibilityMask::compile(Rides::SCHEMA, ctx);
    let n = list.len() as i64;
    let avg_intensity = if n > 0 {
        round_to(list.iter().map(|r| r.intensity as f64).sum::<f64>() / n as f64, 2)
    } else {
        0.0
    };
    Rides {
        total_rides: n,
        min_uptime: list.iter().map(|r| r.uptime).reduce(f64::min).unwrap_or(1.0),
        total_operating_cost: list.iter().map(|r| r.operating_cost).sum(),
        total_revenue_generated: list.iter().map(|r| r.revenue_generated).sum(),
        total_excitement: round_to(park_excitement, 2),
        avg_intensity,
        total_capacity: list.iter().map(|r| r.capacity).sum(),
        ride_list: mask.gate("ride_list", list),
    }
}

fn summarize_shops(list: Vec<Shop>, ctx: ViewContext) -> Shops {
    let mask = VisibilityMask::compile(Shops::SCHEMA, ctx);
    Shops {
        total_shops: list.len() as i64,
        total_revenue_generated: list.iter().map(|s| s.revenue_generated).sum(),
        total_operating_cost: list.iter().map(|s| s.operating_cost).sum(),
        min_uptime: list.iter().map(|s| s.uptime).reduce(f64::min).unwrap_or(1.0),
        shop_list: mask.gate("shop_list", list),
    }
}

fn summarize_staff(list: Vec<Employee>, total_salary_paid: i64, ctx: ViewContext) -> Staff {
    let mask = VisibilityMask::compile(Staff::SCHEMA, ctx);
    let mut staff = Staff {
        janitors: [0; 4],
        mechanics: [0; 4],
        specialists: [0; 4],
        total_salary_paid,
        total_operating_cost: list.iter().map(|e| e.operating_cost).sum(),
        staff_list: midway_core::Field::Absent,
    };
    for e in &list {
        staff.counts_mut(e.role)[e.subclass.index()] += 1;
    }
    staff.staff_list = mask.gate("staff_list", list);
    staff
}

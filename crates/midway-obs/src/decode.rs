//! Inverse mapping for the full layout: tensors → snapshot.

use midway_core::{
    round_to, AvailableEntities, Color, ContractViolation, Field, GuestEnums, Record,
    ResearchSpeed, RideKind, ShopKind, StaffRole, Subtype, SuccessMetric, TopicSet, ViewContext,
    VisibilityMask,
};
use midway_snapshot::{
    ColorCounts, Coord, DomainSnapshot, Employee, GuestStats, PathTile, Ride, Rides, Shop, Shops,
    Staff, SurveyResult, SurveyResults, WaterTile,
};

use crate::channel::Channel;
use crate::codec::{names, staff_table, TensorCodec, PARK_LEN, STAFF_ROW, SURVEY_ROW};
use crate::norm::{Measure, NormalizationTable};
use crate::tensor::{Tensor, TensorBundle};

/// Flags at or above this value count as set.
const FLAG_THRESHOLD: f64 = 0.5;

// ── Vector reader ──────────────────────────────────────────────────

struct VecReader<'a> {
    norms: &'a NormalizationTable,
    data: &'a [f64],
    pos: usize,
}

impl<'a> VecReader<'a> {
    fn new(norms: &'a NormalizationTable, data: &'a [f64]) -> Self {
        Self { norms, data, pos: 0 }
    }

    fn next(&mut self) -> f64 {
        // Callers check tensor shapes before reading, so `pos` stays in range.
        let v = self.data.get(self.pos).copied().unwrap_or(0.0);
        self.pos += 1;
        v
    }

    fn int(&mut self, measure: Measure) -> i64 {
        let v = self.next();
        self.norms.denormalize_int(measure, v)
    }

    fn real(&mut self, measure: Measure) -> f64 {
        let v = self.next();
        self.norms.denormalize(measure, v)
    }

    fn unit(&mut self) -> f64 {
        round_to(self.next(), 2)
    }

    fn flag(&mut self) -> bool {
        self.next() >= FLAG_THRESHOLD
    }

    fn signed(&mut self, measure: Measure) -> i64 {
        let positive = self.flag();
        let magnitude = self.int(measure);
        if positive {
            magnitude
        } else {
            -magnitude
        }
    }
}

fn count(norms: &NormalizationTable, v: f64) -> u32 {
    norms.denormalize_int(Measure::ColorCount, v).max(0) as u32
}

// ── Full layout ────────────────────────────────────────────────────

pub(crate) fn decode_full(
    codec: &TensorCodec,
    bundle: &TensorBundle,
    ctx: ViewContext,
) -> Result<DomainSnapshot, ContractViolation> {
    let config = codec.config();
    let norms = codec.norms();
    let tensor = |name: &'static str| require(codec, bundle, name);

    let grid = decode_grid(norms, tensor(names::GRID)?)?;

    let mut r = VecReader::new(norms, tensor(names::RIDES)?.data());
    let total_rides = r.int(Measure::TotalRides);
    let min_uptime = r.unit();
    let total_operating_cost = r.int(Measure::RidesOperatingCost);
    let total_revenue_generated = r.int(Measure::RidesRevenue);
    let total_excitement = r.real(Measure::TotalExcitement);
    let avg_intensity = r.real(Measure::AvgIntensity);
    let total_capacity = r.int(Measure::TotalCapacity);
    let rides = Rides {
        total_rides,
        min_uptime,
        total_operating_cost,
        total_revenue_generated,
        total_excitement,
        avg_intensity,
        total_capacity,
        ride_list: VisibilityMask::compile(Rides::SCHEMA, ctx).gate("ride_list", grid.rides),
    };

    let mut r = VecReader::new(norms, tensor(names::SHOPS)?.data());
    let total_shops = r.int(Measure::TotalShops);
    let total_revenue_generated = r.int(Measure::ShopsRevenue);
    let total_operating_cost = r.int(Measure::ShopsOperatingCost);
    let min_uptime = r.unit();
    let shops = Shops {
        total_shops,
        total_revenue_generated,
        total_operating_cost,
        min_uptime,
        shop_list: VisibilityMask::compile(Shops::SCHEMA, ctx).gate("shop_list", grid.shops),
    };

    let staff_vec = tensor(names::STAFF)?.data();
    let counts = |role: StaffRole| -> ColorCounts {
        let base = role.index() * 4;
        std::array::from_fn(|i| count(norms, staff_vec[base + i]))
    };
    let mut tail = VecReader::new(norms, &staff_vec[12..]);
    let mut staff = Staff {
        janitors: counts(StaffRole::Janitor),
        mechanics: counts(StaffRole::Mechanic),
        specialists: counts(StaffRole::Specialist),
        total_salary_paid: tail.int(Measure::TotalSalaryPaid),
        total_operating_cost: tail.int(Measure::StaffOperatingCost),
        staff_list: Field::Absent,
    };
    let mut roster = Vec::new();
    for &role in StaffRole::ALL {
        let table = tensor(staff_table(role))?;
        let rows = (staff.headcount(role) as usize).min(config.max_staff_per_type);
        for i in 0..rows {
            roster.push(decode_employee(norms, role, table.row(&[i]), config.park_size)?);
        }
    }
    staff.staff_list = VisibilityMask::compile(Staff::SCHEMA, ctx).gate("staff_list", roster);

    let guests = decode_guests(norms, tensor(names::GUESTS)?.data(), ctx);

    let mut r = VecReader::new(norms, tensor(names::SURVEY_AGE)?.data());
    let survey = SurveyResults {
        age_of_results: r.int(Measure::SurveyAge),
        results: decode_survey(norms, &config.guest_enums, tensor(names::SURVEY_RESULTS)?)?,
    };

    let root = VisibilityMask::compile(DomainSnapshot::SCHEMA, ctx);
    let mut p = VecReader::new(norms, tensor(names::PARK)?.data());
    let step = p.int(Measure::Step);
    let horizon = p.int(Measure::Horizon);
    let value = p.int(Measure::Value);
    let money = p.int(Measure::Money);
    let revenue = p.int(Measure::Revenue);
    let expenses = p.int(Measure::Expenses);
    let profit = p.signed(Measure::Profit);
    let park_rating = p.real(Measure::ParkRating);
    let level = p.int(Measure::ResearchSpeed);
    let research_speed = u32::try_from(level)
        .ok()
        .and_then(ResearchSpeed::from_level)
        .ok_or_else(|| ContractViolation::UnknownValue {
            field: "research_speed",
            value: level.to_string(),
        })?;
    let mut research_topics = TopicSet::EMPTY;
    for &topic in Subtype::ALL {
        if p.flag() {
            research_topics.insert(topic);
        }
    }
    let research_operating_cost = p.int(Measure::ResearchOperatingCost);
    let mut available_entities = AvailableEntities::default();
    for (subtype, color) in AvailableEntities::slots() {
        if p.flag() {
            available_entities.insert(subtype, color);
        }
    }
    let new_entity_available = p.flag();
    let fast = p.int(Measure::DaysSinceNewEntity);
    let medium = p.int(Measure::DaysSinceNewEntity);
    let slow = p.int(Measure::DaysSinceNewEntity);
    let min_cleanliness = p.unit();
    debug_assert_eq!(p.pos, PARK_LEN);

    Ok(DomainSnapshot {
        context: ctx,
        park_id: None,
        step,
        horizon,
        value,
        money,
        revenue,
        expenses,
        profit,
        park_rating,
        guests,
        survey,
        rides,
        shops,
        staff,
        research_speed,
        research_topics,
        research_operating_cost: root.gate("research_operating_cost", research_operating_cost),
        available_entities,
        fast_days_since_last_new_entity: root.gate("fast_days_since_last_new_entity", fast),
        medium_days_since_last_new_entity: root.gate("medium_days_since_last_new_entity", medium),
        slow_days_since_last_new_entity: root.gate("slow_days_since_last_new_entity", slow),
        new_entity_available,
        entrance: grid.entrance,
        exit: grid.exit,
        paths: root.gate("paths", grid.paths),
        waters: root.gate("waters", grid.waters),
        min_cleanliness,
    })
}

fn require<'b>(
    codec: &TensorCodec,
    bundle: &'b TensorBundle,
    name: &'static str,
) -> Result<&'b Tensor, ContractViolation> {
    let shape = codec.shape_of(name).unwrap_or_default();
    bundle.require(name, &shape)
}

// ── Grid ───────────────────────────────────────────────────────────

struct DecodedGrid {
    entrance: Coord,
    exit: Coord,
    paths: Vec<PathTile>,
    waters: Vec<WaterTile>,
    rides: Vec<Ride>,
    shops: Vec<Shop>,
}

fn decode_grid(norms: &NormalizationTable, grid: &Tensor) -> Result<DecodedGrid, ContractViolation> {
    let size = grid.shape()[0];
    let mut entrance = None;
    let mut exit = None;
    let mut out = DecodedGrid {
        entrance: Coord::default(),
        exit: Coord::default(),
        paths: Vec::new(),
        waters: Vec::new(),
        rides: Vec::new(),
        shops: Vec::new(),
    };

    for x in 0..size {
        for y in 0..size {
            let cell = grid.row(&[x, y]);
            let pos = Coord::new(x as u32, y as u32);
            let at = |c: Channel| cell[c.index()];
            let Some(category) = Channel::CATEGORIES
                .iter()
                .copied()
                .find(|&c| at(c) >= FLAG_THRESHOLD)
            else {
                if cell.iter().any(|&v| v != 0.0) {
                    return Err(ContractViolation::UnrecognizedCell { x: pos.x, y: pos.y });
                }
                continue;
            };

            let color = || {
                Color::ALL
                    .iter()
                    .copied()
                    .find(|&c| at(Channel::color(c)) >= FLAG_THRESHOLD)
                    .ok_or(ContractViolation::UnrecognizedCell { x: pos.x, y: pos.y })
            };
            let int = |c: Channel, m: Measure| norms.denormalize_int(m, at(c));
            let real = |c: Channel, m: Measure| norms.denormalize(m, at(c));
            let unit = |c: Channel| round_to(at(c), 2);
            let out_of_service = at(Channel::OutOfService) >= FLAG_THRESHOLD;

            match category {
                Channel::IsEntrance => {
                    entrance.get_or_insert(pos);
                }
                Channel::IsExit => {
                    exit.get_or_insert(pos);
                }
                Channel::IsPath => out.paths.push(PathTile {
                    position: pos,
                    cleanliness: unit(Channel::Cleanliness),
                }),
                Channel::IsWater => out.waters.push(WaterTile { position: pos }),
                Channel::IsRollerCoaster | Channel::IsFerrisWheel | Channel::IsCarousel => {
                    let subtype = RideKind::ALL
                        .iter()
                        .copied()
                        .find(|&k| Channel::ride(k) == category)
                        .ok_or(ContractViolation::UnrecognizedCell { x: pos.x, y: pos.y })?;
                    out.rides.push(Ride {
                        subtype,
                        subclass: color()?,
                        position: pos,
                        out_of_service,
                        uptime: unit(Channel::Uptime),
                        cleanliness: unit(Channel::Cleanliness),
                        ticket_price: int(Channel::Price, Measure::Price),
                        operating_cost: int(Channel::OperatingCost, Measure::OperatingCost),
                        revenue_generated: int(Channel::RevenueGenerated, Measure::RevenueGenerated),
                        capacity: int(Channel::Capacity, Measure::Capacity),
                        intensity: int(Channel::Intensity, Measure::Intensity),
                        excitement: int(Channel::Excitement, Measure::Excitement),
                        guests_entertained: int(Channel::GuestsServed, Measure::GuestsServed),
                        times_operated: int(Channel::TimesOperated, Measure::TimesOperated),
                        cost_per_operation: int(Channel::CostPerOperation, Measure::CostPerOperation),
                        avg_wait_time: real(Channel::AvgWaitTime, Measure::AvgWaitTime),
                        avg_guests_per_operation: real(
                            Channel::AvgGuestsPerOperation,
                            Measure::AvgGuestsPerOperation,
                        ),
                        breakdown_rate: round_to(at(Channel::BreakdownRate), 3),
                    });
                }
                _ => {
                    let subtype = ShopKind::ALL
                        .iter()
                        .copied()
                        .find(|&k| Channel::shop(k) == category)
                        .ok_or(ContractViolation::UnrecognizedCell { x: pos.x, y: pos.y })?;
                    out.shops.push(Shop {
                        subtype,
                        subclass: color()?,
                        position: pos,
                        item_price: int(Channel::Price, Measure::Price),
                        item_cost: int(Channel::ItemCost, Measure::ItemCost),
                        operating_cost: int(Channel::OperatingCost, Measure::OperatingCost),
                        uptime: unit(Channel::ShopUptime),
                        number_of_restocks: int(Channel::NumberOfRestocks, Measure::NumberOfRestocks),
                        order_quantity: int(Channel::OrderQuantity, Measure::OrderQuantity),
                        inventory: int(Channel::Inventory, Measure::Inventory),
                        revenue_generated: int(Channel::RevenueGenerated, Measure::RevenueGenerated),
                        cleanliness: unit(Channel::Cleanliness),
                        guests_served: int(Channel::GuestsServed, Measure::GuestsServed),
                        out_of_service,
                    });
                }
            }
        }
    }

    out.entrance = entrance.ok_or(ContractViolation::MissingLandmark { which: "entrance" })?;
    out.exit = exit.ok_or(ContractViolation::MissingLandmark { which: "exit" })?;
    Ok(out)
}

// ── Tables ─────────────────────────────────────────────────────────

fn decode_employee(
    norms: &NormalizationTable,
    role: StaffRole,
    row: &[f64],
    park_size: u32,
) -> Result<Employee, ContractViolation> {
    debug_assert_eq!(row.len(), STAFF_ROW);
    let mut r = VecReader::new(norms, row);
    let x = r.int(Measure::Coordinate);
    let y = r.int(Measure::Coordinate);
    let position = Coord::checked("staff", x, y, park_size)?;
    let subclass_id = r.int(Measure::SubclassId);
    let subclass = usize::try_from(subclass_id)
        .ok()
        .and_then(Color::from_index)
        .ok_or_else(|| ContractViolation::UnknownValue {
            field: "subclass_id",
            value: subclass_id.to_string(),
        })?;
    let salary = r.int(Measure::Salary);
    let operating_cost = r.int(Measure::EmployeeOperatingCost);
    let metric_id = r.int(Measure::SuccessMetricId);
    let success_metric = usize::try_from(metric_id)
        .ok()
        .and_then(SuccessMetric::from_index)
        .ok_or_else(|| ContractViolation::UnknownValue {
            field: "success_metric_id",
            value: metric_id.to_string(),
        })?;
    let success_metric_value = r.real(Measure::for_metric(success_metric));
    let tiles_traversed = r.int(Measure::TilesTraversed);
    Ok(Employee {
        role,
        subclass,
        position,
        salary,
        operating_cost,
        success_metric,
        success_metric_value,
        tiles_traversed,
    })
}

fn decode_guests(norms: &NormalizationTable, data: &[f64], ctx: ViewContext) -> GuestStats {
    let mask = VisibilityMask::compile(GuestStats::SCHEMA, ctx);
    let mut r = VecReader::new(norms, data);
    GuestStats {
        total_guests: r.int(Measure::TotalGuests),
        avg_money_spent: r.real(Measure::GuestAverage),
        avg_time_in_park: r.real(Measure::GuestAverage),
        avg_rides_visited: r.real(Measure::GuestAverage),
        avg_food_shops_visited: r.real(Measure::GuestAverage),
        avg_drink_shops_visited: r.real(Measure::GuestAverage),
        avg_specialty_shops_visited: r.real(Measure::GuestAverage),
        avg_happiness: mask.gate("avg_happiness", r.unit()),
        avg_hunger: mask.gate("avg_hunger", r.unit()),
        avg_thirst: mask.gate("avg_thirst", r.unit()),
    }
}

fn decode_survey(
    norms: &NormalizationTable,
    enums: &GuestEnums,
    table: &Tensor,
) -> Result<Vec<SurveyResult>, ContractViolation> {
    let rows = table.shape()[0];
    let mut out = Vec::new();
    for i in 0..rows {
        let row = table.row(&[i]);
        if row.iter().all(|&v| v == 0.0) {
            continue;
        }
        debug_assert_eq!(row.len(), SURVEY_ROW);
        let mut r = VecReader::new(norms, row);
        let happiness_at_exit = r.unit();
        let hunger_at_exit = r.unit();
        let thirst_at_exit = r.unit();
        let remaining_energy = r.real(Measure::RemainingEnergy);
        let remaining_money = r.real(Measure::RemainingMoney);
        let percent_of_money_spent = r.unit();
        let reason_id = r.int(Measure::ReasonForExitId);
        let preference_id = r.int(Measure::PreferenceId);
        let reason = enums
            .exit_reason(reason_id)
            .ok_or_else(|| ContractViolation::UnknownValue {
                field: "reason_for_exit_id",
                value: reason_id.to_string(),
            })?;
        let preference =
            enums
                .preference(preference_id)
                .ok_or_else(|| ContractViolation::UnknownValue {
                    field: "preference_id",
                    value: preference_id.to_string(),
                })?;
        out.push(SurveyResult {
            happiness_at_exit,
            hunger_at_exit,
            thirst_at_exit,
            remaining_energy,
            remaining_money,
            percent_of_money_spent,
            reason_for_exit: reason.to_string(),
            preference: preference.to_string(),
        });
    }
    Ok(out)
}

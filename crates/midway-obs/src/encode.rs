//! Forward mapping for the full layout: snapshot → tensors.

use midway_core::{
    round_to, AvailableEntities, ContractViolation, GuestEnums, StaffRole, Subtype,
};
use midway_snapshot::{Coord, DomainSnapshot, Employee, GuestStats, Ride, Shop};

use crate::channel::Channel;
use crate::codec::{names, staff_table, TensorCodec, PARK_LEN, STAFF_ROW, SURVEY_ROW};
use crate::norm::{Measure, NormalizationTable};
use crate::tensor::{Tensor, TensorBundle};

// ── Vector writer ──────────────────────────────────────────────────

/// Appends normalized values to a flat buffer.
pub(crate) struct VecWriter<'a> {
    norms: &'a NormalizationTable,
    out: Vec<f64>,
}

impl<'a> VecWriter<'a> {
    pub(crate) fn new(norms: &'a NormalizationTable, capacity: usize) -> Self {
        Self {
            norms,
            out: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn norm(&mut self, measure: Measure, value: f64) -> Result<(), ContractViolation> {
        self.out.push(self.norms.normalize(measure, value)?);
        Ok(())
    }

    pub(crate) fn int(&mut self, measure: Measure, value: i64) -> Result<(), ContractViolation> {
        self.norm(measure, value as f64)
    }

    /// A value already in `[0, 1]`, stored to two places.
    pub(crate) fn unit(&mut self, value: f64) {
        self.out.push(round_to(value, 2));
    }

    pub(crate) fn flag(&mut self, on: bool) {
        self.out.push(if on { 1.0 } else { 0.0 });
    }

    /// Signed quantity as a sign flag plus a log-scaled magnitude.
    pub(crate) fn signed(&mut self, measure: Measure, value: i64) -> Result<(), ContractViolation> {
        self.flag(value > 0);
        self.norm(measure, value.unsigned_abs() as f64)
    }

    pub(crate) fn zeros(&mut self, n: usize) {
        self.out.resize(self.out.len() + n, 0.0);
    }

    pub(crate) fn finish(self, shape: &[usize]) -> Result<Tensor, ContractViolation> {
        Tensor::from_parts(shape, self.out)
    }
}

// ── Grid writer ────────────────────────────────────────────────────

struct GridWriter<'a> {
    norms: &'a NormalizationTable,
    tensor: Tensor,
    size: usize,
    occupant: Vec<Option<&'static str>>,
}

impl<'a> GridWriter<'a> {
    fn new(norms: &'a NormalizationTable, size: usize) -> Self {
        Self {
            norms,
            tensor: Tensor::zeros(&[size, size, Channel::COUNT]),
            size,
            occupant: vec![None; size * size],
        }
    }

    /// Mark `pos` as holding a `category` entity and set its flag.
    fn claim(
        &mut self,
        pos: Coord,
        category: &'static str,
        flag: Channel,
    ) -> Result<(), ContractViolation> {
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.size || y >= self.size {
            return Err(ContractViolation::OutOfBounds {
                what: category,
                x: i64::from(pos.x),
                y: i64::from(pos.y),
                size: self.size as u32,
            });
        }
        let slot = &mut self.occupant[x * self.size + y];
        if let Some(existing) = *slot {
            return Err(ContractViolation::CellConflict {
                x: pos.x,
                y: pos.y,
                existing,
                incoming: category,
            });
        }
        *slot = Some(category);
        self.put(pos, flag, 1.0);
        Ok(())
    }

    fn put(&mut self, pos: Coord, channel: Channel, value: f64) {
        self.tensor
            .set(&[pos.x as usize, pos.y as usize, channel.index()], value);
    }

    fn put_norm(
        &mut self,
        pos: Coord,
        channel: Channel,
        measure: Measure,
        value: f64,
    ) -> Result<(), ContractViolation> {
        let v = self.norms.normalize(measure, value)?;
        self.put(pos, channel, v);
        Ok(())
    }

    fn ride(&mut self, r: &Ride) -> Result<(), ContractViolation> {
        let p = r.position;
        self.claim(p, "ride", Channel::ride(r.subtype))?;
        self.put(p, Channel::color(r.subclass), 1.0);
        self.put(p, Channel::OutOfService, flag(r.out_of_service));
        self.put_norm(p, Channel::Price, Measure::Price, r.ticket_price as f64)?;
        self.put_norm(p, Channel::OperatingCost, Measure::OperatingCost, r.operating_cost as f64)?;
        self.put_norm(
            p,
            Channel::RevenueGenerated,
            Measure::RevenueGenerated,
            r.revenue_generated as f64,
        )?;
        self.put_norm(
            p,
            Channel::GuestsServed,
            Measure::GuestsServed,
            r.guests_entertained as f64,
        )?;
        self.put(p, Channel::Cleanliness, round_to(r.cleanliness, 2));
        self.put_norm(p, Channel::Excitement, Measure::Excitement, r.excitement as f64)?;
        self.put_norm(p, Channel::Intensity, Measure::Intensity, r.intensity as f64)?;
        self.put_norm(p, Channel::Capacity, Measure::Capacity, r.capacity as f64)?;
        self.put_norm(p, Channel::TimesOperated, Measure::TimesOperated, r.times_operated as f64)?;
        self.put(p, Channel::Uptime, round_to(r.uptime, 2));
        self.put_norm(p, Channel::AvgWaitTime, Measure::AvgWaitTime, r.avg_wait_time)?;
        self.put_norm(
            p,
            Channel::AvgGuestsPerOperation,
            Measure::AvgGuestsPerOperation,
            r.avg_guests_per_operation,
        )?;
        self.put_norm(
            p,
            Channel::CostPerOperation,
            Measure::CostPerOperation,
            r.cost_per_operation as f64,
        )?;
        self.put(p, Channel::BreakdownRate, round_to(r.breakdown_rate, 3));
        Ok(())
    }

    fn shop(&mut self, s: &Shop) -> Result<(), ContractViolation> {
        let p = s.position;
        self.claim(p, "shop", Channel::shop(s.subtype))?;
        self.put(p, Channel::color(s.subclass), 1.0);
        self.put(p, Channel::OutOfService, flag(s.out_of_service));
        self.put_norm(p, Channel::Price, Measure::Price, s.item_price as f64)?;
        self.put_norm(p, Channel::OperatingCost, Measure::OperatingCost, s.operating_cost as f64)?;
        self.put_norm(
            p,
            Channel::RevenueGenerated,
            Measure::RevenueGenerated,
            s.revenue_generated as f64,
        )?;
        self.put_norm(p, Channel::GuestsServed, Measure::GuestsServed, s.guests_served as f64)?;
        self.put(p, Channel::Cleanliness, round_to(s.cleanliness, 2));
        self.put_norm(p, Channel::ItemCost, Measure::ItemCost, s.item_cost as f64)?;
        self.put_norm(
            p,
            Channel::NumberOfRestocks,
            Measure::NumberOfRestocks,
            s.number_of_restocks as f64,
        )?;
        self.put_norm(p, Channel::OrderQuantity, Measure::OrderQuantity, s.order_quantity as f64)?;
        self.put_norm(p, Channel::Inventory, Measure::Inventory, s.inventory as f64)?;
        self.put(p, Channel::ShopUptime, round_to(s.uptime, 2));
        Ok(())
    }
}

fn flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

// ── Full layout ────────────────────────────────────────────────────

pub(crate) fn encode_full(
    codec: &TensorCodec,
    s: &DomainSnapshot,
) -> Result<TensorBundle, ContractViolation> {
    let config = codec.config();
    let norms = codec.norms();
    let mut bundle = TensorBundle::new();

    bundle.insert(names::GRID, grid(norms, config.park_size as usize, s)?);

    let mut w = VecWriter::new(norms, 7);
    w.int(Measure::TotalRides, s.rides.total_rides)?;
    w.unit(s.rides.min_uptime);
    w.int(Measure::RidesOperatingCost, s.rides.total_operating_cost)?;
    w.int(Measure::RidesRevenue, s.rides.total_revenue_generated)?;
    w.norm(Measure::TotalExcitement, s.rides.total_excitement)?;
    w.norm(Measure::AvgIntensity, s.rides.avg_intensity)?;
    w.int(Measure::TotalCapacity, s.rides.total_capacity)?;
    bundle.insert(names::RIDES, w.finish(&[7])?);

    let mut w = VecWriter::new(norms, 4);
    w.int(Measure::TotalShops, s.shops.total_shops)?;
    w.int(Measure::ShopsRevenue, s.shops.total_revenue_generated)?;
    w.int(Measure::ShopsOperatingCost, s.shops.total_operating_cost)?;
    w.unit(s.shops.min_uptime);
    bundle.insert(names::SHOPS, w.finish(&[4])?);

    let mut w = VecWriter::new(norms, 14);
    for role in StaffRole::ALL {
        for &count in s.staff.counts(*role) {
            w.norm(Measure::ColorCount, f64::from(count))?;
        }
    }
    w.int(Measure::TotalSalaryPaid, s.staff.total_salary_paid)?;
    w.int(Measure::StaffOperatingCost, s.staff.total_operating_cost)?;
    bundle.insert(names::STAFF, w.finish(&[14])?);

    let cap = config.max_staff_per_type;
    for &role in StaffRole::ALL {
        bundle.insert(staff_table(role), staff_rows(norms, role, s.staff_list(), cap)?);
    }

    bundle.insert(names::GUESTS, guests(norms, &s.guests, true)?);

    let mut w = VecWriter::new(norms, 1);
    w.int(Measure::SurveyAge, s.survey.age_of_results)?;
    bundle.insert(names::SURVEY_AGE, w.finish(&[1])?);
    bundle.insert(
        names::SURVEY_RESULTS,
        survey(norms, &config.guest_enums, s, config.max_survey_results)?,
    );

    bundle.insert(names::PARK, park(norms, s)?);
    Ok(bundle)
}

fn grid(
    norms: &NormalizationTable,
    size: usize,
    s: &DomainSnapshot,
) -> Result<Tensor, ContractViolation> {
    let mut g = GridWriter::new(norms, size);
    g.claim(s.entrance, "entrance", Channel::IsEntrance)?;
    g.claim(s.exit, "exit", Channel::IsExit)?;
    for p in s.path_list() {
        g.claim(p.position, "path", Channel::IsPath)?;
        g.put(p.position, Channel::Cleanliness, round_to(p.cleanliness, 2));
    }
    for w in s.water_list() {
        g.claim(w.position, "water", Channel::IsWater)?;
    }
    for r in s.ride_list() {
        g.ride(r)?;
    }
    for shop in s.shop_list() {
        g.shop(shop)?;
    }
    Ok(g.tensor)
}

/// One role's table, rows sorted by position and truncated to `cap`.
fn staff_rows(
    norms: &NormalizationTable,
    role: StaffRole,
    staff: &[Employee],
    cap: usize,
) -> Result<Tensor, ContractViolation> {
    let mut rows: Vec<&Employee> = staff.iter().filter(|e| e.role == role).collect();
    rows.sort_by_key(|e| (e.position, e.subclass));
    if rows.len() > cap {
        log::warn!(
            "{} {role}s exceed table capacity {cap}; dropping {}",
            rows.len(),
            rows.len() - cap
        );
        rows.truncate(cap);
    }

    let mut w = VecWriter::new(norms, cap * STAFF_ROW);
    for e in &rows {
        w.norm(Measure::Coordinate, f64::from(e.position.x))?;
        w.norm(Measure::Coordinate, f64::from(e.position.y))?;
        w.norm(Measure::SubclassId, e.subclass.index() as f64)?;
        w.int(Measure::Salary, e.salary)?;
        w.int(Measure::EmployeeOperatingCost, e.operating_cost)?;
        w.norm(Measure::SuccessMetricId, e.success_metric.index() as f64)?;
        w.norm(Measure::for_metric(e.success_metric), e.success_metric_value)?;
        w.int(Measure::TilesTraversed, e.tiles_traversed)?;
    }
    w.zeros((cap - rows.len()) * STAFF_ROW);
    w.finish(&[cap, STAFF_ROW])
}

/// Guest aggregates; the oracle averages are appended when `oracle` is set.
pub(crate) fn guests(
    norms: &NormalizationTable,
    g: &GuestStats,
    oracle: bool,
) -> Result<Tensor, ContractViolation> {
    let len = if oracle { 10 } else { 7 };
    let mut w = VecWriter::new(norms, len);
    w.int(Measure::TotalGuests, g.total_guests)?;
    for avg in [
        g.avg_money_spent,
        g.avg_time_in_park,
        g.avg_rides_visited,
        g.avg_food_shops_visited,
        g.avg_drink_shops_visited,
        g.avg_specialty_shops_visited,
    ] {
        w.norm(Measure::GuestAverage, avg)?;
    }
    if oracle {
        w.unit(g.avg_happiness.get().copied().unwrap_or(0.0));
        w.unit(g.avg_hunger.get().copied().unwrap_or(0.0));
        w.unit(g.avg_thirst.get().copied().unwrap_or(0.0));
    }
    w.finish(&[len])
}

fn survey(
    norms: &NormalizationTable,
    enums: &GuestEnums,
    s: &DomainSnapshot,
    cap: usize,
) -> Result<Tensor, ContractViolation> {
    let results = &s.survey.results;
    if results.len() > cap {
        log::warn!(
            "{} survey results exceed table capacity {cap}; dropping {}",
            results.len(),
            results.len() - cap
        );
    }
    let kept = &results[..results.len().min(cap)];

    let mut w = VecWriter::new(norms, cap * SURVEY_ROW);
    for r in kept {
        let reason = enums.exit_reason_id(&r.reason_for_exit).ok_or_else(|| {
            ContractViolation::UnknownValue {
                field: "reason_for_exit",
                value: r.reason_for_exit.clone(),
            }
        })?;
        let preference = enums.preference_id(&r.preference).ok_or_else(|| {
            ContractViolation::UnknownValue {
                field: "preference",
                value: r.preference.clone(),
            }
        })?;
        w.unit(r.happiness_at_exit);
        w.unit(r.hunger_at_exit);
        w.unit(r.thirst_at_exit);
        w.norm(Measure::RemainingEnergy, r.remaining_energy)?;
        w.norm(Measure::RemainingMoney, r.remaining_money)?;
        w.unit(r.percent_of_money_spent);
        w.norm(Measure::ReasonForExitId, reason as f64)?;
        w.norm(Measure::PreferenceId, preference as f64)?;
    }
    w.zeros((cap - kept.len()) * SURVEY_ROW);
    w.finish(&[cap, SURVEY_ROW])
}

fn park(norms: &NormalizationTable, s: &DomainSnapshot) -> Result<Tensor, ContractViolation> {
    let mut w = VecWriter::new(norms, PARK_LEN);
    w.int(Measure::Step, s.step)?;
    w.int(Measure::Horizon, s.horizon)?;
    w.int(Measure::Value, s.value)?;
    w.int(Measure::Money, s.money)?;
    w.int(Measure::Revenue, s.revenue)?;
    w.int(Measure::Expenses, s.expenses)?;
    w.signed(Measure::Profit, s.profit)?;
    w.norm(Measure::ParkRating, s.park_rating)?;
    w.norm(Measure::ResearchSpeed, f64::from(s.research_speed.level()))?;
    for topic in Subtype::ALL {
        w.flag(s.research_topics.contains(*topic));
    }
    w.int(
        Measure::ResearchOperatingCost,
        s.research_operating_cost.get().copied().unwrap_or(0),
    )?;
    for (subtype, color) in AvailableEntities::slots() {
        w.flag(s.available_entities.contains(subtype, color));
    }
    w.flag(s.new_entity_available);
    for days in [
        &s.fast_days_since_last_new_entity,
        &s.medium_days_since_last_new_entity,
        &s.slow_days_since_last_new_entity,
    ] {
        w.int(Measure::DaysSinceNewEntity, days.get().copied().unwrap_or(0))?;
    }
    w.unit(s.min_cleanliness);
    w.finish(&[PARK_LEN])
}

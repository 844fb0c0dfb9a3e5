//! Per-measure normalization rules.
//!
//! Every scalar that enters a tensor goes through exactly one
//! [`NormRule`], looked up by its [`Measure`]. The same rule is used in
//! both directions, so `denormalize(normalize(v)) == v` for any `v`
//! already rounded to the rule's [`Precision`].
//!
//! ```
//! use midway_core::CodecConfig;
//! use midway_obs::{Measure, NormalizationTable};
//!
//! let table = NormalizationTable::from_config(&CodecConfig::default()).unwrap();
//! let n = table.normalize(Measure::Money, 5000.0).unwrap();
//! assert!(n > 0.0 && n < 1.0);
//! assert_eq!(table.denormalize(Measure::Money, n), 5000.0);
//! ```

use std::fmt;

use indexmap::IndexMap;
use midway_core::{round_to, CodecConfig, ConfigError, ContractViolation, SuccessMetric};

/// How a raw value is mapped onto `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    /// `v / max`.
    Linear,
    /// `ln(1 + v) / ln(1 + max)`, for heavy-tailed quantities.
    Log,
}

/// Resolution a decoded value is snapped to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    /// Whole numbers.
    Integer,
    /// Two decimal places.
    Hundredths,
}

impl Precision {
    /// Snap `v` to this precision.
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Self::Integer => v.round(),
            Self::Hundredths => round_to(v, 2),
        }
    }
}

/// Normalization rule for one measure.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormRule {
    /// Linear or logarithmic.
    pub scale: Scale,
    /// Raw value that maps to `1.0`.
    pub max: f64,
    /// Decoded resolution.
    pub precision: Precision,
}

impl NormRule {
    /// Linear rule with integral decoding.
    pub const fn linear(max: f64) -> Self {
        Self {
            scale: Scale::Linear,
            max,
            precision: Precision::Integer,
        }
    }

    /// Log rule with integral decoding.
    pub const fn log(max: f64) -> Self {
        Self {
            scale: Scale::Log,
            max,
            precision: Precision::Integer,
        }
    }

    /// The same rule, decoding to two decimal places.
    pub const fn hundredths(mut self) -> Self {
        self.precision = Precision::Hundredths;
        self
    }

    /// Reject maxima that are non-positive, non-finite, or exactly `1.0`.
    pub fn check(&self, measure: Measure) -> Result<(), ConfigError> {
        if self.max == 1.0 {
            return Err(ConfigError::AmbiguousMax {
                measure: measure.name(),
            });
        }
        if !self.max.is_finite() || self.max <= 0.0 {
            return Err(ConfigError::InvalidMax {
                measure: measure.name(),
                max: self.max,
            });
        }
        Ok(())
    }
}

macro_rules! measures {
    ($( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?) => {
        /// A normalized quantity. Each measure owns one rule.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum Measure {
            $( $(#[$vmeta])* $variant, )+
        }

        impl Measure {
            /// Every measure in declaration order.
            pub const ALL: &'static [Measure] = &[$(Measure::$variant),+];

            /// Stable name, used in diagnostics.
            pub fn name(self) -> &'static str {
                match self {
                    $(Measure::$variant => $text,)+
                }
            }
        }
    };
}

measures! {
    // Grid attributes.
    /// Ticket or item price.
    Price => "price",
    /// Per-attraction operating cost.
    OperatingCost => "operating_cost",
    /// Per-attraction revenue.
    RevenueGenerated => "revenue_generated",
    /// Guests entertained by a ride or served by a shop.
    GuestsServed => "guests_served",
    /// Ride excitement.
    Excitement => "excitement",
    /// Ride intensity.
    Intensity => "intensity",
    /// Ride capacity.
    Capacity => "capacity",
    /// Ride operations.
    TimesOperated => "times_operated",
    /// Mean queue wait.
    AvgWaitTime => "avg_wait_time",
    /// Mean riders per operation.
    AvgGuestsPerOperation => "avg_guests_per_operation",
    /// Cost of one ride operation.
    CostPerOperation => "cost_per_operation",
    /// Shop item cost.
    ItemCost => "item_cost",
    /// Shop restocks.
    NumberOfRestocks => "number_of_restocks",
    /// Shop order size.
    OrderQuantity => "order_quantity",
    /// Shop stock.
    Inventory => "inventory",

    // Ride and shop aggregates.
    /// Number of rides.
    TotalRides => "rides.total_rides",
    /// Summed ride operating cost.
    RidesOperatingCost => "rides.total_operating_cost",
    /// Summed ride revenue.
    RidesRevenue => "rides.total_revenue_generated",
    /// Park-wide excitement.
    TotalExcitement => "rides.total_excitement",
    /// Mean ride intensity.
    AvgIntensity => "rides.avg_intensity",
    /// Summed ride capacity.
    TotalCapacity => "rides.total_capacity",
    /// Number of shops.
    TotalShops => "shops.total_shops",
    /// Summed shop revenue.
    ShopsRevenue => "shops.total_revenue_generated",
    /// Summed shop operating cost.
    ShopsOperatingCost => "shops.total_operating_cost",
    /// Entities of one subtype and color (compact layout).
    EntityCount => "entity_count",

    // Staff.
    /// A grid coordinate.
    Coordinate => "coordinate",
    /// Staff of one role and color.
    ColorCount => "staff.color_count",
    /// Salary paid to date.
    TotalSalaryPaid => "staff.total_salary_paid",
    /// Summed staff operating cost.
    StaffOperatingCost => "staff.total_operating_cost",
    /// One employee's salary.
    Salary => "employee.salary",
    /// One employee's operating cost.
    EmployeeOperatingCost => "employee.operating_cost",
    /// Tiles walked.
    TilesTraversed => "employee.tiles_traversed",
    /// Success metric selector.
    SuccessMetricId => "employee.success_metric_id",
    /// Color selector.
    SubclassId => "employee.subclass_id",
    /// Janitor metric.
    AmountCleaned => "amount_cleaned",
    /// Mechanic metric.
    RepairStepsPerformed => "repair_steps_performed",
    /// Specialist metric.
    GuestsEntertained => "guests_entertained",
    /// Specialist metric.
    ItemsRestocked => "items_restocked",
    /// Specialist metric.
    GuestsInformed => "guests_informed",
    /// Specialist metric.
    MetricGuestsServed => "success_metric.guests_served",

    // Guests and survey.
    /// Guests in the park.
    TotalGuests => "guests.total_guests",
    /// Any of the per-guest averages.
    GuestAverage => "guests.average",
    /// Survey age in days.
    SurveyAge => "survey.age_of_results",
    /// Energy left at exit.
    RemainingEnergy => "survey.remaining_energy",
    /// Money left at exit.
    RemainingMoney => "survey.remaining_money",
    /// Exit reason selector.
    ReasonForExitId => "survey.reason_for_exit_id",
    /// Preference selector.
    PreferenceId => "survey.preference_id",

    // Park.
    /// Current step.
    Step => "park.step",
    /// Episode horizon.
    Horizon => "park.horizon",
    /// Park value.
    Value => "park.value",
    /// Cash on hand.
    Money => "park.money",
    /// Revenue.
    Revenue => "park.revenue",
    /// Expenses.
    Expenses => "park.expenses",
    /// Profit magnitude.
    Profit => "park.profit",
    /// Park rating.
    ParkRating => "park.park_rating",
    /// Research speed level.
    ResearchSpeed => "park.research_speed",
    /// Research spend.
    ResearchOperatingCost => "park.research_operating_cost",
    /// Any days-since-new-entity counter.
    DaysSinceNewEntity => "park.days_since_last_new_entity",
}

impl Measure {
    /// The measure that scales a staff success metric.
    pub fn for_metric(metric: SuccessMetric) -> Self {
        match metric {
            SuccessMetric::AmountCleaned => Self::AmountCleaned,
            SuccessMetric::RepairStepsPerformed => Self::RepairStepsPerformed,
            SuccessMetric::GuestsEntertained => Self::GuestsEntertained,
            SuccessMetric::ItemsRestocked => Self::ItemsRestocked,
            SuccessMetric::GuestsInformed => Self::GuestsInformed,
            SuccessMetric::GuestsServed => Self::MetricGuestsServed,
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable rule table, one [`NormRule`] per [`Measure`].
#[derive(Clone, Debug)]
pub struct NormalizationTable {
    rules: IndexMap<Measure, NormRule>,
}

impl NormalizationTable {
    /// Build the table for `config`.
    ///
    /// Price, item cost, capacity, coordinate, step and survey id rules
    /// derive their maxima from the configuration; the rest are fixed.
    /// Fails if any derived maximum is invalid or exactly `1.0`.
    pub fn from_config(config: &CodecConfig) -> Result<Self, ConfigError> {
        let steps = f64::from(config.max_steps);
        let table_max = |len: usize| len.saturating_sub(1) as f64;
        let mut rules = IndexMap::with_capacity(Measure::ALL.len());
        for &m in Measure::ALL {
            let rule = match m {
                Measure::Price => NormRule::linear(f64::from(config.prices.highest_price())),
                Measure::OperatingCost => NormRule::log(1e5),
                Measure::RevenueGenerated => NormRule::log(1e6),
                Measure::GuestsServed => NormRule::log(1000.0),
                Measure::Excitement | Measure::Intensity => NormRule::linear(10.0),
                Measure::Capacity => NormRule::linear(f64::from(config.max_capacity)),
                Measure::TimesOperated => NormRule::log(500.0),
                Measure::AvgWaitTime | Measure::AvgGuestsPerOperation => {
                    NormRule::linear(50.0).hundredths()
                }
                Measure::CostPerOperation => NormRule::log(1e4),
                Measure::ItemCost => {
                    NormRule::linear(f64::from(config.prices.highest_item_cost()))
                }
                Measure::NumberOfRestocks => NormRule::linear(100.0),
                Measure::OrderQuantity => NormRule::linear(2500.0),
                Measure::Inventory => NormRule::linear(500.0),

                Measure::TotalRides | Measure::TotalShops => NormRule::linear(250.0),
                Measure::RidesOperatingCost | Measure::ShopsOperatingCost => NormRule::log(1e5),
                Measure::RidesRevenue | Measure::ShopsRevenue => NormRule::log(1e6),
                Measure::TotalExcitement => NormRule::log(60.0).hundredths(),
                Measure::AvgIntensity => NormRule::linear(10.0).hundredths(),
                Measure::TotalCapacity => NormRule::linear(100.0),
                Measure::EntityCount => NormRule::linear(50.0),

                Measure::Coordinate => NormRule::linear(f64::from(config.park_size)),
                Measure::ColorCount => NormRule::linear(10.0),
                Measure::TotalSalaryPaid => NormRule::log(15000.0),
                Measure::StaffOperatingCost => NormRule::log(5e4),
                Measure::Salary | Measure::EmployeeOperatingCost => NormRule::log(5000.0),
                Measure::TilesTraversed => NormRule::log(1000.0),
                Measure::SuccessMetricId => NormRule::linear(SuccessMetric::ALL.len() as f64),
                Measure::SubclassId => NormRule::linear(4.0),
                Measure::AmountCleaned => NormRule::log(175.0).hundredths(),
                Measure::ItemsRestocked => NormRule::log(1250.0).hundredths(),
                Measure::RepairStepsPerformed
                | Measure::GuestsEntertained
                | Measure::GuestsInformed
                | Measure::MetricGuestsServed => NormRule::log(25000.0).hundredths(),

                Measure::TotalGuests => NormRule::log(2500.0),
                Measure::GuestAverage
                | Measure::RemainingEnergy
                | Measure::RemainingMoney => NormRule::linear(250.0).hundredths(),
                Measure::SurveyAge | Measure::Step | Measure::Horizon => NormRule::linear(steps),
                Measure::DaysSinceNewEntity => NormRule::linear(steps),
                Measure::ReasonForExitId => {
                    NormRule::linear(table_max(config.guest_enums.exit_reasons.len()))
                }
                Measure::PreferenceId => {
                    NormRule::linear(table_max(config.guest_enums.preferences.len()))
                }

                Measure::Value | Measure::Money => NormRule::log(1e7),
                Measure::Revenue | Measure::Expenses | Measure::Profit => NormRule::log(1e6),
                Measure::ParkRating => NormRule::linear(100.0).hundredths(),
                Measure::ResearchSpeed => NormRule::linear(4.0),
                Measure::ResearchOperatingCost => NormRule::log(1e5),
            };
            rule.check(m)?;
            rules.insert(m, rule);
        }
        Ok(Self { rules })
    }

    /// Replace one rule, validating it first.
    pub fn with_rule(mut self, measure: Measure, rule: NormRule) -> Result<Self, ConfigError> {
        rule.check(measure)?;
        self.rules.insert(measure, rule);
        Ok(self)
    }

    /// The rule for `measure`.
    pub fn rule(&self, measure: Measure) -> NormRule {
        // Every measure is inserted by `from_config`.
        self.rules[&measure]
    }

    /// Iterate rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Measure, &NormRule)> + '_ {
        self.rules.iter().map(|(m, r)| (*m, r))
    }

    /// Map a raw value onto the rule's scale.
    ///
    /// The value is rounded to two places first. Log rules reject values
    /// at or below `-1`, where `ln(1 + v)` is undefined.
    pub fn normalize(&self, measure: Measure, value: f64) -> Result<f64, ContractViolation> {
        let rule = self.rule(measure);
        let v = round_to(value, 2);
        if !v.is_finite() {
            return Err(ContractViolation::OutOfDomain {
                measure: measure.name(),
                value,
            });
        }
        match rule.scale {
            Scale::Linear => Ok(v / rule.max),
            Scale::Log => {
                if v <= -1.0 {
                    return Err(ContractViolation::OutOfDomain {
                        measure: measure.name(),
                        value,
                    });
                }
                Ok(v.ln_1p() / rule.max.ln_1p())
            }
        }
    }

    /// Invert [`normalize`](Self::normalize), snapping to the rule's precision.
    pub fn denormalize(&self, measure: Measure, normalized: f64) -> f64 {
        let rule = self.rule(measure);
        let raw = match rule.scale {
            Scale::Linear => normalized * rule.max,
            Scale::Log => (normalized * rule.max.ln_1p()).exp_m1(),
        };
        rule.precision.apply(raw)
    }

    /// [`denormalize`](Self::denormalize) for integral measures.
    pub fn denormalize_int(&self, measure: Measure, normalized: f64) -> i64 {
        self.denormalize(measure, normalized).round() as i64
    }
}

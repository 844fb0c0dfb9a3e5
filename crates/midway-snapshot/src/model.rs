//! The filtered, typed park snapshot.
//!
//! A [`DomainSnapshot`] is built once per tick under a fixed
//! [`ViewContext`] and never mutated afterwards. Fields the context may
//! not see hold [`Field::Absent`]. Itemized lists are kept in canonical
//! order (rides, shops and terrain by `(x, y)`, staff by role then
//! position) and continuous values are already rounded, so two snapshots
//! of the same state compare equal.

use midway_core::visibility::{collect_schema_fields, field_path};
use midway_core::{
    AvailableEntities, Color, ContractViolation, Field, FieldRequirement as Req, FieldSpec, Record,
    ResearchSpeed, RideKind, ShopKind, StaffRole, SuccessMetric, TopicSet, ViewContext,
};

/// Staff head counts per color, indexed by [`Color::index`].
pub type ColorCounts = [u32; 4];

/// A bounds-checked grid position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
}

impl Coord {
    /// Build a coordinate.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Bounds-check a raw coordinate against the edge of a `size`-wide park.
    pub fn checked(
        what: &'static str,
        x: i64,
        y: i64,
        size: u32,
    ) -> Result<Self, ContractViolation> {
        let inside = |v: i64| v >= 0 && v < i64::from(size);
        if inside(x) && inside(y) {
            // Both values are in [0, size), so they fit in u32.
            Ok(Self::new(x as u32, y as u32))
        } else {
            Err(ContractViolation::OutOfBounds { what, x, y, size })
        }
    }
}

// ── Guests ─────────────────────────────────────────────────────────

/// Guest aggregates.
#[derive(Clone, Debug, PartialEq)]
pub struct GuestStats {
    /// Guests in the park.
    pub total_guests: i64,
    /// Mean money spent.
    pub avg_money_spent: f64,
    /// Mean time in park, in steps.
    pub avg_time_in_park: f64,
    /// Mean rides visited.
    pub avg_rides_visited: f64,
    /// Mean food shops visited.
    pub avg_food_shops_visited: f64,
    /// Mean drink shops visited.
    pub avg_drink_shops_visited: f64,
    /// Mean specialty shops visited.
    pub avg_specialty_shops_visited: f64,
    /// Mean happiness. Oracle only.
    pub avg_happiness: Field<f64>,
    /// Mean hunger. Oracle only.
    pub avg_hunger: Field<f64>,
    /// Mean thirst. Oracle only.
    pub avg_thirst: Field<f64>,
}

impl Record for GuestStats {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("total_guests", Req::ALWAYS),
        FieldSpec::new("avg_money_spent", Req::ALWAYS),
        FieldSpec::new("avg_time_in_park", Req::ALWAYS),
        FieldSpec::new("avg_rides_visited", Req::ALWAYS),
        FieldSpec::new("avg_food_shops_visited", Req::ALWAYS),
        FieldSpec::new("avg_drink_shops_visited", Req::ALWAYS),
        FieldSpec::new("avg_specialty_shops_visited", Req::ALWAYS),
        FieldSpec::new("avg_happiness", Req::ORACLE),
        FieldSpec::new("avg_hunger", Req::ORACLE),
        FieldSpec::new("avg_thirst", Req::ORACLE),
    ];

    fn is_present(&self, name: &str) -> bool {
        match name {
            "avg_happiness" => self.avg_happiness.is_present(),
            "avg_hunger" => self.avg_hunger.is_present(),
            "avg_thirst" => self.avg_thirst.is_present(),
            _ => true,
        }
    }
}

/// One surveyed guest.
#[derive(Clone, Debug, PartialEq)]
pub struct SurveyResult {
    /// Happiness when leaving, in `[0, 1]`.
    pub happiness_at_exit: f64,
    /// Hunger when leaving, in `[0, 1]`.
    pub hunger_at_exit: f64,
    /// Thirst when leaving, in `[0, 1]`.
    pub thirst_at_exit: f64,
    /// Energy left.
    pub remaining_energy: f64,
    /// Money left.
    pub remaining_money: f64,
    /// Share of starting money spent, in `[0, 1]`.
    pub percent_of_money_spent: f64,
    /// Exit reason description.
    pub reason_for_exit: String,
    /// Preference description.
    pub preference: String,
}

/// The latest guest survey.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurveyResults {
    /// Days since the survey ran.
    pub age_of_results: i64,
    /// Surveyed guests, in server order.
    pub results: Vec<SurveyResult>,
}

// ── Attractions ────────────────────────────────────────────────────

/// A ride. Field names follow the raw snapshot.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct Ride {
    pub subtype: RideKind,
    pub subclass: Color,
    pub position: Coord,
    pub out_of_service: bool,
    pub uptime: f64,
    pub cleanliness: f64,
    pub ticket_price: i64,
    pub operating_cost: i64,
    pub revenue_generated: i64,
    pub capacity: i64,
    pub intensity: i64,
    pub excitement: i64,
    pub guests_entertained: i64,
    pub times_operated: i64,
    pub cost_per_operation: i64,
    pub avg_wait_time: f64,
    pub avg_guests_per_operation: f64,
    /// Rounded to three places.
    pub breakdown_rate: f64,
}

/// Ride aggregates plus the itemized list.
#[derive(Clone, Debug, PartialEq)]
pub struct Rides {
    /// Number of rides.
    pub total_rides: i64,
    /// Lowest uptime; `1.0` with no rides.
    pub min_uptime: f64,
    /// Summed operating cost.
    pub total_operating_cost: i64,
    /// Summed revenue.
    pub total_revenue_generated: i64,
    /// Park-wide excitement.
    pub total_excitement: f64,
    /// Mean intensity.
    pub avg_intensity: f64,
    /// Summed capacity.
    pub total_capacity: i64,
    /// Every ride by position. Detailed only.
    pub ride_list: Field<Vec<Ride>>,
}

impl Record for Rides {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("total_rides", Req::ALWAYS),
        FieldSpec::new("min_uptime", Req::ALWAYS),
        FieldSpec::new("total_operating_cost", Req::ALWAYS),
        FieldSpec::new("total_revenue_generated", Req::ALWAYS),
        FieldSpec::new("total_excitement", Req::ALWAYS),
        FieldSpec::new("avg_intensity", Req::ALWAYS),
        FieldSpec::new("total_capacity", Req::ALWAYS),
        FieldSpec::new("ride_list", Req::DETAILED),
    ];

    fn is_present(&self, name: &str) -> bool {
        name != "ride_list" || self.ride_list.is_present()
    }
}

/// A shop. Field names follow the raw snapshot.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct Shop {
    pub subtype: ShopKind,
    pub subclass: Color,
    pub position: Coord,
    pub item_price: i64,
    pub item_cost: i64,
    pub operating_cost: i64,
    pub uptime: f64,
    pub number_of_restocks: i64,
    pub order_quantity: i64,
    pub inventory: i64,
    pub revenue_generated: i64,
    pub cleanliness: f64,
    pub guests_served: i64,
    pub out_of_service: bool,
}

/// Shop aggregates plus the itemized list.
#[derive(Clone, Debug, PartialEq)]
pub struct Shops {
    /// Number of shops.
    pub total_shops: i64,
    /// Summed revenue.
    pub total_revenue_generated: i64,
    /// Summed operating cost.
    pub total_operating_cost: i64,
    /// Lowest uptime; `1.0` with no shops.
    pub min_uptime: f64,
    /// Every shop by position. Detailed only.
    pub shop_list: Field<Vec<Shop>>,
}

impl Record for Shops {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("total_shops", Req::ALWAYS),
        FieldSpec::new("total_revenue_generated", Req::ALWAYS),
        FieldSpec::new("total_operating_cost", Req::ALWAYS),
        FieldSpec::new("min_uptime", Req::ALWAYS),
        FieldSpec::new("shop_list", Req::DETAILED),
    ];

    fn is_present(&self, name: &str) -> bool {
        name != "shop_list" || self.shop_list.is_present()
    }
}

// ── Staff ──────────────────────────────────────────────────────────

/// A staff member. `role` is the raw `subtype`.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub struct Employee {
    pub role: StaffRole,
    pub subclass: Color,
    pub position: Coord,
    pub salary: i64,
    pub operating_cost: i64,
    pub success_metric: SuccessMetric,
    pub success_metric_value: f64,
    pub tiles_traversed: i64,
}

/// Staff aggregates plus the roster.
#[derive(Clone, Debug, PartialEq)]
pub struct Staff {
    /// Janitors per color.
    pub janitors: ColorCounts,
    /// Mechanics per color.
    pub mechanics: ColorCounts,
    /// Specialists per color.
    pub specialists: ColorCounts,
    /// Salary paid to date.
    pub total_salary_paid: i64,
    /// Summed operating cost.
    pub total_operating_cost: i64,
    /// Every staff member by role, then position. Detailed only.
    pub staff_list: Field<Vec<Employee>>,
}

impl Staff {
    /// Head counts for one role.
    pub fn counts(&self, role: StaffRole) -> &ColorCounts {
        match role {
            StaffRole::Janitor => &self.janitors,
            StaffRole::Mechanic => &self.mechanics,
            StaffRole::Specialist => &self.specialists,
        }
    }

    /// Mutable head counts for one role.
    pub fn counts_mut(&mut self, role: StaffRole) -> &mut ColorCounts {
        match role {
            StaffRole::Janitor => &mut self.janitors,
            StaffRole::Mechanic => &mut self.mechanics,
            StaffRole::Specialist => &mut self.specialists,
        }
    }

    /// Total head count for one role.
    pub fn headcount(&self, role: StaffRole) -> u32 {
        self.counts(role).iter().sum()
    }
}

impl Record for Staff {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("janitors", Req::ALWAYS),
        FieldSpec::new("mechanics", Req::ALWAYS),
        FieldSpec::new("specialists", Req::ALWAYS),
        FieldSpec::new("total_salary_paid", Req::ALWAYS),
        FieldSpec::new("total_operating_cost", Req::ALWAYS),
        FieldSpec::new("staff_list", Req::DETAILED),
    ];

    fn is_present(&self, name: &str) -> bool {
        name != "staff_list" || self.staff_list.is_present()
    }
}

// ── Terrain ────────────────────────────────────────────────────────

/// A path tile.
#[derive(Clone, Debug, PartialEq)]
pub struct PathTile {
    /// Position.
    pub position: Coord,
    /// Cleanliness in `[0, 1]`.
    pub cleanliness: f64,
}

/// A water tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaterTile {
    /// Position.
    pub position: Coord,
}

// ── DomainSnapshot ─────────────────────────────────────────────────

/// One tick of park state, filtered for a view context.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainSnapshot {
    /// Context the snapshot was built under.
    pub context: ViewContext,
    /// Server park identifier. Not carried through tensors.
    pub park_id: Option<String>,
    /// Current step.
    pub step: i64,
    /// Episode horizon.
    pub horizon: i64,
    /// Park value.
    pub value: i64,
    /// Cash on hand.
    pub money: i64,
    /// Revenue this step.
    pub revenue: i64,
    /// Expenses this step.
    pub expenses: i64,
    /// `revenue - expenses`.
    pub profit: i64,
    /// Park rating, two places.
    pub park_rating: f64,
    /// Guest aggregates.
    pub guests: GuestStats,
    /// Latest survey.
    pub survey: SurveyResults,
    /// Rides.
    pub rides: Rides,
    /// Shops.
    pub shops: Shops,
    /// Staff.
    pub staff: Staff,
    /// Research speed.
    pub research_speed: ResearchSpeed,
    /// Topics being researched.
    pub research_topics: TopicSet,
    /// Research spend. Detailed only.
    pub research_operating_cost: Field<i64>,
    /// Buildable (subtype, color) pairs.
    pub available_entities: AvailableEntities,
    /// Days since fast research last produced an entity. Detailed only.
    pub fast_days_since_last_new_entity: Field<i64>,
    /// Days since medium research last produced an entity. Detailed only.
    pub medium_days_since_last_new_entity: Field<i64>,
    /// Days since slow research last produced an entity. Detailed only.
    pub slow_days_since_last_new_entity: Field<i64>,
    /// Whether research unlocked something new.
    pub new_entity_available: bool,
    /// Park entrance.
    pub entrance: Coord,
    /// Park exit.
    pub exit: Coord,
    /// Path tiles. Detailed only.
    pub paths: Field<Vec<PathTile>>,
    /// Water tiles. Detailed only.
    pub waters: Field<Vec<WaterTile>>,
    /// Lowest cleanliness over rides, shops and paths; `1.0` with none.
    pub min_cleanliness: f64,
}

impl Record for DomainSnapshot {
    const SCHEMA: &'static [FieldSpec] = &[
        FieldSpec::new("park_id", Req::ALWAYS),
        FieldSpec::new("step", Req::ALWAYS),
        FieldSpec::new("horizon", Req::ALWAYS),
        FieldSpec::new("value", Req::ALWAYS),
        FieldSpec::new("money", Req::ALWAYS),
        FieldSpec::new("revenue", Req::ALWAYS),
        FieldSpec::new("expenses", Req::ALWAYS),
        FieldSpec::new("profit", Req::ALWAYS),
        FieldSpec::new("park_rating", Req::ALWAYS),
        FieldSpec::new("guests", Req::ALWAYS),
        FieldSpec::new("survey", Req::ALWAYS),
        FieldSpec::new("rides", Req::ALWAYS),
        FieldSpec::new("shops", Req::ALWAYS),
        FieldSpec::new("staff", Req::ALWAYS),
        FieldSpec::new("research_speed", Req::ALWAYS),
        FieldSpec::new("research_topics", Req::ALWAYS),
        FieldSpec::new("research_operating_cost", Req::DETAILED),
        FieldSpec::new("available_entities", Req::ALWAYS),
        FieldSpec::new("fast_days_since_last_new_entity", Req::DETAILED),
        FieldSpec::new("medium_days_since_last_new_entity", Req::DETAILED),
        FieldSpec::new("slow_days_since_last_new_entity", Req::DETAILED),
        FieldSpec::new("new_entity_available", Req::ALWAYS),
        FieldSpec::new("entrance", Req::ALWAYS),
        FieldSpec::new("exit", Req::ALWAYS),
        FieldSpec::new("paths", Req::DETAILED),
        FieldSpec::new("waters", Req::DETAILED),
        FieldSpec::new("min_cleanliness", Req::ALWAYS),
    ];

    fn is_present(&self, name: &str) -> bool {
        match name {
            "research_operating_cost" => self.research_operating_cost.is_present(),
            "fast_days_since_last_new_entity" => self.fast_days_since_last_new_entity.is_present(),
            "medium_days_since_last_new_entity" => {
                self.medium_days_since_last_new_entity.is_present()
            }
            "slow_days_since_last_new_entity" => self.slow_days_since_last_new_entity.is_present(),
            "paths" => self.paths.is_present(),
            "waters" => self.waters.is_present(),
            _ => true,
        }
    }

    fn collect_present(&self, prefix: &str, out: &mut Vec<String>) {
        collect_schema_fields(self, prefix, out);
        self.guests.collect_present(&field_path(prefix, "guests"), out);
        self.rides.collect_present(&field_path(prefix, "rides"), out);
        self.shops.collect_present(&field_path(prefix, "shops"), out);
        self.staff.collect_present(&field_path(prefix, "staff"), out);
    }
}

impl DomainSnapshot {
    /// The context this snapshot was built under.
    pub fn context(&self) -> ViewContext {
        self.context
    }

    /// Itemized rides, empty when hidden.
    pub fn ride_list(&self) -> &[Ride] {
        self.rides.ride_list.get().map_or(&[], Vec::as_slice)
    }

    /// Itemized shops, empty when hidden.
    pub fn shop_list(&self) -> &[Shop] {
        self.shops.shop_list.get().map_or(&[], Vec::as_slice)
    }

    /// Staff roster, empty when hidden.
    pub fn staff_list(&self) -> &[Employee] {
        self.staff.staff_list.get().map_or(&[], Vec::as_slice)
    }

    /// Path tiles, empty when hidden.
    pub fn path_list(&self) -> &[PathTile] {
        self.paths.get().map_or(&[], Vec::as_slice)
    }

    /// Water tiles, empty when hidden.
    pub fn water_list(&self) -> &[WaterTile] {
        self.waters.get().map_or(&[], Vec::as_slice)
    }
}

//! The raw snapshot as the simulation server reports it.
//!
//! These structs mirror the server's JSON one-to-one. Every key listed
//! here is required unless it carries `#[serde(default)]`; a missing key
//! fails deserialization, which surfaces as
//! [`ContractViolation::MalformedSnapshot`](midway_core::ContractViolation).
//! Keys the codec does not use are ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use midway_core::{Color, RideKind, ShopKind, StaffRole, SuccessMetric};

/// One tick of server state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    /// Park entrance.
    pub entrance: RawCoord,
    /// Park exit.
    pub exit: RawCoord,
    /// Guest aggregates.
    #[serde(rename = "guestStats")]
    pub guest_stats: RawGuestStats,
    /// Most recent survey.
    pub guest_survey_results: RawSurvey,
    /// Every ride.
    pub rides: Vec<RawRide>,
    /// Every shop.
    pub shops: Vec<RawShop>,
    /// Every staff member.
    pub staff: Vec<RawEmployee>,
    /// Path and water tiles.
    pub terrain: Vec<RawTerrain>,
    /// Park-level scalars and research state.
    pub state: RawParkState,
}

/// A grid position as reported, before bounds checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCoord {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

/// Guest aggregates for the current day.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawGuestStats {
    /// Guests in the park.
    pub total_guests: i64,
    /// Mean money spent per guest.
    pub avg_money_spent: f64,
    /// Mean steps a guest has spent in the park.
    #[serde(rename = "avg_steps_taken")]
    pub avg_time_in_park: f64,
    /// Mean rides visited.
    pub avg_rides_visited: f64,
    /// Mean food shops visited.
    pub avg_food_shops_visited: f64,
    /// Mean drink shops visited.
    pub avg_drink_shops_visited: f64,
    /// Mean specialty shops visited.
    pub avg_specialty_shops_visited: f64,
    /// Mean happiness (ground truth).
    pub avg_happiness: f64,
    /// Mean hunger (ground truth).
    pub avg_hunger: f64,
    /// Mean thirst (ground truth).
    pub avg_thirst: f64,
}

/// Survey block.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawSurvey {
    /// Days since the survey ran.
    pub age_of_results: i64,
    /// One entry per surveyed guest.
    pub list_of_results: Vec<RawSurveyResult>,
}

/// One surveyed guest, with categorical fields still as ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RawSurveyResult {
    pub happiness_at_exit: f64,
    pub hunger_at_exit: f64,
    pub thirst_at_exit: f64,
    pub remaining_energy: f64,
    pub remaining_money: f64,
    pub percent_of_money_spent: f64,
    pub reason_for_exit_id: i64,
    pub preference_id: i64,
}

/// A ride as reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RawRide {
    pub subtype: RideKind,
    pub subclass: Color,
    pub x: i64,
    pub y: i64,
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
    pub breakdown_rate: f64,
}

/// A shop as reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RawShop {
    pub subtype: ShopKind,
    pub subclass: Color,
    pub x: i64,
    pub y: i64,
    pub item_price: i64,
    pub item_cost: i64,
    pub operating_cost: i64,
    pub uptime: f64,
    /// Older servers omit this counter.
    #[serde(default)]
    pub number_of_restocks: i64,
    pub order_quantity: i64,
    pub inventory: i64,
    pub revenue_generated: i64,
    pub cleanliness: f64,
    pub guests_served: i64,
    pub out_of_service: bool,
}

/// A staff member as reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RawEmployee {
    pub subtype: StaffRole,
    pub subclass: Color,
    pub x: i64,
    pub y: i64,
    pub salary: i64,
    pub operating_cost: i64,
    pub success_metric: SuccessMetric,
    pub success_metric_value: f64,
    pub tiles_traversed: i64,
}

/// A terrain tile, tagged by its `type` key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawTerrain {
    /// Walkable path.
    Path {
        /// Column.
        x: i64,
        /// Row.
        y: i64,
        /// Path cleanliness in `[0, 1]`.
        cleanliness: f64,
    },
    /// Water tile.
    Water {
        /// Column.
        x: i64,
        /// Row.
        y: i64,
    },
    /// Any other tile type; ignored.
    #[serde(other)]
    Other,
}

/// Park-level scalars and research state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct RawParkState {
    /// Server-side park identifier.
    #[serde(rename = "parkId", default)]
    pub park_id: Option<String>,
    pub step: i64,
    pub horizon: i64,
    pub value: i64,
    pub money: i64,
    pub revenue: i64,
    pub expenses: i64,
    pub park_excitement: f64,
    pub park_rating: f64,
    /// Kept as text; unknown speeds read as `none`.
    pub research_speed: String,
    pub research_topics: Vec<String>,
    pub research_operating_cost: i64,
    /// `{subtype: [color, ...]}`.
    pub available_entities: IndexMap<String, Vec<String>>,
    pub new_entity_available: bool,
    pub fast_days_since_last_new_entity: i64,
    pub medium_days_since_last_new_entity: i64,
    pub slow_days_since_last_new_entity: i64,
    pub total_salary_paid: i64,
}

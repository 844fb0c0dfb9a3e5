//! Test utilities for Midway development.
//!
//! [`RawSnapshotBuilder`] assembles server-shaped JSON snapshots with
//! sensible defaults so each test only spells out what it cares about.
//! The [`fixtures`] module holds complete canned parks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use serde_json::{json, Map, Value};

pub use fixtures::{complex_park, empty_park};

/// Builder for raw server snapshots.
///
/// Starts from an empty 20x20 park with the entrance at `(0, 0)` and the
/// exit at `(19, 19)`.
#[derive(Clone, Debug)]
pub struct RawSnapshotBuilder {
    root: Value,
}

impl RawSnapshotBuilder {
    pub fn new() -> Self {
        let root = json!({
            "entrance": {"x": 0, "y": 0},
            "exit": {"x": 19, "y": 19},
            "guestStats": {
                "total_guests": 0,
                "avg_money_spent": 0.0,
                "avg_steps_taken": 0.0,
                "avg_rides_visited": 0.0,
                "avg_food_shops_visited": 0.0,
                "avg_drink_shops_visited": 0.0,
                "avg_specialty_shops_visited": 0.0,
                "avg_happiness": 0.0,
                "avg_hunger": 0.0,
                "avg_thirst": 0.0
            },
            "guest_survey_results": {"age_of_results": 0, "list_of_results": []},
            "rides": [],
            "shops": [],
            "staff": [],
            "terrain": [],
            "state": {
                "parkId": "test",
                "step": 0,
                "horizon": 250,
                "value": 0,
                "money": 5000,
                "revenue": 0,
                "expenses": 0,
                "park_excitement": 0,
                "park_rating": 0.0,
                "research_speed": "none",
                "research_topics": [],
                "research_operating_cost": 0,
                "available_entities": {},
                "new_entity_available": false,
                "fast_days_since_last_new_entity": 0,
                "medium_days_since_last_new_entity": 0,
                "slow_days_since_last_new_entity": 0,
                "total_salary_paid": 0
            }
        });
        Self { root }
    }

    /// Wrap an existing raw snapshot for further edits.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    // ── park state ─────────────────────────────────────────────────

    pub fn state(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.root["state"][key] = value.into();
        self
    }

    pub fn step(self, step: i64) -> Self {
        self.state("step", step)
    }

    pub fn horizon(self, horizon: i64) -> Self {
        self.state("horizon", horizon)
    }

    pub fn money(self, money: i64) -> Self {
        self.state("money", money)
    }

    pub fn revenue(self, revenue: i64) -> Self {
        self.state("revenue", revenue)
    }

    pub fn expenses(self, expenses: i64) -> Self {
        self.state("expenses", expenses)
    }

    pub fn research(self, speed: &str, topics: &[&str]) -> Self {
        self.state("research_speed", speed)
            .state("research_topics", json!(topics))
    }

    pub fn available(mut self, subtype: &str, colors: &[&str]) -> Self {
        self.root["state"]["available_entities"][subtype] = json!(colors);
        self
    }

    pub fn guests(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.root["guestStats"][key] = value.into();
        self
    }

    pub fn entrance(mut self, x: i64, y: i64) -> Self {
        self.root["entrance"] = json!({"x": x, "y": y});
        self
    }

    pub fn exit(mut self, x: i64, y: i64) -> Self {
        self.root["exit"] = json!({"x": x, "y": y});
        self
    }

    // ── entities ───────────────────────────────────────────────────

    pub fn ride(self, subtype: &str, color: &str, x: i64, y: i64) -> Self {
        self.ride_with(subtype, color, x, y, |_| {})
    }

    /// Add a ride, then let `edit` override any of its keys.
    pub fn ride_with(
        mut self,
        subtype: &str,
        color: &str,
        x: i64,
        y: i64,
        edit: impl FnOnce(&mut Map<String, Value>),
    ) -> Self {
        let mut ride = fixtures::ride_json(subtype, color, x, y);
        edit(&mut ride);
        push(&mut self.root["rides"], ride);
        self
    }

    pub fn shop(self, subtype: &str, color: &str, x: i64, y: i64) -> Self {
        self.shop_with(subtype, color, x, y, |_| {})
    }

    pub fn shop_with(
        mut self,
        subtype: &str,
        color: &str,
        x: i64,
        y: i64,
        edit: impl FnOnce(&mut Map<String, Value>),
    ) -> Self {
        let mut shop = fixtures::shop_json(subtype, color, x, y);
        edit(&mut shop);
        push(&mut self.root["shops"], shop);
        self
    }

    pub fn staff(self, role: &str, color: &str, x: i64, y: i64) -> Self {
        self.staff_with(role, color, x, y, |_| {})
    }

    pub fn staff_with(
        mut self,
        role: &str,
        color: &str,
        x: i64,
        y: i64,
        edit: impl FnOnce(&mut Map<String, Value>),
    ) -> Self {
        let mut member = fixtures::staff_json(role, color, x, y);
        edit(&mut member);
        push(&mut self.root["staff"], member);
        self
    }

    pub fn path(mut self, x: i64, y: i64, cleanliness: f64) -> Self {
        push(
            &mut self.root["terrain"],
            fixtures::object(json!({"type": "path", "x": x, "y": y, "cleanliness": cleanliness})),
        );
        self
    }

    pub fn water(mut self, x: i64, y: i64) -> Self {
        push(
            &mut self.root["terrain"],
            fixtures::object(json!({"type": "water", "x": x, "y": y})),
        );
        self
    }

    pub fn survey_age(mut self, age: i64) -> Self {
        self.root["guest_survey_results"]["age_of_results"] = json!(age);
        self
    }

    /// Add one survey result with the given ids and mid-range values.
    pub fn survey_result(mut self, reason_id: i64, preference_id: i64) -> Self {
        let result = json!({
            "happiness_at_exit": 0.42,
            "hunger_at_exit": 0.31,
            "thirst_at_exit": 0.77,
            "remaining_energy": 120.5,
            "remaining_money": 33.25,
            "percent_of_money_spent": 0.6,
            "reason_for_exit_id": reason_id,
            "preference_id": preference_id
        });
        push(
            &mut self.root["guest_survey_results"]["list_of_results"],
            fixtures::object(result),
        );
        self
    }

    /// Remove a key anywhere in the document by dotted path.
    pub fn without(mut self, path: &str) -> Self {
        let mut parts: Vec<&str> = path.split('.').collect();
        let Some(last) = parts.pop() else {
            return self;
        };
        let mut node = &mut self.root;
        for p in parts {
            node = &mut node[p];
        }
        if let Some(obj) = node.as_object_mut() {
            obj.remove(last);
        }
        self
    }

    pub fn build(self) -> Value {
        self.root
    }
}

impl Default for RawSnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn push(list: &mut Value, item: Map<String, Value>) {
    if let Some(items) = list.as_array_mut() {
        items.push(Value::Object(item));
    }
}

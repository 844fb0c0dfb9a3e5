//! Canned raw snapshots and entity templates.
//!
//! - [`empty_park`]: nothing built, entrance and exit only.
//! - [`complex_park`]: a mid-episode park with a ride, two shops, three
//!   staff and a winding path network from the entrance to the exit.

use midway_core::{Color, PriceTable, ShopKind};
use serde_json::{json, Map, Value};

use crate::RawSnapshotBuilder;

/// Path tiles of the complex park as `(x, y, cleanliness)`.
#[rustfmt::skip]
pub const COMPLEX_PATHS: &[(i64, i64, f64)] = &[
    (0, 1, 1.0), (1, 0, 1.0), (1, 1, 1.0), (2, 1, 1.0), (2, 2, 1.0), (2, 3, 0.99),
    (2, 4, 1.0), (2, 5, 1.0), (3, 5, 1.0), (4, 5, 1.0), (5, 5, 1.0), (6, 5, 1.0),
    (7, 5, 1.0), (7, 8, 1.0), (7, 9, 1.0), (7, 10, 1.0), (7, 11, 1.0), (8, 5, 1.0),
    (8, 8, 1.0), (8, 11, 1.0), (9, 5, 0.99), (9, 6, 1.0), (9, 7, 1.0), (9, 8, 1.0),
    (9, 9, 1.0), (9, 10, 1.0), (9, 11, 1.0), (10, 5, 0.99), (10, 8, 1.0), (10, 11, 1.0),
    (11, 5, 1.0), (11, 8, 1.0), (11, 11, 1.0), (12, 5, 1.0), (12, 6, 1.0), (12, 8, 1.0),
    (12, 9, 1.0), (12, 10, 1.0), (12, 11, 1.0), (13, 6, 1.0), (13, 7, 0.99), (13, 8, 0.99),
    (14, 8, 0.99), (15, 8, 0.99), (16, 8, 0.99), (16, 9, 0.99), (16, 10, 0.99), (16, 11, 0.99),
    (16, 12, 0.98), (16, 13, 0.98), (16, 14, 0.99), (16, 15, 0.98), (17, 15, 0.98),
    (17, 16, 0.98), (18, 16, 0.98), (18, 17, 0.97), (18, 18, 0.98), (18, 19, 1.0),
    (19, 18, 0.97),
];

/// A park with nothing built.
pub fn empty_park() -> Value {
    RawSnapshotBuilder::new().build()
}

/// A mid-episode park on day 17 of 50.
pub fn complex_park() -> Value {
    let prices = PriceTable::default();
    let mut b = RawSnapshotBuilder::new()
        .step(17)
        .horizon(50)
        .money(2041)
        .revenue(466)
        .expenses(161)
        .state("value", 3000)
        .state("parkId", "17")
        .state("park_excitement", 1)
        .state("park_rating", 57.25285284844752)
        .state("total_salary_paid", 80)
        .research(
            "none",
            &[
                "carousel",
                "drink",
                "ferris_wheel",
                "food",
                "janitor",
                "mechanic",
                "roller_coaster",
                "specialist",
                "specialty",
            ],
        )
        .guests("total_guests", 31)
        .guests("avg_money_spent", 15.03)
        .guests("avg_steps_taken", 71.55)
        .guests("avg_happiness", 0.51)
        .guests("avg_hunger", 1)
        .guests("avg_thirst", 1)
        .survey_age(7)
        .ride_with("carousel", "yellow", 1, 2, |r| {
            set(r, "avg_wait_time", json!(4));
            set(r, "breakdown_rate", json!(0.001));
            set(r, "avg_guests_per_operation", json!(0.83));
            set(r, "capacity", json!(6));
            set(r, "cleanliness", json!(0.96));
            set(r, "cost_per_operation", json!(1));
            set(r, "excitement", json!(1));
            set(r, "guests_entertained", json!(35));
            set(r, "intensity", json!(1));
            set(r, "operating_cost", json!(193));
            set(r, "revenue_generated", json!(700));
            set(r, "ticket_price", json!(2));
            set(r, "times_operated", json!(42));
            set(r, "uptime", json!(10));
        })
        .shop_with("specialty", "yellow", 3, 3, |s| {
            set(s, "cleanliness", json!(1));
            set(s, "guests_served", json!(3));
            set(s, "item_price", json!(15));
            set(
                s,
                "item_cost",
                json!(prices.item_cost(ShopKind::Specialty, Color::Yellow)),
            );
            set(s, "operating_cost", json!(40));
            set(s, "revenue_generated", json!(735));
            set(s, "uptime", json!(0.01));
            set(s, "inventory", json!(10));
            set(s, "order_quantity", json!(1000));
            s.remove("number_of_restocks");
        })
        .shop_with("food", "yellow", 3, 4, |s| {
            set(s, "cleanliness", json!(1));
            set(s, "guests_served", json!(21));
            set(s, "item_price", json!(6));
            set(
                s,
                "item_cost",
                json!(prices.item_cost(ShopKind::Food, Color::Yellow)),
            );
            set(s, "operating_cost", json!(20));
            set(s, "revenue_generated", json!(1374));
            set(s, "uptime", json!(0.21));
            set(s, "inventory", json!(32));
            set(s, "order_quantity", json!(33));
            s.remove("number_of_restocks");
        })
        .staff_with("janitor", "yellow", 1, 2, |e| {
            set(e, "success_metric_value", json!(0));
            set(e, "operating_cost", json!(0));
            set(e, "tiles_traversed", json!(32));
        })
        .staff_with("janitor", "blue", 2, 2, |e| {
            set(e, "success_metric_value", json!(3));
            set(e, "operating_cost", json!(3));
            set(e, "tiles_traversed", json!(0));
        })
        .staff_with("mechanic", "green", 10, 11, |e| {
            set(e, "success_metric_value", json!(0));
            set(e, "operating_cost", json!(0));
            set(e, "tiles_traversed", json!(0));
        });
    for subtype in [
        "carousel",
        "drink",
        "ferris_wheel",
        "food",
        "janitor",
        "mechanic",
        "roller_coaster",
        "specialist",
        "specialty",
    ] {
        b = b.available(subtype, &["yellow"]);
    }
    for &(x, y, c) in COMPLEX_PATHS {
        b = b.path(x, y, c);
    }
    b.build()
}

/// A ride with plausible mid-game numbers.
pub fn ride_json(subtype: &str, color: &str, x: i64, y: i64) -> Map<String, Value> {
    object(json!({
        "type": "ride",
        "subtype": subtype,
        "subclass": color,
        "x": x,
        "y": y,
        "out_of_service": false,
        "uptime": 0.95,
        "cleanliness": 0.9,
        "ticket_price": 5,
        "operating_cost": 120,
        "revenue_generated": 450,
        "capacity": 8,
        "intensity": 3,
        "excitement": 4,
        "guests_entertained": 60,
        "times_operated": 20,
        "cost_per_operation": 3,
        "avg_wait_time": 6.5,
        "avg_guests_per_operation": 3.25,
        "breakdown_rate": 0.012
    }))
}

/// A shop with plausible mid-game numbers.
pub fn shop_json(subtype: &str, color: &str, x: i64, y: i64) -> Map<String, Value> {
    object(json!({
        "type": "shop",
        "subtype": subtype,
        "subclass": color,
        "x": x,
        "y": y,
        "item_price": 4,
        "item_cost": 1,
        "operating_cost": 30,
        "uptime": 0.88,
        "number_of_restocks": 3,
        "order_quantity": 50,
        "inventory": 40,
        "revenue_generated": 220,
        "cleanliness": 0.85,
        "guests_served": 55,
        "out_of_service": false
    }))
}

/// A staff member whose success metric matches its role.
pub fn staff_json(role: &str, color: &str, x: i64, y: i64) -> Map<String, Value> {
    let metric = match role {
        "janitor" => "amount_cleaned",
        "mechanic" => "repair_steps_performed",
        _ => "guests_entertained",
    };
    object(json!({
        "type": "staff",
        "subtype": role,
        "subclass": color,
        "x": x,
        "y": y,
        "salary": 20,
        "operating_cost": 5,
        "success_metric": metric,
        "success_metric_value": 12.5,
        "tiles_traversed": 40
    }))
}

pub(crate) fn object(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

fn set(map: &mut Map<String, Value>, key: &str, value: Value) {
    map.insert(key.to_string(), value);
}

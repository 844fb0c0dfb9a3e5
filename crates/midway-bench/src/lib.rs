//! Benchmark profiles for the Midway codec.
//!
//! - [`crowded_park`]: a densely built 20x20 park
//! - [`ACTION_TEXTS`]: a mix of action invocations covering each selector

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use midway_test_utils::RawSnapshotBuilder;
use serde_json::Value;

const RIDES: [&str; 3] = ["carousel", "ferris_wheel", "roller_coaster"];
const SHOPS: [&str; 3] = ["drink", "food", "specialty"];
const ROLES: [&str; 3] = ["janitor", "mechanic", "specialist"];
const COLORS: [&str; 4] = ["yellow", "blue", "green", "red"];

/// A raw 20x20 snapshot with rows of paths, rides, shops and water.
///
/// Rows 1 to 18 cycle path, ride, shop, water, joined by a path along
/// the first column. Every fifth column and the entrance and exit rows
/// stay clear. `staff` members of each role stand on the paths.
pub fn crowded_park(staff: usize) -> Value {
    let mut b = RawSnapshotBuilder::new()
        .step(120)
        .horizon(250)
        .money(48_000)
        .revenue(3_200)
        .expenses(2_750)
        .guests("total_guests", 140);
    for y in 1..19i64 {
        for x in 0..20i64 {
            let i = (x + y) as usize;
            let color = COLORS[i % COLORS.len()];
            if x % 5 == 4 {
                continue;
            }
            b = match y % 4 {
                _ if x == 0 => b.path(x, y, 0.75),
                0 => b.path(x, y, 0.5 + (x as f64) / 40.0),
                1 => b.ride(RIDES[i % RIDES.len()], color, x, y),
                2 => b.shop(SHOPS[i % SHOPS.len()], color, x, y),
                _ => b.water(x, y),
            };
        }
    }
    for (r, role) in ROLES.iter().enumerate() {
        for k in 0..staff {
            b = b.staff(role, COLORS[(k + r) % COLORS.len()], (k % 20) as i64, 4);
        }
    }
    for k in 0..25 {
        b = b.survey_result(k % 3, k % 2);
    }
    b.survey_age(3).build()
}

/// Action texts with a vector form, one or more per selector.
pub const ACTION_TEXTS: &[&str] = &[
    "place(type='ride', subtype='roller_coaster', subclass='red', x=3, y=7, price=40)",
    "place(type='shop', subtype='food', subclass='blue', x=4, y=7, price=12, order_quantity=200)",
    "place(type='staff', subtype='janitor', subclass='yellow', x=0, y=0)",
    "move(type='ride', subtype='carousel', subclass='green', x=1, y=1, new_x=9, new_y=9)",
    "remove(type='shop', subtype='drink', subclass='yellow', x=2, y=2)",
    "modify(type='shop', subtype='specialty', subclass='red', x=5, y=5, price=30, order_quantity=75)",
    "set_research(research_speed='fast', research_topics=['carousel', 'food', 'specialist'])",
    "survey_guests(num_guests=20)",
    "add_path(x=10, y=11)",
    "remove_path(x=10, y=11)",
    "add_water(x=12, y=12)",
    "remove_water(x=12, y=12)",
    "wait()",
];

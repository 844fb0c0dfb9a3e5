//! Codec configuration and validation.
//!
//! [`CodecConfig`] fixes every size the tensor layout and the action
//! vectors depend on. [`validate()`](CodecConfig::validate) checks it
//! once, before any codec is built from it. A partial JSON document can
//! override the defaults through [`CodecConfig::from_json_str`].

use serde::{Deserialize, Serialize};

use crate::catalog::{Color, RideKind, ShopKind, Subtype};
use crate::error::ConfigError;
use crate::guest::GuestEnums;

// ── ObsLayout ──────────────────────────────────────────────────────

/// Which observation layout the tensor codec produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObsLayout {
    /// Spatial grid, staff and survey tables, full park vector.
    #[default]
    Full,
    /// Aggregate vectors only. Forward-only.
    Compact,
}

impl ObsLayout {
    /// Layout name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Compact => "compact",
        }
    }
}

// ── PriceTable ─────────────────────────────────────────────────────

/// Per subtype and color price limits and shop item costs.
///
/// Rows follow [`RideKind::ALL`] / [`ShopKind::ALL`], columns follow
/// [`Color::ALL`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    /// Highest ticket price a ride may charge.
    pub max_ticket_price: [[u32; 4]; 3],
    /// Highest item price a shop may charge.
    pub max_item_price: [[u32; 4]; 3],
    /// What one restocked item costs the park.
    pub item_cost: [[u32; 4]; 3],
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            max_ticket_price: [[5, 10, 15, 20], [10, 20, 30, 40], [15, 25, 35, 50]],
            max_item_price: [[5, 10, 15, 20], [10, 15, 20, 30], [15, 25, 35, 50]],
            item_cost: [[1, 2, 3, 4], [2, 4, 6, 8], [5, 10, 15, 25]],
        }
    }
}

impl PriceTable {
    /// Highest price for an attraction; `None` for staff.
    pub fn max_price(&self, subtype: Subtype, color: Color) -> Option<u32> {
        if let Some(ride) = subtype.ride() {
            Some(self.max_ticket_price[ride.index()][color.index()])
        } else {
            subtype
                .shop()
                .map(|shop| self.max_item_price[shop.index()][color.index()])
        }
    }

    /// Item cost for a shop.
    pub fn item_cost(&self, shop: ShopKind, color: Color) -> u32 {
        self.item_cost[shop.index()][color.index()]
    }

    /// Highest price anywhere in the table.
    pub fn highest_price(&self) -> u32 {
        table_max(&self.max_ticket_price).max(table_max(&self.max_item_price))
    }

    /// Highest item cost anywhere in the table.
    pub fn highest_item_cost(&self) -> u32 {
        table_max(&self.item_cost)
    }

    /// Highest ticket price of one ride kind.
    pub fn highest_ticket_price(&self, ride: RideKind) -> u32 {
        self.max_ticket_price[ride.index()]
            .iter()
            .copied()
            .max()
            .unwrap_or(0)
    }
}

fn table_max(t: &[[u32; 4]; 3]) -> u32 {
    t.iter().flatten().copied().max().unwrap_or(0)
}

// ── CodecConfig ────────────────────────────────────────────────────

/// Sizes, capacities and lookup tables shared by every codec.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Edge length of the square park grid. Default: 20.
    pub park_size: u32,
    /// Episode length used to scale step counters. Default: 250.
    pub max_steps: u32,
    /// Rows per staff archetype table. Default: 10.
    pub max_staff_per_type: usize,
    /// Rows in the survey results table. Default: 25.
    pub max_survey_results: usize,
    /// Largest ride capacity. Default: 20.
    pub max_capacity: u32,
    /// Order quantity represented by one vector slot step. Default: 25.
    pub order_quantity_step: u32,
    /// Number of order quantity slots in the action vector. Default: 100.
    pub order_quantity_slots: u32,
    /// Largest guest sample a survey may request. Default: 25.
    pub max_survey_guests: u32,
    /// Observation layout. Default: [`ObsLayout::Full`].
    pub layout: ObsLayout,
    /// Exit reason and preference tables.
    pub guest_enums: GuestEnums,
    /// Price limits and item costs.
    pub prices: PriceTable,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            park_size: 20,
            max_steps: 250,
            max_staff_per_type: 10,
            max_survey_results: 25,
            max_capacity: 20,
            order_quantity_step: 25,
            order_quantity_slots: 100,
            max_survey_guests: 25,
            layout: ObsLayout::Full,
            guest_enums: GuestEnums::default(),
            prices: PriceTable::default(),
        }
    }
}

impl CodecConfig {
    /// Parse a JSON document, filling unspecified keys with defaults,
    /// and validate the result.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, usize); 7] = [
            ("park_size", self.park_size as usize),
            ("max_steps", self.max_steps as usize),
            ("max_staff_per_type", self.max_staff_per_type),
            ("max_survey_results", self.max_survey_results),
            ("max_capacity", self.max_capacity as usize),
            ("order_quantity_step", self.order_quantity_step as usize),
            ("order_quantity_slots", self.order_quantity_slots as usize),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(ConfigError::InvalidCapacity { name, value });
            }
        }
        if self.park_size > u16::MAX as u32 {
            return Err(ConfigError::InvalidCapacity {
                name: "park_size",
                value: self.park_size as usize,
            });
        }
        if self.max_survey_guests == 0 {
            return Err(ConfigError::InvalidCapacity {
                name: "max_survey_guests",
                value: 0,
            });
        }
        if self.prices.highest_price() == 0 {
            return Err(ConfigError::InvalidCapacity {
                name: "prices.max_price",
                value: 0,
            });
        }
        if self.prices.highest_item_cost() == 0 {
            return Err(ConfigError::InvalidCapacity {
                name: "prices.item_cost",
                value: 0,
            });
        }
        self.guest_enums.validate()
    }

    /// Largest order quantity the action vector can express.
    pub fn max_order_quantity(&self) -> u32 {
        (self.order_quantity_slots - 1) * self.order_quantity_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = CodecConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.prices.highest_price(), 50);
        assert_eq!(c.prices.highest_item_cost(), 25);
        assert_eq!(c.max_order_quantity(), 2475);
    }

    #[test]
    fn price_lookup_by_subtype() {
        let p = PriceTable::default();
        assert_eq!(p.max_price(Subtype::RollerCoaster, Color::Red), Some(50));
        assert_eq!(p.max_price(Subtype::Drink, Color::Yellow), Some(5));
        assert_eq!(p.max_price(Subtype::Janitor, Color::Yellow), None);
        assert_eq!(p.item_cost(ShopKind::Specialty, Color::Yellow), 5);
    }

    #[test]
    fn zero_capacity_rejected() {
        let c = CodecConfig {
            max_staff_per_type: 0,
            ..CodecConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidCapacity {
                name: "max_staff_per_type",
                value: 0
            })
        );
    }

    #[test]
    fn json_overrides_defaults() {
        let c = CodecConfig::from_json_str(r#"{"park_size": 12, "layout": "compact"}"#).unwrap();
        assert_eq!(c.park_size, 12);
        assert_eq!(c.layout, ObsLayout::Compact);
        assert_eq!(c.max_staff_per_type, 10);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = CodecConfig::from_json_str("{\"park_size\": \"big\"}").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

//! Lookup tables for the categorical fields of guest survey results.
//!
//! The server reports exit reasons and guest preferences as integer
//! ids. The snapshot resolves them to descriptions once, at
//! construction, and the tensor codec maps descriptions back to ids.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const EXIT_REASONS: &[&str] = &[
    "No specific reason for exit",
    "Day ended",
    "Too unhappy",
    "Ran out of energy",
    "Spent all their money",
    "Too thirsty",
    "Too hungry",
    "Too few drink shops",
    "Too few food shops",
    "Too few rides",
    "Too few unique attractions",
    "Too few unique drink shops",
    "Too few unique food shops",
    "Too few unique rides",
    "Walked by the exit",
];

const PREFERENCES: &[&str] = &[
    "no preferences",
    "thrill seeker",
    "scaredy cat",
    "penny pincher",
    "big spender",
    "roller coaster addict",
    "ferris wheel junkie",
    "carousel enthusiast",
    "red colored rides",
    "blue colored rides",
    "green colored rides",
    "yellow colored rides",
    "water lover",
    "dry lander",
];

/// Id-to-description tables for exit reasons and preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestEnums {
    /// Exit reason descriptions, indexed by id.
    pub exit_reasons: Vec<String>,
    /// Preference descriptions, indexed by id.
    pub preferences: Vec<String>,
}

impl Default for GuestEnums {
    fn default() -> Self {
        Self {
            exit_reasons: EXIT_REASONS.iter().map(|s| s.to_string()).collect(),
            preferences: PREFERENCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GuestEnums {
    /// Description of an exit reason id.
    pub fn exit_reason(&self, id: i64) -> Option<&str> {
        lookup(&self.exit_reasons, id)
    }

    /// Description of a preference id.
    pub fn preference(&self, id: i64) -> Option<&str> {
        lookup(&self.preferences, id)
    }

    /// Id of an exit reason description.
    pub fn exit_reason_id(&self, description: &str) -> Option<usize> {
        self.exit_reasons.iter().position(|d| d == description)
    }

    /// Id of a preference description.
    pub fn preference_id(&self, description: &str) -> Option<usize> {
        self.preferences.iter().position(|d| d == description)
    }

    /// Reject empty tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exit_reasons.is_empty() {
            return Err(ConfigError::EmptyEnumTable {
                table: "exit_reasons",
            });
        }
        if self.preferences.is_empty() {
            return Err(ConfigError::EmptyEnumTable {
                table: "preferences",
            });
        }
        Ok(())
    }
}

fn lookup(table: &[String], id: i64) -> Option<&str> {
    usize::try_from(id)
        .ok()
        .and_then(|i| table.get(i))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_resolve_both_ways() {
        let g = GuestEnums::default();
        assert_eq!(g.exit_reason(1), Some("Day ended"));
        assert_eq!(g.exit_reason_id("Day ended"), Some(1));
        assert_eq!(g.preference(13), Some("dry lander"));
        assert_eq!(g.preference(14), None);
        assert_eq!(g.exit_reason(-1), None);
    }

    #[test]
    fn empty_tables_are_rejected() {
        let g = GuestEnums {
            exit_reasons: vec![],
            ..GuestEnums::default()
        };
        assert_eq!(
            g.validate(),
            Err(ConfigError::EmptyEnumTable {
                table: "exit_reasons"
            })
        );
    }
}

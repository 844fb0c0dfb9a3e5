//! Error types for the Midway codec.
//!
//! Three families, by who is at fault:
//!
//! - [`ConfigError`]: the codec was configured inconsistently. Fatal.
//! - [`ContractViolation`]: the data handed to the codec (a raw snapshot
//!   or a tensor bundle) breaks the agreed shape. Always surfaced.
//! - [`DecodeError`]: an agent-supplied action could not be understood.
//!   Recoverable at the call site; the codec holds no state to corrupt.

use std::error::Error;
use std::fmt;

use crate::visibility::ViewContext;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a codec from its configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A normalization rule declares a maximum of exactly `1.0`, which is
    /// indistinguishable from "already normalized".
    AmbiguousMax {
        /// Name of the offending measure.
        measure: &'static str,
    },
    /// A normalization rule declares a non-positive or non-finite maximum.
    InvalidMax {
        /// Name of the offending measure.
        measure: &'static str,
        /// The declared maximum.
        max: f64,
    },
    /// A capacity or size parameter is zero or out of range.
    InvalidCapacity {
        /// Name of the configuration parameter.
        name: &'static str,
        /// The rejected value.
        value: usize,
    },
    /// A guest enum table has no entries.
    EmptyEnumTable {
        /// Which table is empty.
        table: &'static str,
    },
    /// A snapshot was asked to reveal fields its source context hid.
    ContextWidening {
        /// Context the snapshot was built under.
        from: ViewContext,
        /// Context that was requested.
        to: ViewContext,
    },
    /// The configured observation layout cannot be decoded.
    DecodeUnsupported {
        /// Name of the layout.
        layout: &'static str,
    },
    /// A configuration document could not be parsed.
    Parse {
        /// Parser diagnostic.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousMax { measure } => write!(
                f,
                "normalization rule '{measure}' declares max 1.0, which is ambiguous with an already-normalized value"
            ),
            Self::InvalidMax { measure, max } => {
                write!(f, "normalization rule '{measure}' has invalid max {max}")
            }
            Self::InvalidCapacity { name, value } => {
                write!(f, "invalid {name}: {value}")
            }
            Self::EmptyEnumTable { table } => write!(f, "guest enum table '{table}' is empty"),
            Self::ContextWidening { from, to } => {
                write!(f, "cannot widen a snapshot built at {from} to {to}")
            }
            Self::DecodeUnsupported { layout } => {
                write!(f, "observation layout '{layout}' cannot be decoded")
            }
            Self::Parse { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl Error for ConfigError {}

// ── ContractViolation ──────────────────────────────────────────────

/// The input handed to the codec does not honor the agreed contract.
///
/// Raised for raw snapshots that are missing keys or carry unknown
/// values, and for tensor bundles whose cells or shapes cannot be
/// interpreted. Never defaulted away.
#[derive(Clone, Debug, PartialEq)]
pub enum ContractViolation {
    /// The raw snapshot failed to deserialize (missing key, wrong type).
    MalformedSnapshot {
        /// Deserializer diagnostic, including the offending path.
        detail: String,
    },
    /// A categorical value is not part of the known vocabulary.
    UnknownValue {
        /// The field carrying the value.
        field: &'static str,
        /// The rejected value, as text.
        value: String,
    },
    /// A coordinate falls outside the park grid.
    OutOfBounds {
        /// What was being placed.
        what: &'static str,
        /// X coordinate.
        x: i64,
        /// Y coordinate.
        y: i64,
        /// Park edge length.
        size: u32,
    },
    /// Two entities claim the same grid cell.
    CellConflict {
        /// X coordinate.
        x: u32,
        /// Y coordinate.
        y: u32,
        /// Category already occupying the cell.
        existing: &'static str,
        /// Category that tried to land on it.
        incoming: &'static str,
    },
    /// A grid cell has attribute data but no category flag.
    UnrecognizedCell {
        /// X coordinate.
        x: u32,
        /// Y coordinate.
        y: u32,
    },
    /// The grid has no entrance or no exit.
    MissingLandmark {
        /// `"entrance"` or `"exit"`.
        which: &'static str,
    },
    /// A tensor the layout requires is not in the bundle.
    MissingTensor {
        /// Tensor name.
        name: String,
    },
    /// A tensor has the wrong shape for the layout.
    TensorShape {
        /// Tensor name.
        name: String,
        /// Shape the layout declares.
        expected: Vec<usize>,
        /// Shape found in the bundle.
        found: Vec<usize>,
    },
    /// A serialized bundle could not be read.
    MalformedBundle {
        /// What went wrong.
        reason: String,
    },
    /// A value lies outside the domain of its normalization rule.
    OutOfDomain {
        /// Name of the measure.
        measure: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSnapshot { detail } => write!(f, "malformed raw snapshot: {detail}"),
            Self::UnknownValue { field, value } => {
                write!(f, "unknown value '{value}' for {field}")
            }
            Self::OutOfBounds { what, x, y, size } => {
                write!(f, "{what} at ({x}, {y}) is outside the {size}x{size} park")
            }
            Self::CellConflict {
                x,
                y,
                existing,
                incoming,
            } => write!(
                f,
                "cell ({x}, {y}) already holds a {existing}, cannot place a {incoming}"
            ),
            Self::UnrecognizedCell { x, y } => {
                write!(f, "cell ({x}, {y}) has attributes but no category flag")
            }
            Self::MissingLandmark { which } => write!(f, "grid has no {which}"),
            Self::MissingTensor { name } => write!(f, "bundle is missing tensor '{name}'"),
            Self::TensorShape {
                name,
                expected,
                found,
            } => write!(
                f,
                "tensor '{name}' has shape {found:?}, expected {expected:?}"
            ),
            Self::MalformedBundle { reason } => write!(f, "malformed tensor bundle: {reason}"),
            Self::OutOfDomain { measure, value } => {
                write!(f, "value {value} is outside the domain of '{measure}'")
            }
        }
    }
}

impl Error for ContractViolation {}

impl From<serde_json::Error> for ContractViolation {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedSnapshot {
            detail: e.to_string(),
        }
    }
}

// ── DecodeError ────────────────────────────────────────────────────

/// An action (text or discrete vector) failed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The text does not match the invocation grammar.
    Syntax {
        /// The offending text.
        input: String,
        /// Byte offset of the failure.
        position: usize,
        /// What the parser expected.
        reason: String,
    },
    /// The callable name is not a known action.
    UnknownAction {
        /// The offending text.
        input: String,
        /// The unrecognized name.
        name: String,
    },
    /// The keyword set differs from the action's required set.
    Arguments {
        /// The offending text.
        input: String,
        /// Action name.
        action: &'static str,
        /// Required names that were not supplied, sorted.
        missing: Vec<String>,
        /// Supplied names the action does not accept, sorted.
        extra: Vec<String>,
    },
    /// An argument has the wrong literal type.
    ArgumentType {
        /// The offending text.
        input: String,
        /// Action name.
        action: &'static str,
        /// Parameter name.
        param: String,
        /// Declared type.
        expected: &'static str,
        /// Rendered value that was supplied.
        found: String,
    },
    /// A string argument is outside its vocabulary.
    UnknownValue {
        /// The offending text.
        input: String,
        /// Parameter name.
        param: &'static str,
        /// The rejected value.
        value: String,
    },
    /// A value falls between the steps of a quantized vector slot.
    OffStep {
        /// The offending text.
        input: String,
        /// Parameter name.
        param: &'static str,
        /// The supplied value.
        value: i64,
        /// The slot's step.
        step: i64,
    },
    /// A discrete vector is malformed or out of range.
    Vector {
        /// The offending vector.
        vector: Vec<i64>,
        /// What is wrong with it.
        reason: String,
    },
    /// A heuristic could not find an entity to act on.
    NoTarget {
        /// Action name.
        action: &'static str,
        /// Why no target was found.
        reason: String,
    },
}

impl DecodeError {
    /// The offending input rendered as text, when there is one.
    pub fn input(&self) -> Option<&str> {
        match self {
            Self::Syntax { input, .. }
            | Self::UnknownAction { input, .. }
            | Self::Arguments { input, .. }
            | Self::ArgumentType { input, .. }
            | Self::UnknownValue { input, .. }
            | Self::OffStep { input, .. } => Some(input),
            Self::Vector { .. } | Self::NoTarget { .. } => None,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax {
                input,
                position,
                reason,
            } => write!(f, "syntax error at {position} in `{input}`: {reason}"),
            Self::UnknownAction { input, name } => {
                write!(f, "unknown action '{name}' in `{input}`")
            }
            Self::Arguments {
                input,
                action,
                missing,
                extra,
            } => {
                write!(f, "invalid arguments for {action} in `{input}`")?;
                if !missing.is_empty() {
                    write!(f, "; missing [{}]", missing.join(", "))?;
                }
                if !extra.is_empty() {
                    write!(f, "; unexpected [{}]", extra.join(", "))?;
                }
                Ok(())
            }
            Self::ArgumentType {
                input,
                action,
                param,
                expected,
                found,
            } => write!(
                f,
                "{action}: argument '{param}' must be {expected}, got {found} in `{input}`"
            ),
            Self::UnknownValue {
                input,
                param,
                value,
            } => write!(f, "unknown {param} '{value}' in `{input}`"),
            Self::OffStep {
                input,
                param,
                value,
                step,
            } => write!(f, "{param}={value} is not a multiple of {step} in `{input}`"),
            Self::Vector { vector, reason } => {
                write!(f, "invalid action vector {vector:?}: {reason}")
            }
            Self::NoTarget { action, reason } => write!(f, "{action}: no target ({reason})"),
        }
    }
}

impl Error for DecodeError {}

// ── ObsError ───────────────────────────────────────────────────────

/// Any failure while building, encoding or decoding an observation.
#[derive(Clone, Debug, PartialEq)]
pub enum ObsError {
    /// The codec configuration is invalid.
    Config(ConfigError),
    /// The input data breaks the contract.
    Contract(ContractViolation),
}

impl fmt::Display for ObsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "configuration error: {e}"),
            Self::Contract(e) => write!(f, "contract violation: {e}"),
        }
    }
}

impl Error for ObsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Contract(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ObsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ContractViolation> for ObsError {
    fn from(e: ContractViolation) -> Self {
        Self::Contract(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_error_lists_missing_and_extra() {
        let e = DecodeError::Arguments {
            input: "place(type='ride')".into(),
            action: "place",
            missing: vec!["subclass".into(), "x".into()],
            extra: vec!["colour".into()],
        };
        let msg = e.to_string();
        assert!(msg.contains("missing [subclass, x]"));
        assert!(msg.contains("unexpected [colour]"));
        assert_eq!(e.input(), Some("place(type='ride')"));
    }

    #[test]
    fn obs_error_exposes_source() {
        let e: ObsError = ConfigError::AmbiguousMax { measure: "price" }.into();
        assert!(e.source().is_some());
        assert!(e.to_string().contains("price"));
    }

    #[test]
    fn serde_errors_become_malformed_snapshot() {
        let err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let v: ContractViolation = err.into();
        assert!(matches!(v, ContractViolation::MalformedSnapshot { .. }));
    }
}

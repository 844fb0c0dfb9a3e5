//! Midway: the observation and action codec for theme-park management agents.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! Midway sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use midway::prelude::*;
//! use midway_test_utils::complex_park;
//!
//! let config = CodecConfig::default();
//!
//! // Server JSON → filtered snapshot → tensors.
//! let snap = DomainSnapshot::from_value(complex_park(), ViewContext::DETAILED, &config).unwrap();
//! let codec = TensorCodec::new(config.clone()).unwrap();
//! let bundle = codec.encode(&snap).unwrap();
//! assert!(bundle.get(midway::obs::names::GRID).is_some());
//!
//! // ...and back.
//! let decoded = codec.decode(&bundle, ViewContext::DETAILED).unwrap();
//! assert_eq!(decoded.money, snap.money);
//!
//! // A policy's discrete choice → action text.
//! let actions = ActionSpace::new(&config).unwrap();
//! let v = actions.from_text("add_path(x=2, y=3)").unwrap();
//! assert_eq!(actions.to_text(&v).unwrap(), "add_path(x=2, y=3)");
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `midway-core` | Catalog vocabularies, configuration, visibility, errors |
//! | [`snapshot`] | `midway-snapshot` | Raw server snapshots and the filtered domain model |
//! | [`obs`] | `midway-obs` | Tensor codec, normalization table, wire format |
//! | [`action`] | `midway-action` | Action grammar, discrete and compact action spaces |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Catalog vocabularies, configuration and visibility (`midway-core`).
///
/// The [`types::ViewContext`] presets and [`types::CodecConfig`] are also
/// in the [`prelude`].
pub use midway_core as types;

/// Raw and filtered park snapshots (`midway-snapshot`).
pub use midway_snapshot as snapshot;

/// Tensor codec (`midway-obs`).
///
/// Encode a [`snapshot::DomainSnapshot`] with [`obs::TensorCodec`], move the
/// resulting bundle with [`obs::wire`].
pub use midway_obs as obs;

/// Action grammar and action spaces (`midway-action`).
pub use midway_action as action;

/// Common imports for typical Midway usage.
///
/// ```rust
/// use midway::prelude::*;
/// ```
pub mod prelude {
    // Configuration and visibility
    pub use midway_core::{CodecConfig, Granularity, ObsLayout, Observability, ViewContext};

    // Errors
    pub use midway_core::{ConfigError, ContractViolation, DecodeError, ObsError};

    // Snapshots
    pub use midway_snapshot::{DomainSnapshot, RawSnapshot};

    // Observation
    pub use midway_obs::{NormalizationTable, Tensor, TensorBundle, TensorCodec};

    // Actions
    pub use midway_action::{Action, ActionKind, ActionSpace, CompactActionSpace};
}

//! Core types for the Midway park observation/action codec.
//!
//! This crate defines the vocabulary every other Midway crate shares:
//!
//! - [`visibility`]: view contexts, field requirements and the generic
//!   [`VisibilityMask`] applied to record schemas
//! - [`catalog`]: entity kinds, subtypes, colors and research state
//! - [`guest`]: survey id tables
//! - [`config`]: [`CodecConfig`] and its validation
//! - [`error`]: the three error families and their umbrella type
//!
//! Nothing here performs I/O or holds shared mutable state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod guest;
pub mod visibility;

pub use catalog::{
    AvailableEntities, Color, EntityKind, ResearchSpeed, RideKind, ShopKind, StaffRole,
    Subtype, SuccessMetric, TopicSet,
};
pub use config::{CodecConfig, ObsLayout, PriceTable};
pub use error::{ConfigError, ContractViolation, DecodeError, ObsError};
pub use guest::GuestEnums;
pub use visibility::{
    is_visible, Field, FieldRequirement, FieldSpec, Granularity, Observability, Record,
    ViewContext, VisibilityMask,
};

/// Round to `places` decimal places, half away from zero.
///
/// Applied to every continuous value before it is stored or
/// normalized, which bounds round-trip drift.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::round_to;

    #[test]
    fn rounding() {
        assert_eq!(round_to(0.005, 2), 0.01);
        assert_eq!(round_to(57.25285284844752, 2), 57.25);
        assert_eq!(round_to(-1.236, 2), -1.24);
        assert_eq!(round_to(0.0014, 3), 0.001);
    }
}

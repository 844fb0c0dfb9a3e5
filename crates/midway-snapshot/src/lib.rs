//! Park snapshots for the Midway codec.
//!
//! The simulation server reports each tick as a JSON document
//! ([`RawSnapshot`]). This crate turns it into a [`DomainSnapshot`]:
//! typed, aggregated, rounded, and filtered for one
//! [`ViewContext`](midway_core::ViewContext).
//!
//! ```
//! use midway_core::{CodecConfig, ViewContext};
//! use midway_snapshot::DomainSnapshot;
//! use midway_test_utils::RawSnapshotBuilder;
//!
//! let raw = RawSnapshotBuilder::new().money(5000).step(7).build();
//! let snap = DomainSnapshot::from_value(raw, ViewContext::SUMMARY, &CodecConfig::default())
//!     .unwrap();
//! assert_eq!(snap.money, 5000);
//! assert!(snap.rides.ride_list.is_absent());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod build;
pub mod model;
mod narrow;
pub mod raw;

pub use model::{
    ColorCounts, Coord, DomainSnapshot, Employee, GuestStats, PathTile, Ride, Rides, Shop, Shops,
    Staff, SurveyResult, SurveyResults, WaterTile,
};
pub use raw::RawSnapshot;

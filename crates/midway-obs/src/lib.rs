//! Tensor codec for Midway park snapshots.
//!
//! [`TensorCodec`] turns a [`DomainSnapshot`](midway_snapshot::DomainSnapshot)
//! into a [`TensorBundle`] of named, normalized `f64` tensors and, for the
//! full layout, back again. Normalization rules live in a
//! [`NormalizationTable`]; the spatial grid's channels are listed by
//! [`Channel`]. [`wire`] moves bundles to and from bytes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod channel;
pub mod codec;
mod compact;
mod decode;
mod encode;
pub mod norm;
pub mod tensor;
pub mod wire;

pub use channel::Channel;
pub use codec::{names, TensorCodec};
pub use norm::{Measure, NormRule, NormalizationTable, Precision, Scale};
pub use tensor::{Shape, Tensor, TensorBundle};

//! Action codec for Midway.
//!
//! Agents speak to the park in a small call syntax such as
//! `place(type='ride', subtype='carousel', subclass='red', x=3, y=7, price=5)`.
//! This crate parses and validates that text ([`Action`]), maps it to and
//! from fixed-width discrete vectors ([`ActionSpace`]) and completes the
//! reduced vectors of [`CompactActionSpace`] from park state.
//!
//! ```
//! use midway_action::{Action, ActionSpace};
//! use midway_core::CodecConfig;
//!
//! let space = ActionSpace::new(&CodecConfig::default()).unwrap();
//! let v = space.from_text("survey_guests(num_guests=10)").unwrap();
//! assert_eq!(v[0], 5);
//! assert_eq!(space.to_text(&v).unwrap(), "survey_guests(num_guests=10)");
//! assert!(Action::decode("survey_guests(10)").is_err());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod compact;
pub mod literal;
pub mod parse;
pub mod table;
mod validate;
pub mod vector;

pub use compact::CompactActionSpace;
pub use literal::Literal;
pub use parse::{parse, Invocation};
pub use table::{ActionKind, Param, ParamType};
pub use validate::Action;
pub use vector::ActionSpace;

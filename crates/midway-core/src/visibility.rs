//! Visibility policy: which fields a view context may see.
//!
//! Every snapshot field carries a [`FieldRequirement`]. A field is kept
//! when the active [`ViewContext`] meets both of its tiers, and is
//! replaced by [`Field::Absent`] otherwise. The context is always passed
//! explicitly; nothing here holds ambient state.
//!
//! Records describe their fields with a static schema of [`FieldSpec`]s.
//! [`VisibilityMask::compile`] turns a schema plus a context into a mask
//! that gates values by name:
//!
//! ```
//! use midway_core::{Field, FieldRequirement, FieldSpec, ViewContext, VisibilityMask};
//!
//! const SCHEMA: &[FieldSpec] = &[
//!     FieldSpec::new("money", FieldRequirement::ALWAYS),
//!     FieldSpec::new("ride_list", FieldRequirement::DETAILED),
//! ];
//!
//! let mask = VisibilityMask::compile(SCHEMA, ViewContext::SUMMARY);
//! assert_eq!(mask.gate("money", 5000), Field::Present(5000));
//! assert_eq!(mask.gate("ride_list", vec![1, 2]), Field::Absent);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Whether itemized per-entity data or only aggregates are exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Aggregate totals only.
    Summary,
    /// Aggregates plus itemized lists.
    Detailed,
}

/// Whether ground-truth-only fields are exposed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observability {
    /// What a park operator could see.
    Normal,
    /// Includes ground truth.
    Oracle,
}

/// The (granularity, observability) pair a snapshot is viewed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewContext {
    /// Granularity tier.
    pub granularity: Granularity,
    /// Observability tier.
    pub observability: Observability,
}

impl ViewContext {
    /// Aggregates only, no ground truth. The strictest context.
    pub const SUMMARY: Self = Self::new(Granularity::Summary, Observability::Normal);
    /// Itemized lists, no ground truth.
    pub const DETAILED: Self = Self::new(Granularity::Detailed, Observability::Normal);
    /// Everything.
    pub const ORACLE: Self = Self::new(Granularity::Detailed, Observability::Oracle);

    /// Build a context from its two tiers.
    pub const fn new(granularity: Granularity, observability: Observability) -> Self {
        Self {
            granularity,
            observability,
        }
    }

    /// True if every field visible under `other` is also visible here.
    pub fn covers(&self, other: &ViewContext) -> bool {
        self.granularity >= other.granularity && self.observability >= other.observability
    }
}

impl Default for ViewContext {
    fn default() -> Self {
        Self::SUMMARY
    }
}

impl fmt::Display for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = match self.granularity {
            Granularity::Summary => "summary",
            Granularity::Detailed => "detailed",
        };
        let o = match self.observability {
            Observability::Normal => "normal",
            Observability::Oracle => "oracle",
        };
        write!(f, "({g}, {o})")
    }
}

/// Minimum tiers a context needs to see a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldRequirement {
    /// Lowest granularity at which the field is visible.
    pub granularity: Granularity,
    /// Lowest observability at which the field is visible.
    pub observability: Observability,
}

impl FieldRequirement {
    /// Visible under every context.
    pub const ALWAYS: Self = Self::new(Granularity::Summary, Observability::Normal);
    /// Needs a detailed context.
    pub const DETAILED: Self = Self::new(Granularity::Detailed, Observability::Normal);
    /// Needs an oracle context.
    pub const ORACLE: Self = Self::new(Granularity::Summary, Observability::Oracle);

    /// Build a requirement from its two tiers.
    pub const fn new(granularity: Granularity, observability: Observability) -> Self {
        Self {
            granularity,
            observability,
        }
    }
}

/// Keep/drop decision for one field.
pub fn is_visible(req: FieldRequirement, ctx: ViewContext) -> bool {
    ctx.granularity >= req.granularity && ctx.observability >= req.observability
}

// ── Field ──────────────────────────────────────────────────────────

/// A value that may have been withheld by the visibility policy.
///
/// `Absent` means "filtered", which is distinct from a present zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field<T> {
    /// The value is visible.
    Present(T),
    /// The value was hidden by the view context.
    Absent,
}

impl<T> Field<T> {
    /// True for [`Field::Present`].
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// True for [`Field::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrow the inner value.
    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Present(v) => Field::Present(v),
            Self::Absent => Field::Absent,
        }
    }

    /// The inner value, if present.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }

    /// Convert into an `Option`, dropping the distinction's name.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent => None,
        }
    }

    /// Map the inner value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Present(v) => Field::Present(f(v)),
            Self::Absent => Field::Absent,
        }
    }

    /// The inner value, or `default` when absent.
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Present(v) => v,
            Self::Absent => default,
        }
    }
}

impl<T: Default> Field<T> {
    /// The inner value, or `T::default()` when absent.
    pub fn unwrap_or_default(self) -> T {
        self.unwrap_or(T::default())
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Self::Present(v),
            None => Self::Absent,
        }
    }
}

// ── Schema and mask ────────────────────────────────────────────────

/// One field of a record schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, as it appears in dotted paths.
    pub name: &'static str,
    /// Visibility requirement.
    pub requirement: FieldRequirement,
}

impl FieldSpec {
    /// Declare a schema entry.
    pub const fn new(name: &'static str, requirement: FieldRequirement) -> Self {
        Self { name, requirement }
    }
}

/// A schema compiled against one context.
///
/// Names not in the schema are treated as unannotated and always kept.
#[derive(Clone, Debug)]
pub struct VisibilityMask {
    ctx: ViewContext,
    hidden: SmallVec<[&'static str; 8]>,
}

impl VisibilityMask {
    /// Resolve every schema entry against `ctx`.
    pub fn compile(schema: &[FieldSpec], ctx: ViewContext) -> Self {
        let hidden = schema
            .iter()
            .filter(|spec| !is_visible(spec.requirement, ctx))
            .map(|spec| spec.name)
            .collect();
        Self { ctx, hidden }
    }

    /// The context this mask was compiled for.
    pub fn context(&self) -> ViewContext {
        self.ctx
    }

    /// Whether the named field survives the mask.
    pub fn keeps(&self, name: &str) -> bool {
        !self.hidden.iter().any(|h| *h == name)
    }

    /// Wrap `value` as present or absent according to the mask.
    pub fn gate<T>(&self, name: &str, value: T) -> Field<T> {
        if self.keeps(name) {
            Field::Present(value)
        } else {
            Field::Absent
        }
    }

    /// Like [`gate`](Self::gate), but only builds the value when kept.
    pub fn gate_with<T, E>(
        &self,
        name: &str,
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<Field<T>, E> {
        if self.keeps(name) {
            build().map(Field::Present)
        } else {
            Ok(Field::Absent)
        }
    }
}

/// A record whose fields are described by a static schema.
pub trait Record {
    /// Every field of the record with its requirement.
    const SCHEMA: &'static [FieldSpec];

    /// Whether the named field currently holds a value.
    fn is_present(&self, name: &str) -> bool;

    /// Append the dotted paths of present fields under `prefix`.
    ///
    /// Records with nested records override this and recurse after
    /// calling [`collect_schema_fields`].
    fn collect_present(&self, prefix: &str, out: &mut Vec<String>) {
        collect_schema_fields(self, prefix, out);
    }

    /// Dotted paths of every present field, sorted.
    fn present_fields(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_present("", &mut out);
        out.sort();
        out
    }
}

/// Push the present top-level schema fields of `record`.
pub fn collect_schema_fields<R: Record + ?Sized>(record: &R, prefix: &str, out: &mut Vec<String>) {
    for spec in R::SCHEMA {
        if record.is_present(spec.name) {
            out.push(field_path(prefix, spec.name));
        }
    }
}

/// Join a prefix and a field name with a dot.
pub fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CONTEXTS: [ViewContext; 4] = [
        ViewContext::SUMMARY,
        ViewContext::new(Granularity::Summary, Observability::Oracle),
        ViewContext::DETAILED,
        ViewContext::ORACLE,
    ];
    const REQS: [FieldRequirement; 4] = [
        FieldRequirement::ALWAYS,
        FieldRequirement::DETAILED,
        FieldRequirement::ORACLE,
        FieldRequirement::new(Granularity::Detailed, Observability::Oracle),
    ];

    #[test]
    fn drop_rules() {
        assert!(is_visible(FieldRequirement::ALWAYS, ViewContext::SUMMARY));
        assert!(!is_visible(FieldRequirement::DETAILED, ViewContext::SUMMARY));
        assert!(is_visible(FieldRequirement::DETAILED, ViewContext::DETAILED));
        assert!(!is_visible(FieldRequirement::ORACLE, ViewContext::DETAILED));
        assert!(is_visible(FieldRequirement::ORACLE, ViewContext::ORACLE));
    }

    #[test]
    fn unknown_names_are_kept() {
        let mask = VisibilityMask::compile(&[], ViewContext::SUMMARY);
        assert!(mask.keeps("anything"));
    }

    #[test]
    fn gate_with_skips_hidden_builders() {
        let schema = [FieldSpec::new("list", FieldRequirement::DETAILED)];
        let mask = VisibilityMask::compile(&schema, ViewContext::SUMMARY);
        let out: Result<Field<u8>, &str> = mask.gate_with("list", || Err("should not run"));
        assert_eq!(out, Ok(Field::Absent));
    }

    #[test]
    fn absent_is_not_zero() {
        assert_ne!(Field::Present(0), Field::Absent);
        assert_eq!(Field::<i32>::Absent.unwrap_or_default(), 0);
    }

    proptest! {
        #[test]
        fn visibility_is_monotonic(r in 0usize..4, a in 0usize..4, b in 0usize..4) {
            let (lo, hi) = (CONTEXTS[a], CONTEXTS[b]);
            if hi.covers(&lo) && is_visible(REQS[r], lo) {
                prop_assert!(is_visible(REQS[r], hi));
            }
        }
    }
}

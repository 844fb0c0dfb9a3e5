//! [`TensorCodec`]: configuration, layout description and dispatch.

use midway_core::{CodecConfig, ConfigError, ContractViolation, ObsError, ObsLayout, StaffRole, ViewContext};
use midway_snapshot::DomainSnapshot;
use smallvec::smallvec;

use crate::channel::Channel;
use crate::norm::NormalizationTable;
use crate::tensor::{Shape, TensorBundle};

/// Tensor names shared by both layouts.
pub mod names {
    /// Spatial grid, `(park_size, park_size, channels)`.
    pub const GRID: &str = "grid";
    /// Ride aggregates.
    pub const RIDES: &str = "rides_vector";
    /// Shop aggregates.
    pub const SHOPS: &str = "shops_vector";
    /// Staff aggregates.
    pub const STAFF: &str = "staff_vector";
    /// Janitor table.
    pub const JANITORS: &str = "janitor_vector";
    /// Mechanic table.
    pub const MECHANICS: &str = "mechanic_vector";
    /// Specialist table.
    pub const SPECIALISTS: &str = "specialist_vector";
    /// Guest aggregates.
    pub const GUESTS: &str = "guests_vector";
    /// Survey age.
    pub const SURVEY_AGE: &str = "survey_age";
    /// Survey results table.
    pub const SURVEY_RESULTS: &str = "survey_results";
    /// Park status.
    pub const PARK: &str = "park_vector";
}

/// Columns of a staff table row.
pub const STAFF_ROW: usize = 8;
/// Columns of a survey table row.
pub const SURVEY_ROW: usize = 8;
/// Length of the full park vector.
pub const PARK_LEN: usize = 61;

/// Table holding one staff role.
pub fn staff_table(role: StaffRole) -> &'static str {
    match role {
        StaffRole::Janitor => names::JANITORS,
        StaffRole::Mechanic => names::MECHANICS,
        StaffRole::Specialist => names::SPECIALISTS,
    }
}

/// Snapshot ↔ tensor bundle codec.
///
/// Immutable once built; share it freely across threads.
///
/// ```
/// use midway_core::{CodecConfig, ViewContext};
/// use midway_obs::TensorCodec;
/// use midway_snapshot::DomainSnapshot;
/// use midway_test_utils::RawSnapshotBuilder;
///
/// let config = CodecConfig::default();
/// let codec = TensorCodec::new(config.clone()).unwrap();
/// let raw = RawSnapshotBuilder::new().money(5000).step(7).build();
/// let snap = DomainSnapshot::from_value(raw, ViewContext::ORACLE, &config).unwrap();
///
/// let bundle = codec.encode(&snap).unwrap();
/// assert_eq!(bundle.get("grid").unwrap().shape(), &[20, 20, 34]);
///
/// let back = codec.decode(&bundle, ViewContext::ORACLE).unwrap();
/// assert_eq!(back.money, 5000);
/// assert_eq!(back.step, 7);
/// ```
#[derive(Clone, Debug)]
pub struct TensorCodec {
    config: CodecConfig,
    norms: NormalizationTable,
}

impl TensorCodec {
    /// Validate `config` and build its normalization table.
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let norms = NormalizationTable::from_config(&config)?;
        Ok(Self { config, norms })
    }

    /// Use a caller-supplied rule table.
    pub fn with_norms(config: CodecConfig, norms: NormalizationTable) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, norms })
    }

    /// The configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// The normalization rules.
    pub fn norms(&self) -> &NormalizationTable {
        &self.norms
    }

    /// Every tensor name with its shape, in bundle order.
    pub fn shapes(&self) -> Vec<(&'static str, Shape)> {
        let c = &self.config;
        match c.layout {
            ObsLayout::Full => {
                let size = c.park_size as usize;
                vec![
                    (names::GRID, smallvec![size, size, Channel::COUNT]),
                    (names::RIDES, smallvec![7]),
                    (names::SHOPS, smallvec![4]),
                    (names::STAFF, smallvec![14]),
                    (names::JANITORS, smallvec![c.max_staff_per_type, STAFF_ROW]),
                    (names::MECHANICS, smallvec![c.max_staff_per_type, STAFF_ROW]),
                    (names::SPECIALISTS, smallvec![c.max_staff_per_type, STAFF_ROW]),
                    (names::GUESTS, smallvec![10]),
                    (names::SURVEY_AGE, smallvec![1]),
                    (names::SURVEY_RESULTS, smallvec![c.max_survey_results, SURVEY_ROW]),
                    (names::PARK, smallvec![PARK_LEN]),
                ]
            }
            ObsLayout::Compact => vec![
                (names::RIDES, smallvec![19]),
                (names::SHOPS, smallvec![15]),
                (names::STAFF, smallvec![14]),
                (names::GUESTS, smallvec![7]),
                (names::PARK, smallvec![10]),
            ],
        }
    }

    /// Shape of one named tensor in the current layout.
    pub fn shape_of(&self, name: &str) -> Option<Shape> {
        self.shapes()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, s)| s)
    }

    /// Encode a snapshot.
    ///
    /// Fields the snapshot holds as absent encode as zeros. Fails when two
    /// entities share a grid cell or a value falls outside its rule's
    /// domain.
    pub fn encode(&self, snapshot: &DomainSnapshot) -> Result<TensorBundle, ContractViolation> {
        let bundle = match self.config.layout {
            ObsLayout::Full => crate::encode::encode_full(self, snapshot)?,
            ObsLayout::Compact => crate::compact::encode_compact(self, snapshot)?,
        };
        log::debug!(
            "encoded step {} as {} layout ({} tensors)",
            snapshot.step,
            self.config.layout.name(),
            bundle.len()
        );
        Ok(bundle)
    }

    /// Rebuild a snapshot under `ctx`.
    ///
    /// Fields `ctx` hides decode as absent whatever the tensors hold.
    /// Survey rows that are entirely zero are read as padding, so a result
    /// whose every value encodes to zero is dropped. Only the full layout
    /// can be decoded.
    pub fn decode(&self, bundle: &TensorBundle, ctx: ViewContext) -> Result<DomainSnapshot, ObsError> {
        if self.config.layout != ObsLayout::Full {
            return Err(ConfigError::DecodeUnsupported {
                layout: self.config.layout.name(),
            }
            .into());
        }
        let snapshot = crate::decode::decode_full(self, bundle, ctx)?;
        log::debug!(
            "decoded step {} at {} ({} rides, {} shops)",
            snapshot.step,
            ctx,
            snapshot.rides.total_rides,
            snapshot.shops.total_shops
        );
        Ok(snapshot)
    }
}

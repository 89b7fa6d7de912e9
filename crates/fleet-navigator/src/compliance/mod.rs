//! Compliance & pooling engine.
//!
//! Everything in this module is synchronous and side-effect free. Balances are the single source
//! of truth: a [`ComplianceStatus`] is always derived from a balance and never stored next to it.

mod classifier;
pub mod domain;
pub mod fleet;
pub mod numeric;
pub mod pooling;

pub use classifier::{accept_reported_balance, classify, validate_intensity};
pub use domain::{
    ClassifiedVessel, Classification, ComplianceResult, ComplianceStatus, ComplianceTarget,
    Intensity, IntensityUnit, VesselRecord, VesselView,
};
pub use fleet::views::FleetSummaryView;
pub use fleet::{
    summarize, FleetHealth, FleetInsights, FleetSnapshot, FleetSummary, StatusCounts,
    TypeBreakdown,
};
pub use pooling::{
    pool, pool_selection, pooling_candidates, PoolMemberView, PoolingCandidates, PoolingResult,
    PoolingView,
};

/// Failures raised by the engine and its two remote boundaries.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
    #[error("invalid pooling pair: {0}")]
    InvalidPoolingPair(String),
    #[error("invalid voyage input: {0}")]
    InvalidVoyageInput(String),
    #[error("intensity unit mismatch: target uses {expected}, measurement uses {found}")]
    UnitMismatch {
        expected: IntensityUnit,
        found: IntensityUnit,
    },
    #[error("{service} unavailable: {detail}")]
    ServiceUnavailable {
        service: &'static str,
        detail: String,
    },
    #[error("{service} returned an invalid response: {detail}")]
    InvalidResponseShape {
        service: &'static str,
        detail: String,
    },
    #[error("failed to read fleet file: {0}")]
    SnapshotIo(#[from] std::io::Error),
    #[error("invalid fleet CSV data: {0}")]
    SnapshotCsv(#[from] csv::Error),
}

impl ComplianceError {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidMeasurement(_) => "invalid_measurement",
            Self::InvalidPoolingPair(_) => "invalid_pooling_pair",
            Self::InvalidVoyageInput(_) => "invalid_voyage_input",
            Self::UnitMismatch { .. } => "unit_mismatch",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::InvalidResponseShape { .. } => "invalid_response_shape",
            Self::SnapshotIo(_) | Self::SnapshotCsv(_) => "fleet_snapshot",
        }
    }

    /// Only transport failures are worth a manual retry; everything else needs new input.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }

    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InvalidMeasurement(_)
                | Self::InvalidPoolingPair(_)
                | Self::InvalidVoyageInput(_)
                | Self::UnitMismatch { .. }
        )
    }

    pub(crate) fn for_vessel(self, ship_id: &str) -> Self {
        match self {
            Self::InvalidMeasurement(detail) => {
                Self::InvalidMeasurement(format!("vessel {ship_id}: {detail}"))
            }
            other => other,
        }
    }
}

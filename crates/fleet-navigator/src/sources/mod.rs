//! Fleet source adapters. Each one yields raw [`FleetRecord`]s; classification happens afterwards
//! in one place, against whatever target the caller holds.

mod local;
mod record;
mod remote;

pub use local::{parse_snapshot, CsvFleetSource};
pub use record::{normalize_fleet, FleetRecord};
pub use remote::HttpFleetSource;

use crate::compliance::{ComplianceError, IntensityUnit};
use crate::config::{FleetSourceConfig, UpstreamConfig};
use async_trait::async_trait;
use std::sync::Arc;

pub const FLEET_SERVICE: &str = "fleet source";

#[async_trait]
pub trait FleetSource: Send + Sync {
    /// Where the fleet comes from, for logs.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<FleetRecord>, ComplianceError>;
}

/// Build the configured fleet source. Voyage logs are aggregated in `unit`.
pub fn from_config(
    config: &UpstreamConfig,
    unit: IntensityUnit,
) -> Result<Arc<dyn FleetSource>, ComplianceError> {
    let source: Arc<dyn FleetSource> = match &config.fleet {
        FleetSourceConfig::Remote(url) => {
            Arc::new(HttpFleetSource::new(url.clone(), config.timeout)?)
        }
        FleetSourceConfig::Snapshot(path) => Arc::new(CsvFleetSource::snapshot(path.clone())),
        FleetSourceConfig::Voyages(path) => Arc::new(CsvFleetSource::voyages(path.clone(), unit)),
    };
    Ok(source)
}

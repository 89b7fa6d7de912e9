use super::super::domain::{ClassifiedVessel, ComplianceTarget};
use super::super::pooling::{pool_selection, pooling_candidates, PoolingCandidates, PoolingResult};
use super::super::ComplianceError;
use super::insights::FleetInsights;
use super::summary::{summarize, FleetSummary};
use chrono::{DateTime, Utc};

/// One normalized fetch of the fleet. Summaries and pooling results are derived from it on
/// demand; whether the snapshot is still current is up to the caller.
#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    pub vessels: Vec<ClassifiedVessel>,
    pub target: ComplianceTarget,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl FleetSnapshot {
    pub fn new(
        vessels: Vec<ClassifiedVessel>,
        target: ComplianceTarget,
        source: impl Into<String>,
    ) -> Self {
        Self {
            vessels,
            target,
            source: source.into(),
            fetched_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> FleetSummary {
        summarize(&self.vessels)
    }

    pub fn insights(&self, summary: &FleetSummary) -> FleetInsights {
        summary.insights(&self.vessels, &self.target)
    }

    pub fn find(&self, ship_id: &str) -> Option<&ClassifiedVessel> {
        self.vessels
            .iter()
            .find(|vessel| vessel.ship_id() == ship_id)
    }

    pub fn candidates(&self) -> PoolingCandidates<'_> {
        pooling_candidates(&self.vessels)
    }

    /// Resolve a user-selected pair by ship id. Unknown ids are treated as a missing selection.
    pub fn pool(
        &self,
        deficit_ship_id: &str,
        surplus_ship_id: &str,
    ) -> Result<PoolingResult<'_>, ComplianceError> {
        for ship_id in [deficit_ship_id, surplus_ship_id] {
            if !ship_id.trim().is_empty() && self.find(ship_id).is_none() {
                return Err(ComplianceError::InvalidPoolingPair(format!(
                    "{ship_id} is not part of the current fleet"
                )));
            }
        }
        pool_selection(
            self.find(deficit_ship_id).map(|vessel| &vessel.compliance),
            self.find(surplus_ship_id).map(|vessel| &vessel.compliance),
        )
    }
}

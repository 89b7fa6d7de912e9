use std::sync::Arc;

use tracing::{info, warn};

use crate::compliance::pooling::PoolingView;
use crate::compliance::{ComplianceError, ComplianceTarget, FleetSnapshot};
use crate::sources::{normalize_fleet, FleetSource};
use crate::voyage::{predict_voyage, VoyageAssessment, VoyageInput, VoyagePredictor};

/// Facade wiring a fleet source and a voyage predictor to the compliance engine.
///
/// Holds no fleet state between calls: every operation fetches what it needs, so results always
/// reflect the source at call time.
pub struct FleetComplianceService<F: ?Sized, P: ?Sized> {
    fleet: Arc<F>,
    predictor: Arc<P>,
    target: ComplianceTarget,
}

impl<F, P> FleetComplianceService<F, P>
where
    F: FleetSource + ?Sized + 'static,
    P: VoyagePredictor + ?Sized + 'static,
{
    pub fn new(fleet: Arc<F>, predictor: Arc<P>, target: ComplianceTarget) -> Self {
        Self {
            fleet,
            predictor,
            target,
        }
    }

    pub fn target(&self) -> &ComplianceTarget {
        &self.target
    }

    /// Fetch and classify the whole fleet. Any bad record fails the whole call.
    pub async fn snapshot(&self) -> Result<FleetSnapshot, ComplianceError> {
        let source = self.fleet.describe();
        let records = self.fleet.fetch().await.map_err(|err| {
            warn!(%source, kind = err.kind(), error = %err, "fleet fetch failed");
            err
        })?;

        let vessels = normalize_fleet(records, &self.target)?;
        info!(
            %source,
            vessels = vessels.len(),
            target = self.target.value(),
            unit = %self.target.unit(),
            "fleet snapshot classified"
        );

        Ok(FleetSnapshot::new(vessels, self.target, source))
    }

    /// Pool two vessels of a fresh snapshot, identified by ship id.
    pub async fn pool_pair(
        &self,
        deficit_ship_id: &str,
        surplus_ship_id: &str,
    ) -> Result<PoolingView, ComplianceError> {
        let snapshot = self.snapshot().await?;
        let view = snapshot.pool(deficit_ship_id, surplus_ship_id)?.to_view();
        info!(
            deficit = deficit_ship_id,
            surplus = surplus_ship_id,
            net_balance = view.net_balance,
            pool_compliant = view.pool_compliant,
            "pool evaluated"
        );
        Ok(view)
    }

    pub async fn predict(&self, input: &VoyageInput) -> Result<VoyageAssessment, ComplianceError> {
        let assessment = predict_voyage(self.predictor.as_ref(), input, &self.target).await?;
        info!(
            ship_type = %input.ship_type,
            status = %assessment.status(),
            balance = assessment.balance(),
            "voyage classified"
        );
        Ok(assessment)
    }
}

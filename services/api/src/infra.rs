use fleet_navigator::compliance::{ComplianceTarget, IntensityUnit};
use fleet_navigator::config::UpstreamConfig;
use fleet_navigator::error::AppError;
use fleet_navigator::sources::{self, FleetSource};
use fleet_navigator::voyage::{HttpVoyagePredictor, VoyagePredictor};
use fleet_navigator::FleetComplianceService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type FleetService = FleetComplianceService<dyn FleetSource, dyn VoyagePredictor>;

/// Wire the configured fleet source and predictor behind one service.
pub(crate) fn build_service(
    upstream: &UpstreamConfig,
    target: ComplianceTarget,
) -> Result<Arc<FleetService>, AppError> {
    let fleet = sources::from_config(upstream, target.unit())?;
    let predictor: Arc<dyn VoyagePredictor> = Arc::new(HttpVoyagePredictor::new(
        upstream.predictor_url.clone(),
        upstream.timeout,
    )?);

    Ok(Arc::new(FleetComplianceService::new(
        fleet, predictor, target,
    )))
}

pub(crate) fn parse_unit(raw: &str) -> Result<IntensityUnit, String> {
    IntensityUnit::parse(raw).ok_or_else(|| format!("'{raw}' is not one of kg_per_nm, g_per_mj"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_parser_accepts_keys_and_rejects_others() {
        assert_eq!(parse_unit("g_per_mj"), Ok(IntensityUnit::GramsPerMegajoule));
        assert!(parse_unit("tonnes").is_err());
    }
}

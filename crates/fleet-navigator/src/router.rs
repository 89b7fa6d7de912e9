use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compliance::domain::VesselView;
use crate::compliance::fleet::views::FleetSummaryView;
use crate::compliance::pooling::PoolingView;
use crate::compliance::{ComplianceError, ComplianceTarget, FleetInsights, FleetSnapshot};
use crate::error::AppError;
use crate::service::FleetComplianceService;
use crate::sources::FleetSource;
use crate::voyage::{VoyageAssessmentView, VoyageInput, VoyagePredictor};

/// Router builder exposing the fleet, pooling, and voyage endpoints.
pub fn fleet_router<F, P>(service: Arc<FleetComplianceService<F, P>>) -> Router
where
    F: FleetSource + ?Sized + 'static,
    P: VoyagePredictor + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/fleet", get(fleet_handler::<F, P>))
        .route("/api/v1/fleet/summary", get(summary_handler::<F, P>))
        .route(
            "/api/v1/pooling/candidates",
            get(candidates_handler::<F, P>),
        )
        .route("/api/v1/pooling", post(pool_handler::<F, P>))
        .route("/api/v1/voyages/predict", post(predict_handler::<F, P>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub struct FleetResponse {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub target: ComplianceTarget,
    pub vessels: Vec<VesselView>,
}

#[derive(Debug, Serialize)]
pub struct FleetSummaryResponse {
    pub source: String,
    pub fetched_at: DateTime<Utc>,
    pub target: ComplianceTarget,
    pub summary: FleetSummaryView,
    pub insights: FleetInsights,
}

#[derive(Debug, Serialize)]
pub struct PoolingCandidatesResponse {
    pub deficits: Vec<VesselView>,
    pub surpluses: Vec<VesselView>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PoolRequest {
    #[serde(default)]
    pub deficit_ship_id: Option<String>,
    #[serde(default)]
    pub surplus_ship_id: Option<String>,
}

/// Wire shape of a prediction request; field names follow the predictor's own API.
#[derive(Debug, Default, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub ship_type: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub fuel_consumption: Option<f64>,
    #[serde(default)]
    pub fuel_type: Option<String>,
}

impl TryFrom<PredictRequest> for VoyageInput {
    type Error = ComplianceError;

    fn try_from(request: PredictRequest) -> Result<Self, Self::Error> {
        let missing =
            |field: &str| ComplianceError::InvalidVoyageInput(format!("{field} is required"));
        Ok(VoyageInput::new(
            request.ship_type.ok_or_else(|| missing("ship_type"))?,
            request.distance.ok_or_else(|| missing("distance"))?,
            request
                .fuel_consumption
                .ok_or_else(|| missing("fuel_consumption"))?,
            request.fuel_type.filter(|fuel| !fuel.trim().is_empty()),
        ))
    }
}

impl FleetResponse {
    fn from_snapshot(snapshot: FleetSnapshot) -> Self {
        Self {
            vessels: snapshot.vessels.iter().map(|vessel| vessel.to_view()).collect(),
            source: snapshot.source,
            fetched_at: snapshot.fetched_at,
            target: snapshot.target,
        }
    }
}

pub(crate) async fn fleet_handler<F, P>(
    State(service): State<Arc<FleetComplianceService<F, P>>>,
) -> Result<Json<FleetResponse>, AppError>
where
    F: FleetSource + ?Sized + 'static,
    P: VoyagePredictor + ?Sized + 'static,
{
    let snapshot = service.snapshot().await?;
    Ok(Json(FleetResponse::from_snapshot(snapshot)))
}

pub(crate) async fn summary_handler<F, P>(
    State(service): State<Arc<FleetComplianceService<F, P>>>,
) -> Result<Json<FleetSummaryResponse>, AppError>
where
    F: FleetSource + ?Sized + 'static,
    P: VoyagePredictor + ?Sized + 'static,
{
    let snapshot = service.snapshot().await?;
    let summary = snapshot.summary();
    let insights = snapshot.insights(&summary);

    Ok(Json(FleetSummaryResponse {
        summary: summary.to_view(),
        insights,
        source: snapshot.source,
        fetched_at: snapshot.fetched_at,
        target: snapshot.target,
    }))
}

pub(crate) async fn candidates_handler<F, P>(
    State(service): State<Arc<FleetComplianceService<F, P>>>,
) -> Result<Json<PoolingCandidatesResponse>, AppError>
where
    F: FleetSource + ?Sized + 'static,
    P: VoyagePredictor + ?Sized + 'static,
{
    let snapshot = service.snapshot().await?;
    let candidates = snapshot.candidates();

    Ok(Json(PoolingCandidatesResponse {
        deficits: candidates.deficits.iter().map(|v| v.to_view()).collect(),
        surpluses: candidates.surpluses.iter().map(|v| v.to_view()).collect(),
    }))
}

pub(crate) async fn pool_handler<F, P>(
    State(service): State<Arc<FleetComplianceService<F, P>>>,
    Json(request): Json<PoolRequest>,
) -> Result<Json<PoolingView>, AppError>
where
    F: FleetSource + ?Sized + 'static,
    P: VoyagePredictor + ?Sized + 'static,
{
    let selected = |id: Option<String>, side: &str| {
        id.filter(|id| !id.trim().is_empty()).ok_or_else(|| {
            ComplianceError::InvalidPoolingPair(format!("no {side} vessel selected"))
        })
    };
    let deficit = selected(request.deficit_ship_id, "deficit")?;
    let surplus = selected(request.surplus_ship_id, "surplus")?;

    let view = service.pool_pair(&deficit, &surplus).await?;
    Ok(Json(view))
}

pub(crate) async fn predict_handler<F, P>(
    State(service): State<Arc<FleetComplianceService<F, P>>>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<VoyageAssessmentView>, AppError>
where
    F: FleetSource + ?Sized + 'static,
    P: VoyagePredictor + ?Sized + 'static,
{
    let input = VoyageInput::try_from(request)?;
    let assessment = service.predict(&input).await?;
    Ok(Json(assessment.to_view()))
}

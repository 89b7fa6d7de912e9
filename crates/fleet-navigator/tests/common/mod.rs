#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fleet_navigator::compliance::{ComplianceError, ComplianceTarget};
use fleet_navigator::sources::{FleetRecord, FleetSource};
use fleet_navigator::voyage::{PredictorResponse, VoyageInput, VoyagePredictor};
use fleet_navigator::FleetComplianceService;
use serde_json::{json, Value};

/// Fleet source replaying a fixed JSON payload, or a fixed failure.
pub struct StaticFleet {
    payload: Result<Value, fn() -> ComplianceError>,
    fetches: AtomicUsize,
}

impl StaticFleet {
    pub fn new(payload: Value) -> Self {
        Self {
            payload: Ok(payload),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn failing(err: fn() -> ComplianceError) -> Self {
        Self {
            payload: Err(err),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FleetSource for StaticFleet {
    fn describe(&self) -> String {
        "static fleet".to_string()
    }

    async fn fetch(&self) -> Result<Vec<FleetRecord>, ComplianceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.payload {
            Ok(payload) => serde_json::from_value(payload.clone()).map_err(|err| {
                ComplianceError::InvalidResponseShape {
                    service: "fleet source",
                    detail: err.to_string(),
                }
            }),
            Err(make) => Err(make()),
        }
    }
}

/// Predictor answering every call with the same response and recording the inputs it saw.
pub struct ScriptedPredictor {
    response: Result<PredictorResponse, fn() -> ComplianceError>,
    seen: Mutex<Vec<VoyageInput>>,
}

impl ScriptedPredictor {
    pub fn answering(response: PredictorResponse) -> Self {
        Self {
            response: Ok(response),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: fn() -> ComplianceError) -> Self {
        Self {
            response: Err(err),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().expect("predictor mutex poisoned").len()
    }
}

#[async_trait]
impl VoyagePredictor for ScriptedPredictor {
    fn describe(&self) -> String {
        "scripted predictor".to_string()
    }

    async fn predict(&self, input: &VoyageInput) -> Result<PredictorResponse, ComplianceError> {
        self.seen
            .lock()
            .expect("predictor mutex poisoned")
            .push(input.clone());
        match &self.response {
            Ok(response) => Ok(response.clone()),
            Err(make) => Err(make()),
        }
    }
}

pub fn scenario_fleet() -> Value {
    json!([
        {"ship_id": "NG001", "ship_type": "Tanker Ship", "route_id": "Warri-Bonny",
         "GHG_Intensity": 70.0},
        {"ship_id": "NG002", "ship_type": "Tanker Ship", "route_id": "Lagos-Apapa",
         "GHG_Intensity": 95.0},
    ])
}

pub fn scenario_c_response() -> PredictorResponse {
    PredictorResponse {
        predicted_co2: 500.0,
        ghg_intensity: Some(91.0),
        target_used: Some(89.34),
        ..PredictorResponse::default()
    }
}

pub fn service(
    fleet: StaticFleet,
    predictor: ScriptedPredictor,
) -> (
    Arc<FleetComplianceService<StaticFleet, ScriptedPredictor>>,
    Arc<StaticFleet>,
    Arc<ScriptedPredictor>,
) {
    let fleet = Arc::new(fleet);
    let predictor = Arc::new(predictor);
    let service = Arc::new(FleetComplianceService::new(
        fleet.clone(),
        predictor.clone(),
        ComplianceTarget::reference(),
    ));
    (service, fleet, predictor)
}

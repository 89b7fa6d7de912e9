//! Voyage prediction adapter: validates a voyage locally, asks the remote predictor for its CO2
//! estimate, and classifies the answer through the same classifier the fleet uses.

mod client;
mod fuel;
mod ledger;

pub use client::HttpVoyagePredictor;
pub use fuel::FuelType;
pub use ledger::{VesselTotals, VoyageEntry, VoyageLedger, REFERENCE_TARGET_REDUCTION};

use crate::compliance::numeric::{require_positive, round_to, within};
use crate::compliance::{
    validate_intensity, Classification, ComplianceError, ComplianceStatus, ComplianceTarget,
    Intensity, IntensityUnit,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const PREDICTOR_SERVICE: &str = "voyage predictor";

/// The predictor rounds every field to two decimals, so its balance can drift by up to 0.01 from
/// `target - intensity` recomputed here.
pub const CONSISTENCY_TOLERANCE: f64 = 0.02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageInput {
    pub ship_type: String,
    pub distance_nm: f64,
    pub fuel_consumed_kg: f64,
    #[serde(default)]
    pub fuel_type: Option<String>,
}

impl VoyageInput {
    pub fn new(
        ship_type: impl Into<String>,
        distance_nm: f64,
        fuel_consumed_kg: f64,
        fuel_type: Option<String>,
    ) -> Self {
        Self {
            ship_type: ship_type.into(),
            distance_nm,
            fuel_consumed_kg,
            fuel_type,
        }
    }

    pub fn validate(&self) -> Result<(), ComplianceError> {
        if self.ship_type.trim().is_empty() {
            return Err(ComplianceError::InvalidVoyageInput(
                "ship type must not be empty".to_string(),
            ));
        }
        require_positive("distance", self.distance_nm)
            .and_then(|_| require_positive("fuel consumption", self.fuel_consumed_kg))
            .map(|_| ())
            .map_err(ComplianceError::InvalidVoyageInput)
    }

    pub fn fuel(&self) -> FuelType {
        FuelType::from_label(self.fuel_type.as_deref())
    }

    /// Intensity of `co2_kg` for this voyage, in `unit`. Only meaningful after [`Self::validate`].
    pub fn intensity_for(&self, co2_kg: f64, unit: IntensityUnit) -> f64 {
        match unit {
            IntensityUnit::KgPerNauticalMile => co2_kg / self.distance_nm,
            IntensityUnit::GramsPerMegajoule => {
                co2_kg * 1000.0 / self.fuel().energy_mj(self.fuel_consumed_kg)
            }
        }
    }
}

/// Predictor answer. Only `predicted_co2` is guaranteed; the rest appear on enriched responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictorResponse {
    pub predicted_co2: f64,
    #[serde(default)]
    pub ghg_intensity: Option<f64>,
    #[serde(default)]
    pub compliance_status: Option<String>,
    #[serde(default)]
    pub compliance_balance: Option<f64>,
    #[serde(default)]
    pub target_used: Option<f64>,
}

impl PredictorResponse {
    pub fn minimal(predicted_co2: f64) -> Self {
        Self {
            predicted_co2,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait VoyagePredictor: Send + Sync {
    fn describe(&self) -> String;

    async fn predict(&self, input: &VoyageInput) -> Result<PredictorResponse, ComplianceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseDetail {
    /// Intensity was derived locally from the predicted CO2.
    Minimal,
    Enriched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoyageAssessment {
    pub ship_type: String,
    pub fuel: FuelType,
    pub predicted_co2_kg: f64,
    pub intensity: Intensity,
    pub target: ComplianceTarget,
    pub classification: Classification,
    pub detail: ResponseDetail,
}

impl VoyageAssessment {
    pub fn status(&self) -> ComplianceStatus {
        self.classification.status()
    }

    pub fn balance(&self) -> f64 {
        self.classification.balance()
    }

    pub fn to_view(&self) -> VoyageAssessmentView {
        let status = self.status();
        VoyageAssessmentView {
            ship_type: self.ship_type.clone(),
            fuel_type: self.fuel.label(),
            predicted_co2: round_to(self.predicted_co2_kg, 2),
            ghg_intensity: round_to(self.intensity.value, 2),
            unit: self.intensity.unit,
            target_used: self.target.value(),
            compliance_balance: round_to(self.balance(), 2),
            compliance_status: status,
            status_label: status.label(),
            detail: self.detail,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VoyageAssessmentView {
    pub ship_type: String,
    pub fuel_type: &'static str,
    pub predicted_co2: f64,
    pub ghg_intensity: f64,
    pub unit: IntensityUnit,
    pub target_used: f64,
    pub compliance_balance: f64,
    pub compliance_status: ComplianceStatus,
    pub status_label: &'static str,
    pub detail: ResponseDetail,
}

/// Predict and classify one voyage.
///
/// Input is checked before any network call. Whatever the predictor says about compliance, the
/// classification is recomputed here from its intensity and target.
pub async fn predict_voyage<P>(
    predictor: &P,
    input: &VoyageInput,
    default_target: &ComplianceTarget,
) -> Result<VoyageAssessment, ComplianceError>
where
    P: VoyagePredictor + ?Sized,
{
    input.validate()?;

    let response = predictor.predict(input).await?;
    debug!(
        predictor = %predictor.describe(),
        ship_type = %input.ship_type,
        predicted_co2 = response.predicted_co2,
        "prediction received"
    );

    let predicted_co2 = response.predicted_co2;
    if !predicted_co2.is_finite() || predicted_co2 < 0.0 {
        return Err(shape_error(format!(
            "predicted_co2 must be a non-negative number (got {predicted_co2})"
        )));
    }

    let (intensity_value, detail) = match response.ghg_intensity {
        Some(value) => (value, ResponseDetail::Enriched),
        None => (
            input.intensity_for(predicted_co2, default_target.unit()),
            ResponseDetail::Minimal,
        ),
    };
    validate_intensity(intensity_value).map_err(|err| shape_error(err.to_string()))?;

    let target = match response.target_used {
        Some(value) => default_target
            .with_value(value)
            .ok_or_else(|| shape_error(format!("target_used must be finite (got {value})")))?,
        None => *default_target,
    };

    let intensity = Intensity::new(intensity_value, target.unit());
    let classification = target.assess(intensity)?;
    check_consistency(&response, &classification)?;

    Ok(VoyageAssessment {
        ship_type: input.ship_type.clone(),
        fuel: input.fuel(),
        predicted_co2_kg: predicted_co2,
        intensity,
        target,
        classification,
        detail,
    })
}

fn check_consistency(
    response: &PredictorResponse,
    classification: &Classification,
) -> Result<(), ComplianceError> {
    if let Some(reported) = response.compliance_status.as_deref() {
        if ComplianceStatus::parse(reported) != Some(classification.status()) {
            warn!(
                reported,
                computed = %classification.status(),
                "predictor status disagrees with recomputed classification"
            );
        }
    }

    let Some(reported) = response.compliance_balance else {
        return Ok(());
    };
    if within(reported, classification.balance(), CONSISTENCY_TOLERANCE) {
        return Ok(());
    }

    warn!(
        reported,
        computed = classification.balance(),
        "predictor balance is inconsistent with its intensity and target"
    );
    if cfg!(debug_assertions) {
        return Err(shape_error(format!(
            "compliance_balance {reported} does not match target - intensity ({:.4})",
            classification.balance()
        )));
    }
    Ok(())
}

fn shape_error(detail: String) -> ComplianceError {
    ComplianceError::InvalidResponseShape {
        service: PREDICTOR_SERVICE,
        detail,
    }
}

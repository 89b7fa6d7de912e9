use crate::compliance::{
    accept_reported_balance, validate_intensity, ClassifiedVessel, ComplianceError,
    ComplianceResult, ComplianceStatus, ComplianceTarget, VesselRecord,
};
use crate::compliance::numeric::within;
use crate::fields::{empty_string_as_none, lenient_number};
use crate::voyage::CONSISTENCY_TOLERANCE;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A fleet entry as published by a fleet source.
///
/// Accepts both shapes seen in the wild: pre-classified records carrying a balance (and a
/// status), and intensity-only records that still need classifying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRecord {
    pub ship_id: String,
    #[serde(default)]
    pub ship_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub route_id: Option<String>,
    #[serde(
        rename = "Compliance_Status",
        alias = "compliance_status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    pub compliance_status: Option<String>,
    #[serde(
        rename = "Compliance_Balance",
        alias = "compliance_balance",
        default,
        deserialize_with = "lenient_number"
    )]
    pub compliance_balance: Option<f64>,
    #[serde(
        rename = "GHG_Intensity",
        alias = "ghg_intensity",
        default,
        deserialize_with = "lenient_number"
    )]
    pub ghg_intensity: Option<f64>,
}

impl FleetRecord {
    /// Fold either record shape into the canonical classified form.
    ///
    /// A reported balance wins over everything else; the reported status is only cross-checked.
    pub fn normalize(self, target: &ComplianceTarget) -> Result<ClassifiedVessel, ComplianceError> {
        if self.ship_id.trim().is_empty() {
            return Err(ComplianceError::InvalidMeasurement(
                "fleet record without a ship_id".to_string(),
            ));
        }

        let reported_status = self.compliance_status;
        let vessel = match self.compliance_balance {
            Some(balance) => {
                let ghg_intensity = self
                    .ghg_intensity
                    .map(validate_intensity)
                    .transpose()
                    .map_err(|err| err.for_vessel(&self.ship_id))?;
                let classification =
                    accept_reported_balance(balance).map_err(|err| err.for_vessel(&self.ship_id))?;

                if let Some(expected) =
                    ghg_intensity.and_then(|intensity| target_drift(balance, intensity, target))
                {
                    warn!(
                        ship_id = %self.ship_id,
                        reported = balance,
                        expected,
                        target = target.value(),
                        "reported compliance balance was not computed against the configured target"
                    );
                }

                ClassifiedVessel {
                    ship_type: self.ship_type,
                    route_id: self.route_id.unwrap_or_default(),
                    ghg_intensity: ghg_intensity.unwrap_or(0.0),
                    compliance: ComplianceResult::new(self.ship_id, classification),
                }
            }
            None => ClassifiedVessel::from_record(
                VesselRecord {
                    ship_id: self.ship_id,
                    ship_type: self.ship_type,
                    route_id: self.route_id.unwrap_or_default(),
                    ghg_intensity: self.ghg_intensity,
                },
                target,
            )?,
        };

        if let Some(reported) = reported_status.as_deref() {
            if ComplianceStatus::parse(reported) != Some(vessel.status()) {
                warn!(
                    ship_id = vessel.ship_id(),
                    reported,
                    derived = %vessel.status(),
                    "reported compliance status ignored in favour of the balance"
                );
            }
        }

        Ok(vessel)
    }
}

/// The balance `target - intensity` would give, when the reported one is further off than the
/// predictor rounding tolerance.
fn target_drift(balance: f64, intensity: f64, target: &ComplianceTarget) -> Option<f64> {
    let expected = target.value() - intensity;
    (!within(balance, expected, CONSISTENCY_TOLERANCE)).then_some(expected)
}

impl From<VesselRecord> for FleetRecord {
    fn from(record: VesselRecord) -> Self {
        Self {
            ship_id: record.ship_id,
            ship_type: record.ship_type,
            route_id: Some(record.route_id).filter(|route| !route.is_empty()),
            compliance_status: None,
            compliance_balance: None,
            ghg_intensity: record.ghg_intensity,
        }
    }
}

/// Normalize a whole fleet. One bad record rejects the fleet; there is no partial result.
pub fn normalize_fleet(
    records: Vec<FleetRecord>,
    target: &ComplianceTarget,
) -> Result<Vec<ClassifiedVessel>, ComplianceError> {
    records
        .into_iter()
        .map(|record| record.normalize(target))
        .collect()
}

use super::domain::{
    ClassifiedVessel, Classification, ComplianceResult, ComplianceTarget, Intensity, VesselRecord,
};
use super::ComplianceError;

/// Classify one measured intensity against a ceiling.
///
/// `balance = target - intensity`, with no rounding applied. A balance of exactly zero is
/// `Surplus`, so a vessel sitting on the target counts as compliant in fleet rates.
pub fn classify(ghg_intensity: f64, target: f64) -> Result<Classification, ComplianceError> {
    let ghg_intensity = validate_intensity(ghg_intensity)?;
    if !target.is_finite() {
        return Err(ComplianceError::InvalidMeasurement(format!(
            "compliance target must be finite (got {target})"
        )));
    }

    Ok(Classification::from_checked_balance(target - ghg_intensity))
}

pub fn validate_intensity(ghg_intensity: f64) -> Result<f64, ComplianceError> {
    if !ghg_intensity.is_finite() {
        return Err(ComplianceError::InvalidMeasurement(format!(
            "GHG intensity must be finite (got {ghg_intensity})"
        )));
    }
    if ghg_intensity < 0.0 {
        return Err(ComplianceError::InvalidMeasurement(format!(
            "GHG intensity must be non-negative (got {ghg_intensity})"
        )));
    }
    Ok(ghg_intensity)
}

/// Adopt a balance computed upstream (pre-classified fleet records). Status is still derived here.
pub fn accept_reported_balance(balance: f64) -> Result<Classification, ComplianceError> {
    if !balance.is_finite() {
        return Err(ComplianceError::InvalidMeasurement(format!(
            "compliance balance must be finite (got {balance})"
        )));
    }
    Ok(Classification::from_checked_balance(balance))
}

impl ComplianceTarget {
    pub fn classify(&self, ghg_intensity: f64) -> Result<Classification, ComplianceError> {
        classify(ghg_intensity, self.value())
    }

    /// Unit-checked classification. Values in different units are never compared.
    pub fn assess(&self, intensity: Intensity) -> Result<Classification, ComplianceError> {
        if intensity.unit != self.unit() {
            return Err(ComplianceError::UnitMismatch {
                expected: self.unit(),
                found: intensity.unit,
            });
        }
        self.classify(intensity.value)
    }
}

impl ClassifiedVessel {
    /// Classify a raw record; a missing intensity means no recorded voyages and counts as zero.
    pub fn from_record(
        record: VesselRecord,
        target: &ComplianceTarget,
    ) -> Result<Self, ComplianceError> {
        let ghg_intensity = record.ghg_intensity.unwrap_or(0.0);
        let classification = target
            .classify(ghg_intensity)
            .map_err(|err| err.for_vessel(&record.ship_id))?;

        Ok(Self {
            ship_type: record.ship_type,
            route_id: record.route_id,
            ghg_intensity,
            compliance: ComplianceResult::new(record.ship_id, classification),
        })
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

use super::numeric::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Surplus,
    Deficit,
}

impl ComplianceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Surplus => "Surplus",
            Self::Deficit => "Deficit",
        }
    }

    /// Zero is compliant: the lower bound of `Surplus` is inclusive.
    pub(crate) fn from_balance(balance: f64) -> Self {
        if balance >= 0.0 {
            Self::Surplus
        } else {
            Self::Deficit
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "surplus" => Some(Self::Surplus),
            "deficit" => Some(Self::Deficit),
            _ => None,
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntensityUnit {
    #[serde(rename = "kg_per_nm")]
    KgPerNauticalMile,
    #[serde(rename = "g_per_mj")]
    GramsPerMegajoule,
}

impl IntensityUnit {
    pub const fn label(self) -> &'static str {
        match self {
            Self::KgPerNauticalMile => "kg/NM",
            Self::GramsPerMegajoule => "gCO2/MJ",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::KgPerNauticalMile => "kg_per_nm",
            Self::GramsPerMegajoule => "g_per_mj",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "kg_per_nm" | "kg/nm" => Some(Self::KgPerNauticalMile),
            "g_per_mj" | "gco2/mj" | "g/mj" => Some(Self::GramsPerMegajoule),
            _ => None,
        }
    }
}

impl fmt::Display for IntensityUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A measurement tagged with its unit, for callers that may mix kg/NM and gCO2/MJ figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Intensity {
    pub value: f64,
    pub unit: IntensityUnit,
}

impl Intensity {
    pub const fn new(value: f64, unit: IntensityUnit) -> Self {
        Self { value, unit }
    }
}

/// Regulatory intensity ceiling. One shared target applies fleet-wide, but every classification
/// takes it explicitly so a per-vessel or per-voyage target can be passed instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplianceTarget {
    value: f64,
    unit: IntensityUnit,
}

impl ComplianceTarget {
    pub const REFERENCE_VALUE: f64 = 89.34;

    /// Zero and negative ceilings are legal; they simply make compliance harder or impossible.
    pub fn new(value: f64, unit: IntensityUnit) -> Option<Self> {
        value.is_finite().then_some(Self { value, unit })
    }

    pub const fn reference() -> Self {
        Self {
            value: Self::REFERENCE_VALUE,
            unit: IntensityUnit::KgPerNauticalMile,
        }
    }

    pub const fn value(&self) -> f64 {
        self.value
    }

    pub const fn unit(&self) -> IntensityUnit {
        self.unit
    }

    /// Same ceiling, different numeric value (e.g. a `target_used` reported by the predictor).
    pub fn with_value(&self, value: f64) -> Option<Self> {
        Self::new(value, self.unit)
    }
}

impl Default for ComplianceTarget {
    fn default() -> Self {
        Self::reference()
    }
}

/// Canonical raw vessel input: identity plus an optional measured intensity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselRecord {
    pub ship_id: String,
    pub ship_type: String,
    #[serde(default)]
    pub route_id: String,
    #[serde(default)]
    pub ghg_intensity: Option<f64>,
}

/// Balance-only fragment produced by the classifier. The status is computed on demand so it can
/// never drift from the balance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    balance: f64,
}

impl Classification {
    pub(crate) const fn from_checked_balance(balance: f64) -> Self {
        Self { balance }
    }

    pub const fn balance(&self) -> f64 {
        self.balance
    }

    pub fn status(&self) -> ComplianceStatus {
        ComplianceStatus::from_balance(self.balance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceResult {
    ship_id: String,
    classification: Classification,
}

impl ComplianceResult {
    pub fn new(ship_id: impl Into<String>, classification: Classification) -> Self {
        Self {
            ship_id: ship_id.into(),
            classification,
        }
    }

    pub fn ship_id(&self) -> &str {
        &self.ship_id
    }

    pub const fn classification(&self) -> Classification {
        self.classification
    }

    pub const fn balance(&self) -> f64 {
        self.classification.balance()
    }

    pub fn status(&self) -> ComplianceStatus {
        self.classification.status()
    }
}

/// A fleet member after normalization: descriptive fields plus its compliance result.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedVessel {
    pub ship_type: String,
    pub route_id: String,
    pub ghg_intensity: f64,
    pub compliance: ComplianceResult,
}

impl ClassifiedVessel {
    pub fn ship_id(&self) -> &str {
        self.compliance.ship_id()
    }

    pub fn status(&self) -> ComplianceStatus {
        self.compliance.status()
    }

    pub fn balance(&self) -> f64 {
        self.compliance.balance()
    }

    pub fn to_view(&self) -> VesselView {
        let status = self.status();
        VesselView {
            ship_id: self.ship_id().to_string(),
            ship_type: self.ship_type.clone(),
            route_id: self.route_id.clone(),
            ghg_intensity: round_to(self.ghg_intensity, 2),
            compliance_balance: round_to(self.balance(), 2),
            compliance_status: status,
            status_label: status.label(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VesselView {
    pub ship_id: String,
    pub ship_type: String,
    pub route_id: String,
    pub ghg_intensity: f64,
    pub compliance_balance: f64,
    pub compliance_status: ComplianceStatus,
    pub status_label: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_case_insensitive() {
        assert_eq!(
            ComplianceStatus::parse(" surplus "),
            Some(ComplianceStatus::Surplus)
        );
        assert_eq!(
            ComplianceStatus::parse("DEFICIT"),
            Some(ComplianceStatus::Deficit)
        );
        assert_eq!(ComplianceStatus::parse(""), None);
    }

    #[test]
    fn unit_parsing_accepts_keys_and_labels() {
        assert_eq!(
            IntensityUnit::parse("kg/NM"),
            Some(IntensityUnit::KgPerNauticalMile)
        );
        assert_eq!(
            IntensityUnit::parse("g_per_mj"),
            Some(IntensityUnit::GramsPerMegajoule)
        );
        assert_eq!(IntensityUnit::parse("tonnes"), None);
    }

    #[test]
    fn target_rejects_non_finite_values_but_allows_negative() {
        assert!(ComplianceTarget::new(f64::NAN, IntensityUnit::KgPerNauticalMile).is_none());
        assert!(ComplianceTarget::new(f64::INFINITY, IntensityUnit::KgPerNauticalMile).is_none());
        let harsh = ComplianceTarget::new(-5.0, IntensityUnit::KgPerNauticalMile)
            .expect("negative target is legal");
        assert_eq!(harsh.value(), -5.0);
    }

    #[test]
    fn vessel_view_rounds_for_display() {
        let vessel = ClassifiedVessel {
            ship_type: "Tanker Ship".to_string(),
            route_id: "Warri-Bonny".to_string(),
            ghg_intensity: 70.004,
            compliance: ComplianceResult::new(
                "NG001",
                Classification::from_checked_balance(19.33600001),
            ),
        };

        let view = vessel.to_view();
        assert_eq!(view.ghg_intensity, 70.0);
        assert_eq!(view.compliance_balance, 19.34);
        assert_eq!(view.status_label, "Surplus");
    }
}

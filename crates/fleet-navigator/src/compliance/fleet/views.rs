use super::summary::StatusCounts;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TypeBreakdownView {
    pub ship_type: String,
    pub surplus: usize,
    pub deficit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetSummaryView {
    pub total_vessels: usize,
    pub average_intensity: f64,
    pub compliance_rate_percent: f64,
    pub counts_by_status: StatusCounts,
    pub counts_by_type: Vec<TypeBreakdownView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetHealth {
    Healthy,
    AtRisk,
    Unknown,
}

impl FleetHealth {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::AtRisk => "At Risk",
            Self::Unknown => "No Data",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FleetInsights {
    pub health: FleetHealth,
    pub health_label: &'static str,
    pub critical_liability: usize,
    pub total_surplus: f64,
    pub total_deficit: f64,
    pub fleet_net_balance: f64,
    pub fleet_pool_compliant: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
}

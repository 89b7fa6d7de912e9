mod insights;
mod snapshot;
mod summary;
pub mod views;

pub use insights::{FleetHealth, FleetInsights, HEALTHY_COMPLIANCE_RATE};
pub use snapshot::FleetSnapshot;
pub use summary::{summarize, FleetSummary, StatusCounts, TypeBreakdown};

//! Fleet GHG compliance and pooling engine.
//!
//! [`compliance`] holds the pure domain engine. [`sources`] and [`voyage`] are the two remote
//! boundaries; [`service`] and [`router`] put them behind an HTTP surface.

pub mod compliance;
pub mod config;
pub mod error;
mod fields;
pub mod router;
pub mod service;
pub mod sources;
pub mod telemetry;
mod upstream;
pub mod voyage;

pub use compliance::ComplianceError;
pub use router::fleet_router;
pub use service::FleetComplianceService;

use crate::compliance::{ComplianceTarget, IntensityUnit};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const DEFAULT_FLEET_URL: &str = "http://127.0.0.1:8000/api/fleet";
const DEFAULT_PREDICTOR_URL: &str = "http://127.0.0.1:8000/api/predict";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub compliance: ComplianceConfig,
    pub upstream: UpstreamConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            compliance: ComplianceConfig::from_env()?,
            upstream: UpstreamConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// The shared intensity ceiling every vessel and voyage is measured against.
#[derive(Debug, Clone, Copy)]
pub struct ComplianceConfig {
    pub target: ComplianceTarget,
}

impl ComplianceConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let unit = match env::var("COMPLIANCE_UNIT") {
            Ok(raw) => IntensityUnit::parse(&raw).ok_or(ConfigError::InvalidUnit { value: raw })?,
            Err(_) => IntensityUnit::KgPerNauticalMile,
        };
        let value = match env::var("COMPLIANCE_TARGET") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidTarget { value: raw.clone() })?,
            Err(_) => ComplianceTarget::REFERENCE_VALUE,
        };
        let target = ComplianceTarget::new(value, unit).ok_or(ConfigError::InvalidTarget {
            value: value.to_string(),
        })?;

        Ok(Self { target })
    }

    pub fn with_target_value(self, value: f64) -> Result<Self, ConfigError> {
        let target = self
            .target
            .with_value(value)
            .ok_or(ConfigError::InvalidTarget {
                value: value.to_string(),
            })?;
        Ok(Self { target })
    }
}

/// Where the fleet is read from. A local voyage log beats a snapshot, which beats the remote URL.
#[derive(Debug, Clone, PartialEq)]
pub enum FleetSourceConfig {
    Remote(Url),
    Snapshot(PathBuf),
    Voyages(PathBuf),
}

/// Remote collaborators and the per-call timeout they share.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub fleet: FleetSourceConfig,
    pub predictor_url: Url,
    pub timeout: Duration,
}

impl UpstreamConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let fleet = if let Some(path) = non_empty_var("FLEET_VOYAGE_CSV") {
            FleetSourceConfig::Voyages(PathBuf::from(path))
        } else if let Some(path) = non_empty_var("FLEET_SNAPSHOT_CSV") {
            FleetSourceConfig::Snapshot(PathBuf::from(path))
        } else {
            FleetSourceConfig::Remote(url_var("FLEET_SOURCE_URL", DEFAULT_FLEET_URL)?)
        };

        let predictor_url = url_var("PREDICTOR_URL", DEFAULT_PREDICTOR_URL)?;

        let timeout_secs = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout { value: raw })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            fleet,
            predictor_url,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn url_var(key: &'static str, default: &str) -> Result<Url, ConfigError> {
    let raw = non_empty_var(key).unwrap_or_else(|| default.to_string());
    Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        variable: key,
        source,
    })
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidTarget {
        value: String,
    },
    InvalidUnit {
        value: String,
    },
    InvalidTimeout {
        value: String,
    },
    InvalidUrl {
        variable: &'static str,
        source: url::ParseError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidTarget { value } => {
                write!(f, "COMPLIANCE_TARGET must be a finite number, got '{value}'")
            }
            ConfigError::InvalidUnit { value } => write!(
                f,
                "COMPLIANCE_UNIT must be 'kg_per_nm' or 'g_per_mj', got '{value}'"
            ),
            ConfigError::InvalidTimeout { value } => write!(
                f,
                "UPSTREAM_TIMEOUT_SECS must be a positive whole number of seconds, got '{value}'"
            ),
            ConfigError::InvalidUrl { variable, .. } => {
                write!(f, "{variable} must be an absolute URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidUrl { source, .. } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidTarget { .. }
            | ConfigError::InvalidUnit { .. }
            | ConfigError::InvalidTimeout { .. } => None,
        }
    }
}

//! Shared request/response plumbing for the two remote collaborators.
//!
//! Transport failures, timeouts, and non-2xx statuses become `ServiceUnavailable`; a body that
//! does not decode into the expected shape becomes `InvalidResponseShape`. No retries here.

use crate::compliance::ComplianceError;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("fleet-navigator/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(
    service: &'static str,
    timeout: Duration,
) -> Result<Client, ComplianceError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|err| ComplianceError::ServiceUnavailable {
            service,
            detail: format!("http client could not be built: {err}"),
        })
}

pub(crate) async fn fetch_json<T>(
    service: &'static str,
    request: RequestBuilder,
) -> Result<T, ComplianceError>
where
    T: DeserializeOwned,
{
    let response = request
        .send()
        .await
        .map_err(|err| transport_error(service, &err))?;

    let status = response.status();
    if !status.is_success() {
        warn!(service, %status, "upstream responded with an error status");
        return Err(ComplianceError::ServiceUnavailable {
            service,
            detail: format!("upstream responded with {status}"),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| transport_error(service, &err))?;
    debug!(service, bytes = body.len(), "upstream response received");

    serde_json::from_slice(&body).map_err(|err| {
        warn!(service, error = %err, "upstream body did not match the expected shape");
        ComplianceError::InvalidResponseShape {
            service,
            detail: err.to_string(),
        }
    })
}

fn transport_error(service: &'static str, err: &reqwest::Error) -> ComplianceError {
    let detail = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    warn!(service, %detail, "upstream call failed");
    ComplianceError::ServiceUnavailable { service, detail }
}

use super::{PredictorResponse, VoyageInput, VoyagePredictor, PREDICTOR_SERVICE};
use crate::compliance::ComplianceError;
use crate::upstream::{build_client, fetch_json};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Remote predictor reached with a single JSON `POST` per voyage.
#[derive(Debug, Clone)]
pub struct HttpVoyagePredictor {
    http: Client,
    url: Url,
}

impl HttpVoyagePredictor {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ComplianceError> {
        Ok(Self {
            http: build_client(PREDICTOR_SERVICE, timeout)?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    ship_type: &'a str,
    distance: f64,
    fuel_consumption: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    fuel_type: Option<&'a str>,
}

impl<'a> From<&'a VoyageInput> for PredictRequest<'a> {
    fn from(input: &'a VoyageInput) -> Self {
        Self {
            ship_type: &input.ship_type,
            distance: input.distance_nm,
            fuel_consumption: input.fuel_consumed_kg,
            fuel_type: input.fuel_type.as_deref(),
        }
    }
}

#[async_trait]
impl VoyagePredictor for HttpVoyagePredictor {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn predict(&self, input: &VoyageInput) -> Result<PredictorResponse, ComplianceError> {
        let request = self
            .http
            .post(self.url.clone())
            .json(&PredictRequest::from(input));
        fetch_json(PREDICTOR_SERVICE, request).await
    }
}

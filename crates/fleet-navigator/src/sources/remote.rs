use super::{FleetRecord, FleetSource, FLEET_SERVICE};
use crate::compliance::ComplianceError;
use crate::upstream::{build_client, fetch_json};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Fleet published as a JSON array behind a single `GET`.
#[derive(Debug, Clone)]
pub struct HttpFleetSource {
    http: Client,
    url: Url,
}

impl HttpFleetSource {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, ComplianceError> {
        Ok(Self {
            http: build_client(FLEET_SERVICE, timeout)?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl FleetSource for HttpFleetSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<Vec<FleetRecord>, ComplianceError> {
        fetch_json(FLEET_SERVICE, self.http.get(self.url.clone())).await
    }
}

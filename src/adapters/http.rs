use crate::core::{
    ConfigProvider, LocationService, LocationTaxonomy, PredictionResult, PredictionService,
    RequestPayload,
};
use crate::utils::error::{EmlakError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

/// HTTP client for the location and prediction endpoints of one service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(config.base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response> {
        // 未設定就不限時，與瀏覽器行為一致
        let request = match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        };

        let response = request.send().await?;
        tracing::debug!("📡 {} -> {}", url, response.status());

        if !response.status().is_success() {
            return Err(EmlakError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl LocationService for ApiClient {
    async fn fetch_locations(&self) -> Result<LocationTaxonomy> {
        let url = self.endpoint("cities");
        tracing::debug!("📡 GET {}", url);

        let response = self.send(self.client.get(&url), &url).await?;
        let taxonomy = response.json::<LocationTaxonomy>().await?;
        Ok(taxonomy)
    }
}

#[async_trait]
impl PredictionService for ApiClient {
    async fn predict(&self, payload: &RequestPayload) -> Result<PredictionResult> {
        let url = self.endpoint("predict");
        tracing::debug!("📡 POST {}", url);

        let response = self.send(self.client.post(&url).json(payload), &url).await?;
        let result = response.json::<PredictionResult>().await?;
        Ok(result)
    }
}

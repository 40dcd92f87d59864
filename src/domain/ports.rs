use crate::domain::model::{LocationTaxonomy, PredictionResult, RequestPayload};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Source of the city -> district taxonomy.
#[async_trait]
pub trait LocationService: Send + Sync {
    async fn fetch_locations(&self) -> Result<LocationTaxonomy>;
}

/// Remote price model.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, payload: &RequestPayload) -> Result<PredictionResult>;
}

pub trait ConfigProvider: Send + Sync {
    fn base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
}

use monitor_core::{Batch, BatchId, CurrentJobResponse, Job, JobId, Stats};
use monitor_logging::monitor_debug;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::grid::{GridEndpoint, GridQuery};
use crate::types::map_reqwest_error;
use crate::{ApiError, ApiSettings, FailureKind};

/// Read side of the archiving backend used by the monitor.
#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// The job in progress, if any. Never returns a job with terminal fields.
    async fn current_job(&self) -> Result<Option<Job>, ApiError>;

    /// `Ok(None)` when the backend has no job with this id.
    async fn job(&self, id: JobId) -> Result<Option<Job>, ApiError>;

    async fn stats(&self) -> Result<Stats, ApiError>;

    /// `Ok(None)` when the backend has no batch with this id.
    async fn batch(&self, id: BatchId) -> Result<Option<Batch>, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.settings
    }

    /// Grid protocol sharing this backend's HTTP client.
    pub fn grid(&self, endpoint: GridEndpoint) -> GridQuery {
        GridQuery::new(self.client.clone(), endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ApiError> {
        monitor_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    async fn get_required<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let shown = url.to_string();
        self.get_json(url).await?.ok_or_else(|| {
            ApiError::new(FailureKind::HttpStatus(404), format!("{shown} not found"))
        })
    }
}

#[async_trait::async_trait]
impl BackendApi for ReqwestBackend {
    async fn current_job(&self) -> Result<Option<Job>, ApiError> {
        let url = self.settings.endpoint(&self.settings.paths.current_job)?;
        let body: CurrentJobResponse = self.get_required(url).await?;
        Ok(body.job)
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>, ApiError> {
        let url = self.settings.record_endpoint(&self.settings.paths.job, id)?;
        self.get_json(url).await
    }

    async fn stats(&self) -> Result<Stats, ApiError> {
        let url = self.settings.endpoint(&self.settings.paths.stats)?;
        self.get_required(url).await
    }

    async fn batch(&self, id: BatchId) -> Result<Option<Batch>, ApiError> {
        let url = self
            .settings
            .record_endpoint(&self.settings.paths.batch, id.get())?;
        self.get_json(url).await
    }
}

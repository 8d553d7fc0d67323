use std::time::Duration;

use url::Url;

use crate::{ApiError, FailureKind};

/// Backend paths, relative to [`ApiSettings::base_url`]. `{id}` is replaced
/// with the record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiPaths {
    pub current_job: String,
    pub job: String,
    pub stats: String,
    pub batch: String,
    pub job_grid: String,
}

impl Default for ApiPaths {
    fn default() -> Self {
        Self {
            current_job: "job/current".to_string(),
            job: "job/{id}".to_string(),
            stats: "stats".to_string(),
            batch: "batch/{id}".to_string(),
            job_grid: "job/grid_sort".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub paths: ApiPaths,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            paths: ApiPaths::default(),
        }
    }
}

impl ApiSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Resolves `path` against the base url. The base is treated as a
    /// directory whether or not it ends in `/`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{base}: {err}")))?;
        base.join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{path}: {err}")))
    }

    pub(crate) fn record_endpoint(&self, template: &str, id: u64) -> Result<Url, ApiError> {
        self.endpoint(&template.replace("{id}", &id.to_string()))
    }
}

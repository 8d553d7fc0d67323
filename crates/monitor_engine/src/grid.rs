//! Server-side row model protocol for job tables.
//!
//! A grid asks for a window of rows together with its sort and filter models;
//! the backend applies them and answers with the rows plus the total count
//! when known. This layer only carries requests over the wire: it keeps no
//! state between calls and never retries.
use std::fmt;
use std::str::FromStr;

use monitor_core::{BatchId, Job};
use monitor_logging::{monitor_debug, monitor_warn};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::types::map_reqwest_error;
use crate::{ApiError, ApiSettings, FailureKind};

/// Row-window request as produced by the grid.
///
/// The JSON object is kept as received, so keys the grid sends and this
/// crate does not interpret (`rowGroupCols`, `pivotMode`, ...) reach the
/// backend unchanged, as do `sortModel` and `filterModel`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GridRequest(Map<String, Value>);

impl GridRequest {
    /// Request for rows `start_row..end_row`, unsorted and unfiltered, with
    /// the remaining fields a grid sends when grouping and pivoting are off.
    pub fn window(start_row: u64, end_row: u64) -> Self {
        let mut map = Map::new();
        map.insert("startRow".into(), start_row.into());
        map.insert("endRow".into(), end_row.into());
        map.insert("rowGroupCols".into(), Value::Array(Vec::new()));
        map.insert("valueCols".into(), Value::Array(Vec::new()));
        map.insert("pivotCols".into(), Value::Array(Vec::new()));
        map.insert("pivotMode".into(), Value::Bool(false));
        map.insert("groupKeys".into(), Value::Array(Vec::new()));
        map.insert("filterModel".into(), Value::Object(Map::new()));
        map.insert("sortModel".into(), Value::Array(Vec::new()));
        Self(map)
    }

    /// Appends a sort key; earlier keys take precedence.
    pub fn sorted_by(mut self, col_id: impl Into<String>, direction: SortDirection) -> Self {
        let mut item = Map::new();
        item.insert("colId".into(), Value::String(col_id.into()));
        item.insert("sort".into(), Value::String(direction.as_str().into()));
        match self.0.get_mut("sortModel") {
            Some(Value::Array(items)) => items.push(Value::Object(item)),
            _ => {
                self.0
                    .insert("sortModel".into(), Value::Array(vec![Value::Object(item)]));
            }
        }
        self
    }

    /// Sets the filter predicate for one column.
    pub fn filtered_by(mut self, col_id: impl Into<String>, predicate: Value) -> Self {
        match self.0.get_mut("filterModel") {
            Some(Value::Object(filters)) => {
                filters.insert(col_id.into(), predicate);
            }
            _ => {
                let mut filters = Map::new();
                filters.insert(col_id.into(), predicate);
                self.0.insert("filterModel".into(), Value::Object(filters));
            }
        }
        self
    }

    pub fn start_row(&self) -> Option<u64> {
        self.0.get("startRow").and_then(Value::as_u64)
    }

    pub fn end_row(&self) -> Option<u64> {
        self.0.get("endRow").and_then(Value::as_u64)
    }

    pub fn sort_model(&self) -> &[Value] {
        match self.0.get("sortModel") {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    pub fn filter_model(&self) -> Option<&Value> {
        self.0.get("filterModel")
    }
}

impl From<Map<String, Value>> for GridRequest {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for GridRequest {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ApiError::new(
                FailureKind::Encode,
                format!("grid request must be a JSON object, got {other}"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(format!("unknown sort direction {s:?}, expected asc or desc"))
        }
    }
}

/// One page of rows. `last_row` is the total row count once the backend
/// knows it; the grid stops asking for more pages past it.
///
/// Also accepts the backend's native `rowData`/`rowCount` names. A negative
/// count (`-1` in most grids) means the total is not known yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridResponse<R = Job> {
    #[serde(alias = "rowData")]
    pub rows: Vec<R>,
    #[serde(
        rename = "lastRow",
        alias = "rowCount",
        default,
        deserialize_with = "known_row_count"
    )]
    pub last_row: Option<u64>,
}

fn known_row_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let count = Option::<i64>::deserialize(deserializer)?;
    Ok(count.and_then(|count| u64::try_from(count).ok()))
}

/// Completion handler for [`GridQuery::get_rows`]. Exactly one method is
/// called per request.
pub trait GridCallback<R = Job>: Send + Sync {
    fn success(&self, response: GridResponse<R>);
    fn fail(&self, error: ApiError);
}

/// URL a grid posts its requests to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridEndpoint {
    url: Url,
}

impl GridEndpoint {
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    pub fn parse(raw: &str) -> Result<Self, ApiError> {
        Url::parse(raw)
            .map(Self::new)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{raw}: {err}")))
    }

    /// All jobs.
    pub fn jobs(settings: &ApiSettings) -> Result<Self, ApiError> {
        settings.endpoint(&settings.paths.job_grid).map(Self::new)
    }

    /// Jobs belonging to one batch.
    pub fn batch_jobs(settings: &ApiSettings, batch: BatchId) -> Result<Self, ApiError> {
        let mut endpoint = Self::jobs(settings)?;
        endpoint
            .url
            .query_pairs_mut()
            .append_pair("batch_id", &batch.to_string());
        Ok(endpoint)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for GridEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[derive(Debug, Clone)]
pub struct GridQuery {
    client: reqwest::Client,
    endpoint: GridEndpoint,
}

impl GridQuery {
    pub fn new(client: reqwest::Client, endpoint: GridEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &GridEndpoint {
        &self.endpoint
    }

    pub async fn fetch(&self, request: &GridRequest) -> Result<GridResponse, ApiError> {
        self.fetch_rows(request).await
    }

    /// Posts `request` once and decodes the page. Any transport, status or
    /// decode problem is returned as the error; nothing is retried.
    pub async fn fetch_rows<R: DeserializeOwned>(
        &self,
        request: &GridRequest,
    ) -> Result<GridResponse<R>, ApiError> {
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::new(FailureKind::Encode, err.to_string()))?;
        monitor_debug!(
            "POST {} rows {:?}..{:?}",
            self.endpoint,
            request.start_row(),
            request.end_row()
        );

        let response = self
            .client
            .post(self.endpoint.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }

    /// Callback form of [`GridQuery::fetch_rows`].
    pub async fn get_rows<R: DeserializeOwned>(
        &self,
        request: &GridRequest,
        callback: &dyn GridCallback<R>,
    ) {
        match self.fetch_rows(request).await {
            Ok(response) => callback.success(response),
            Err(err) => {
                monitor_warn!("Grid query to {} failed: {}", self.endpoint, err);
                callback.fail(err);
            }
        }
    }
}

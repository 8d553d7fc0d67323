//! Wire shapes of the archiving backend.
//!
//! Every field apart from `id` is optional on decode; absent values take the
//! type's default so a partially populated record never fails the whole
//! response.
use serde::{Deserialize, Deserializer, Serialize};

use crate::{BatchId, Timestamp};

pub type JobId = u64;

/// Highest retry count the backend assigns before giving up on a job.
pub const MAX_RETRIES: u32 = 4;

/// One URL-archiving task.
///
/// The backend keeps `completed`, `failed` and `delayed_until` mutually
/// exclusive. That is assumed here, not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "crate::timestamp::lenient")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "crate::timestamp::lenient")]
    pub completed: Option<Timestamp>,
    #[serde(default, deserialize_with = "crate::timestamp::lenient")]
    pub failed: Option<Timestamp>,
    #[serde(default, deserialize_with = "crate::timestamp::lenient")]
    pub delayed_until: Option<Timestamp>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub retry: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub batches: Vec<BatchId>,
}

impl Job {
    /// A job with only identity and url populated.
    pub fn new(id: JobId, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
            created_at: None,
            completed: None,
            failed: None,
            delayed_until: None,
            retry: 0,
            priority: 0,
            batches: Vec::new(),
        }
    }
}

/// Body of the current-job endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrentJobResponse {
    #[serde(default)]
    pub job: Option<Job>,
}

/// A grouping of jobs, optionally driven by a repeat URL schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    #[serde(default, deserialize_with = "crate::timestamp::lenient")]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub repeat_url: Option<i64>,
    /// Number of member jobs, when the backend reports it.
    #[serde(default)]
    pub jobs: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// Job counts bucketed by retry count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryHistogram {
    pub r0: u64,
    pub r1: u64,
    pub r2: u64,
    pub r3: u64,
    pub r4: u64,
    pub total: u64,
}

impl RetryHistogram {
    /// Count for a retry bucket; `None` outside `0..=MAX_RETRIES`.
    pub fn bucket(&self, retry: u32) -> Option<u64> {
        match retry {
            0 => Some(self.r0),
            1 => Some(self.r1),
            2 => Some(self.r2),
            3 => Some(self.r3),
            4 => Some(self.r4),
            _ => None,
        }
    }

    /// `(retry, count)` pairs in ascending retry order.
    pub fn buckets(&self) -> [(u32, u64); 5] {
        [
            (0, self.r0),
            (1, self.r1),
            (2, self.r2),
            (3, self.r3),
            (4, self.r4),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobStats {
    pub total: u64,
    pub failed: u64,
    pub not_done: RetryHistogram,
    pub completed: RetryHistogram,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepeatUrlStats {
    pub active: u64,
    pub inactive: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlStats {
    /// Archived within the backend's minimum re-archive interval (45 minutes).
    pub super_recently_archived: u64,
    /// Archived within four hours, excluding the above.
    pub recently_archived: u64,
    pub not_recently_archived: u64,
    pub total_archived: u64,
    pub not_archived: u64,
    pub total: u64,
}

/// Point-in-time aggregate snapshot. Replaced wholesale, never patched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub jobs: JobStats,
    pub batches: u64,
    pub repeat_urls: RepeatUrlStats,
    pub urls: UrlStats,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

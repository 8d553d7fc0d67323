use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Batch;

/// Identifier of a batch. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct BatchId(u64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid batch id {raw:?}: expected a positive integer without leading zeros")]
pub struct InvalidBatchId {
    pub raw: String,
}

impl BatchId {
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Validates a path segment taken from a route such as `/batch/{id}`.
    ///
    /// Accepts exactly `[1-9][0-9]*` that fits in a `u64`; signs, whitespace,
    /// leading zeros and empty input are rejected.
    pub fn from_route(raw: &str) -> Result<Self, InvalidBatchId> {
        let invalid = || InvalidBatchId {
            raw: raw.to_string(),
        };
        let mut chars = raw.chars();
        match chars.next() {
            Some('1'..='9') => {}
            _ => return Err(invalid()),
        }
        if !chars.all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        raw.parse::<u64>().map(Self).map_err(|_| invalid())
    }
}

impl TryFrom<u64> for BatchId {
    type Error = InvalidBatchId;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| InvalidBatchId { raw: id.to_string() })
    }
}

impl From<BatchId> for u64 {
    fn from(id: BatchId) -> Self {
        id.0
    }
}

impl FromStr for BatchId {
    type Err = InvalidBatchId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_route(s)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a batch page shows once its route has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchPage {
    /// Malformed id, or the backend has no such batch.
    NotFound,
    /// Valid id but the lookup failed; the page can be retried.
    Unavailable { id: BatchId },
    Loaded(Batch),
}

impl BatchPage {
    pub fn page_meta(&self) -> crate::PageMeta {
        match self {
            BatchPage::NotFound => crate::PageMeta::not_found(),
            BatchPage::Unavailable { id } => crate::PageMeta::batch(*id),
            BatchPage::Loaded(batch) => crate::PageMeta::batch(batch.id),
        }
    }
}

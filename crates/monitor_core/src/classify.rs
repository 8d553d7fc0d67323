use std::fmt;

use crate::{Job, Timestamp, MAX_RETRIES};

/// Status category of a job, with the timestamp that explains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// No job at all.
    None,
    /// In progress; no anchor and no computable ETA.
    Running,
    Delayed {
        until: Timestamp,
        retries_left: u32,
    },
    Failed {
        at: Timestamp,
    },
    Completed {
        at: Timestamp,
        /// `None` when the job carries no `created_at`.
        elapsed: Option<Elapsed>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    None,
    Running,
    Delayed,
    Failed,
    Completed,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::None => "NONE",
            StatusKind::Running => "RUNNING",
            StatusKind::Delayed => "DELAYED",
            StatusKind::Failed => "FAILED",
            StatusKind::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JobStatus {
    pub fn kind(&self) -> StatusKind {
        match self {
            JobStatus::None => StatusKind::None,
            JobStatus::Running => StatusKind::Running,
            JobStatus::Delayed { .. } => StatusKind::Delayed,
            JobStatus::Failed { .. } => StatusKind::Failed,
            JobStatus::Completed { .. } => StatusKind::Completed,
        }
    }

    /// The timestamp the status is derived from, if any.
    pub fn anchor(&self) -> Option<Timestamp> {
        match *self {
            JobStatus::None | JobStatus::Running => None,
            JobStatus::Delayed { until, .. } => Some(until),
            JobStatus::Failed { at } => Some(at),
            JobStatus::Completed { at, .. } => Some(at),
        }
    }
}

/// A duration kept at tenth-of-a-second resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Elapsed {
    tenths: i64,
}

impl Elapsed {
    /// Rounds half-up to the nearest 100 ms.
    pub fn from_millis(millis: i64) -> Self {
        Self {
            tenths: (millis + 50).div_euclid(100),
        }
    }

    pub fn tenths(&self) -> i64 {
        self.tenths
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.tenths as f64 / 10.0
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.as_secs_f64())
    }
}

/// Retries the backend will still attempt, never negative.
pub fn retries_left(retry: u32) -> u32 {
    MAX_RETRIES.saturating_sub(retry)
}

/// Maps a job to its status.
///
/// Precedence is `delayed_until`, then `failed`, then `completed`. A job with
/// more than one of them set violates the backend's own invariant; the order
/// only keeps the result deterministic.
pub fn classify(job: Option<&Job>) -> JobStatus {
    let Some(job) = job else {
        return JobStatus::None;
    };
    if let Some(until) = job.delayed_until {
        return JobStatus::Delayed {
            until,
            retries_left: retries_left(job.retry),
        };
    }
    if let Some(at) = job.failed {
        return JobStatus::Failed { at };
    }
    if let Some(at) = job.completed {
        let elapsed = job
            .created_at
            .map(|created| Elapsed::from_millis(at.millis_since(created)));
        return JobStatus::Completed { at, elapsed };
    }
    JobStatus::Running
}

/// Wayback Machine link for the snapshot a completed job produced.
pub fn archive_url(job: &Job) -> Option<String> {
    let completed = job.completed?;
    Some(format!(
        "https://web.archive.org/web/{}/{}",
        completed.as_datetime().format("%Y%m%d%H%M%S"),
        job.url
    ))
}

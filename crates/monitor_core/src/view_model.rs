use crate::classify::{archive_url, classify, retries_left, JobStatus};
use crate::{BatchId, Job, Stats, Timestamp};

/// Per-page metadata handed to the layout shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
}

impl PageMeta {
    pub fn home() -> Self {
        Self::titled("Home")
    }

    pub fn jobs() -> Self {
        Self::titled("Jobs")
    }

    pub fn batch(id: BatchId) -> Self {
        Self::titled(format!("Batch {id}"))
    }

    pub fn not_found() -> Self {
        Self::titled("Not Found")
    }

    fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub page: PageMeta,
    pub cycle: u64,
    pub current: JobBanner,
    /// The "recently finished" banner while its display window lasts.
    pub recent: Option<JobBanner>,
    pub stats: Option<Stats>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobBanner {
    pub job: Option<Job>,
    pub status: JobStatus,
    /// Set while the job is still being worked on.
    pub in_progress: bool,
    pub archive_url: Option<String>,
}

impl JobBanner {
    /// Banner for the job the backend is working on right now.
    pub fn current(job: Option<&Job>) -> Self {
        Self {
            job: job.cloned(),
            status: classify(job),
            in_progress: job.is_some(),
            archive_url: None,
        }
    }

    /// Banner for a job that just stopped being current.
    pub fn recent(job: &Job) -> Self {
        Self {
            job: Some(job.clone()),
            status: classify(Some(job)),
            in_progress: false,
            archive_url: archive_url(job),
        }
    }
}

/// One row of a jobs table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: u64,
    pub url: String,
    pub batches: Vec<BatchId>,
    pub archive_url: Option<String>,
    pub failed: Option<Timestamp>,
    pub retries_used: u32,
    pub retries_left: u32,
    pub delayed_until: Option<Timestamp>,
    pub created_at: Option<Timestamp>,
    pub priority: i64,
}

impl From<&Job> for JobRowView {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            url: job.url.clone(),
            batches: job.batches.clone(),
            archive_url: archive_url(job),
            failed: job.failed,
            retries_used: job.retry,
            retries_left: retries_left(job.retry),
            delayed_until: job.delayed_until,
            created_at: job.created_at,
            priority: job.priority,
        }
    }
}

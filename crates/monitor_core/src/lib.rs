//! Monitor core: data model, job status classification and the pure polling
//! state machine.
mod batch;
mod classify;
mod effect;
mod model;
mod msg;
mod state;
mod timestamp;
mod update;
mod view_model;

pub use batch::{BatchId, BatchPage, InvalidBatchId};
pub use classify::{archive_url, classify, retries_left, Elapsed, JobStatus, StatusKind};
pub use effect::Effect;
pub use model::{
    Batch, CurrentJobResponse, Job, JobId, JobStats, RepeatUrlStats, RetryHistogram, Stats,
    UrlStats, MAX_RETRIES,
};
pub use msg::Msg;
pub use state::{PollConfig, PollState};
pub use timestamp::Timestamp;
pub use update::update;
pub use view_model::{DashboardView, JobBanner, JobRowView, PageMeta};

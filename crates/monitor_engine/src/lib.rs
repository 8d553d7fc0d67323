//! Monitor engine: backend IO, grid protocol and the poll loop.
mod backend;
mod engine;
mod grid;
mod pages;
mod poller;
mod settings;
mod types;

pub use backend::{BackendApi, ReqwestBackend};
pub use engine::{MonitorHandle, PollerStopped};
pub use grid::{GridCallback, GridEndpoint, GridQuery, GridRequest, GridResponse, SortDirection};
pub use pages::load_batch_page;
pub use poller::{ChannelViewSink, Poller, ViewSink};
pub use settings::{ApiPaths, ApiSettings};
pub use types::{ApiError, FailureKind};

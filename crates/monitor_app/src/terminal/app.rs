use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use monitor_core::{BatchId, BatchPage, PageMeta};
use monitor_engine::{
    load_batch_page, ApiError, BackendApi, GridCallback, GridEndpoint, GridRequest, GridResponse,
    MonitorHandle, ReqwestBackend, SortDirection,
};
use monitor_logging::{monitor_info, monitor_warn};

use super::config::MonitorConfig;
use super::render;

/// One `column:direction` sort key from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

pub fn parse_sort_key(raw: &str) -> Result<SortKey, String> {
    let (column, direction) = match raw.split_once(':') {
        Some((column, direction)) => (column, direction.parse()?),
        None => (raw, SortDirection::Asc),
    };
    if column.is_empty() {
        return Err(format!("missing column in sort key '{raw}'"));
    }
    Ok(SortKey {
        column: column.to_string(),
        direction,
    })
}

pub struct JobsQuery {
    pub batch: Option<String>,
    pub start: u64,
    pub end: u64,
    pub sort: Vec<SortKey>,
}

/// Polls the dashboard and prints every changed view until `run_for` elapses
/// or forever when it is `None`.
pub fn watch(config: &MonitorConfig, run_for: Option<Duration>) -> anyhow::Result<()> {
    let backend: Arc<dyn BackendApi> =
        Arc::new(ReqwestBackend::new(config.api_settings()).context("building HTTP client")?);
    let handle = MonitorHandle::spawn(backend, config.poll_config());
    let deadline = run_for.map(|run_for| Instant::now() + run_for);
    monitor_info!("Watching {}", config.base_url);

    loop {
        let wait = match deadline {
            Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                Some(left) if !left.is_zero() => left,
                _ => break,
            },
            None => Duration::from_secs(1),
        };
        match handle.recv_timeout(wait) {
            Ok(Some(view)) => print_lines(&render::render_dashboard(&view)),
            Ok(None) => {}
            Err(stopped) => bail!("{stopped}, see the log for the cause"),
        }
    }

    handle.stop();
    Ok(())
}

/// Fetches one window of the jobs grid, optionally scoped to a batch.
pub fn jobs(config: &MonitorConfig, query: JobsQuery) -> anyhow::Result<()> {
    let settings = config.api_settings();
    let (page, endpoint) = match &query.batch {
        None => (PageMeta::jobs(), GridEndpoint::jobs(&settings)?),
        Some(raw) => match BatchId::from_route(raw) {
            Ok(id) => (PageMeta::batch(id), GridEndpoint::batch_jobs(&settings, id)?),
            Err(err) => {
                monitor_warn!("{}", err);
                print_lines(&render::render_batch_page(&BatchPage::NotFound));
                return Ok(());
            }
        },
    };

    let mut request = GridRequest::window(query.start, query.end);
    for key in query.sort {
        request = request.sorted_by(key.column, key.direction);
    }

    let backend = ReqwestBackend::new(settings).context("building HTTP client")?;
    let grid = backend.grid(endpoint);
    let printer = RowPrinter::new(page);
    runtime()?.block_on(grid.get_rows(&request, &printer));

    if printer.failed() {
        bail!("jobs grid request to {} failed", grid.endpoint());
    }
    Ok(())
}

/// Shows a batch page, optionally refreshing it on the configured interval.
pub fn batch(config: &MonitorConfig, raw_id: &str, keep_watching: bool) -> anyhow::Result<()> {
    let backend = ReqwestBackend::new(config.api_settings()).context("building HTTP client")?;
    let runtime = runtime()?;

    loop {
        let page = runtime.block_on(load_batch_page(&backend, raw_id));
        print_lines(&render::render_batch_page(&page));
        if !keep_watching || page == BatchPage::NotFound {
            return Ok(());
        }
        std::thread::sleep(config.batch_refresh());
    }
}

struct RowPrinter {
    page: PageMeta,
    failed: AtomicBool,
}

impl RowPrinter {
    fn new(page: PageMeta) -> Self {
        Self {
            page,
            failed: AtomicBool::new(false),
        }
    }

    fn failed(&self) -> bool {
        self.failed.load(Ordering::Relaxed)
    }
}

impl GridCallback for RowPrinter {
    fn success(&self, response: GridResponse) {
        print_lines(&render::render_rows(&self.page, &response));
    }

    fn fail(&self, error: ApiError) {
        eprintln!("Could not load rows: {error}");
        self.failed.store(true, Ordering::Relaxed);
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

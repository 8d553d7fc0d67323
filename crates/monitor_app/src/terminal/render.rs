use monitor_core::{
    BatchPage, DashboardView, JobBanner, JobRowView, JobStatus, PageMeta, RetryHistogram, Stats,
    Timestamp,
};
use monitor_engine::GridResponse;

pub fn render_dashboard(view: &DashboardView) -> Vec<String> {
    let mut lines = header(&view.page);

    lines.push("Current Job".to_string());
    lines.extend(render_banner(&view.current));
    if let Some(recent) = &view.recent {
        lines.extend(render_banner(recent));
    }

    lines.push(String::new());
    lines.push("Statistics".to_string());
    match &view.stats {
        Some(stats) => lines.extend(render_stats(stats)),
        None => lines.push("  loading...".to_string()),
    }
    lines
}

pub fn render_batch_page(page: &BatchPage) -> Vec<String> {
    let mut lines = header(&page.page_meta());
    match page {
        BatchPage::NotFound => lines.push("No such batch.".to_string()),
        BatchPage::Unavailable { id } => {
            lines.push(format!("Batch {id} could not be loaded, will retry."));
        }
        BatchPage::Loaded(batch) => {
            if let Some(repeat_url) = batch.repeat_url {
                lines.push(format!("This batch represents Repeat URL {repeat_url}"));
            }
            lines.push(format!("Created at {}", optional_time(batch.created_at)));
            if let Some(jobs) = batch.jobs {
                lines.push(format!("Jobs: {}", format_with_commas(jobs)));
            }
            if !batch.tags.is_empty() {
                lines.push(format!("Tags: {}", batch.tags.join(", ")));
            }
        }
    }
    lines
}

pub fn render_rows(page: &PageMeta, response: &GridResponse) -> Vec<String> {
    let mut lines = header(page);
    for job in &response.rows {
        lines.push(format_row(&JobRowView::from(job)));
    }
    let shown = response.rows.len() as u64;
    lines.push(match response.last_row {
        Some(total) => format!(
            "{} of {} rows",
            format_with_commas(shown),
            format_with_commas(total)
        ),
        None => format!("{} rows, total unknown", format_with_commas(shown)),
    });
    lines
}

fn header(page: &PageMeta) -> Vec<String> {
    vec![format!("== {} ==", page.title), String::new()]
}

fn render_banner(banner: &JobBanner) -> Vec<String> {
    let Some(job) = &banner.job else {
        return vec!["  [NONE] No current job".to_string()];
    };

    let mut lines = vec![format!("  [{}] {}", banner.status.kind(), job.url)];
    if banner.in_progress {
        lines.push("    in progress...".to_string());
    }

    let mut details = vec![format!("Started at {}", optional_time(job.created_at))];
    match banner.status {
        JobStatus::Completed { elapsed, .. } => {
            if let Some(elapsed) = elapsed {
                details.push(format!("Completed in {elapsed} seconds"));
            }
            if let Some(url) = &banner.archive_url {
                details.push(format!("View Archive: {url}"));
            }
        }
        JobStatus::Delayed {
            until,
            retries_left,
        } => {
            details.push(format!("Delayed until {}", format_time(until)));
            details.push(format!("Retries Left: {retries_left}"));
        }
        JobStatus::Failed { at } => details.push(format!("Failed at {}", format_time(at))),
        JobStatus::None | JobStatus::Running => {}
    }
    details.extend(job.batches.iter().map(|batch| format!("Batch {batch}")));
    lines.push(format!("    {}", details.join(" | ")));
    lines
}

fn render_stats(stats: &Stats) -> Vec<String> {
    let count = |value: u64| format_with_commas(value);
    let mut lines = vec![
        format!("  Total Jobs: {}", count(stats.jobs.total)),
        format!("  Failed Jobs: {}", count(stats.jobs.failed)),
        format!("  Batches: {}", count(stats.batches)),
        format!(
            "  Repeat URLs: {} active, {} inactive, {} total",
            count(stats.repeat_urls.active),
            count(stats.repeat_urls.inactive),
            count(stats.repeat_urls.total)
        ),
        format!(
            "  URLs archived: {} (<= 45 min), {} (<= 4 h), {} (> 4 h), {} total",
            count(stats.urls.super_recently_archived),
            count(stats.urls.recently_archived),
            count(stats.urls.not_recently_archived),
            count(stats.urls.total_archived)
        ),
        format!(
            "  URLs not archived: {}, all URLs: {}",
            count(stats.urls.not_archived),
            count(stats.urls.total)
        ),
    ];
    lines.push(format!(
        "  In progress by retries: {}",
        format_histogram(&stats.jobs.not_done)
    ));
    lines.push(format!(
        "  Completed by retries: {}",
        format_histogram(&stats.jobs.completed)
    ));
    lines
}

fn format_histogram(histogram: &RetryHistogram) -> String {
    let buckets: Vec<String> = histogram
        .buckets()
        .iter()
        .map(|(retry, count)| format!("{retry}:{}", format_with_commas(*count)))
        .collect();
    format!(
        "{} (total {})",
        buckets.join(" "),
        format_with_commas(histogram.total)
    )
}

fn format_row(row: &JobRowView) -> String {
    let batches = if row.batches.is_empty() {
        "-".to_string()
    } else {
        row.batches
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    };
    let outcome = match (&row.archive_url, row.failed, row.delayed_until) {
        (Some(url), _, _) => url.clone(),
        (None, Some(at), _) => format!("failed {}", format_time(at)),
        (None, None, Some(until)) => format!("delayed until {}", format_time(until)),
        (None, None, None) => "pending".to_string(),
    };
    format!(
        "[#{id}] {url} | batches {batches} | retries {used}/{left} left | prio {prio} | {outcome}",
        id = row.id,
        url = row.url,
        batches = batches,
        used = row.retries_used,
        left = row.retries_left,
        prio = row.priority,
        outcome = outcome
    )
}

fn optional_time(at: Option<Timestamp>) -> String {
    at.map(format_time).unwrap_or_else(|| "unknown".to_string())
}

fn format_time(at: Timestamp) -> String {
    at.as_datetime().format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let lead = match digits.len() % 3 {
        0 => 3,
        n => n,
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    out.push_str(&digits[..lead]);
    for group in digits.as_bytes()[lead..].chunks(3) {
        out.push(',');
        out.extend(group.iter().map(|&b| char::from(b)));
    }
    out
}

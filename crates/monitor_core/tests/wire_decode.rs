use chrono::{TimeZone, Utc};
use monitor_core::{BatchId, CurrentJobResponse, Job, JobRowView, Stats, Timestamp};

#[test]
fn decodes_job_as_emitted_by_backend() {
    let raw = r#"{
        "id": 17,
        "url": "https://example.com/a",
        "created_at": "2024-05-01T10:00:00",
        "completed": "2024-05-01T10:00:12.340000",
        "delayed_until": null,
        "priority": 2,
        "retry": 1,
        "failed": null,
        "batches": [3, 9]
    }"#;
    let job: Job = serde_json::from_str(raw).unwrap();

    assert_eq!(job.id, 17);
    assert_eq!(job.retry, 1);
    assert_eq!(job.priority, 2);
    assert_eq!(
        job.batches,
        vec![BatchId::new(3).unwrap(), BatchId::new(9).unwrap()]
    );
    assert_eq!(
        job.created_at,
        Some(Timestamp::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
        ))
    );
    assert!(job.completed.is_some());
    assert!(job.failed.is_none());
}

#[test]
fn tolerates_missing_and_null_fields() {
    let job: Job = serde_json::from_str(r#"{"id": 4, "batches": null, "url": null}"#).unwrap();
    assert_eq!(job, Job::new(4, ""));

    let empty: CurrentJobResponse = serde_json::from_str("{}").unwrap();
    assert_eq!(empty.job, None);
    let null: CurrentJobResponse = serde_json::from_str(r#"{"job": null}"#).unwrap();
    assert_eq!(null.job, None);
}

#[test]
fn unrecognized_timestamps_read_as_absent() {
    let raw = r#"{
        "id": 8,
        "url": "https://example.com/b",
        "created_at": "2024-05-01T10:00:00",
        "completed": "not a date",
        "failed": 1714557600,
        "delayed_until": null
    }"#;
    let job: Job = serde_json::from_str(raw).unwrap();
    assert!(job.created_at.is_some());
    assert_eq!(job.completed, None);
    assert_eq!(job.failed, None);
    assert_eq!(job.delayed_until, None);

    let batch: monitor_core::Batch =
        serde_json::from_str(r#"{"id": 3, "created_at": "soon"}"#).unwrap();
    assert_eq!(batch.created_at, None);
}

#[test]
fn rejects_job_without_id() {
    assert!(serde_json::from_str::<Job>(r#"{"url": "https://example.com"}"#).is_err());
}

#[test]
fn decodes_stats_snapshot() {
    let raw = r#"{
        "jobs": {
            "not_done": {"r0": 5, "r1": 1, "r2": 0, "r3": 0, "r4": 2, "total": 8},
            "completed": {"r0": 90, "r1": 4, "r2": 1, "r3": 0, "r4": 0, "total": 95},
            "failed": 3,
            "total": 106
        },
        "batches": 12,
        "urls": {
            "super_recently_archived": 1,
            "recently_archived": 2,
            "not_recently_archived": 3,
            "total_archived": 6,
            "not_archived": 4,
            "total": 10
        },
        "repeat_urls": {"active": 2, "inactive": 1, "total": 3}
    }"#;
    let stats: Stats = serde_json::from_str(raw).unwrap();

    assert_eq!(stats.jobs.total, 106);
    assert_eq!(stats.jobs.not_done.bucket(4), Some(2));
    assert_eq!(stats.jobs.not_done.bucket(5), None);
    assert_eq!(stats.jobs.completed.buckets()[0], (0, 90));
    assert_eq!(stats.urls.total_archived, 6);
    assert_eq!(stats.repeat_urls.total, 3);
    assert_eq!(stats.batches, 12);
}

#[test]
fn partial_stats_default_to_zero() {
    let stats: Stats = serde_json::from_str(r#"{"batches": 2}"#).unwrap();
    assert_eq!(stats.batches, 2);
    assert_eq!(stats.jobs.completed.total, 0);
}

#[test]
fn row_view_derives_table_columns() {
    let mut job = Job::new(8, "https://example.com/x");
    job.retry = 3;
    job.completed = Some(Timestamp::new(
        Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 58).unwrap(),
    ));
    let row = JobRowView::from(&job);
    assert_eq!(row.retries_used, 3);
    assert_eq!(row.retries_left, 1);
    assert_eq!(
        row.archive_url.as_deref(),
        Some("https://web.archive.org/web/20231231235958/https://example.com/x")
    );
}

use chrono::{TimeZone, Utc};
use monitor_core::{
    archive_url, classify, retries_left, Elapsed, Job, JobStatus, StatusKind, Timestamp,
};

fn at_millis(millis: i64) -> Timestamp {
    Timestamp::new(Utc.timestamp_millis_opt(1_700_000_000_000 + millis).unwrap())
}

fn job() -> Job {
    let mut job = Job::new(11, "https://example.com/page");
    job.created_at = Some(at_millis(0));
    job
}

#[test]
fn absent_job_is_none() {
    assert_eq!(classify(None), JobStatus::None);
    assert_eq!(classify(None).kind(), StatusKind::None);
}

#[test]
fn job_without_terminal_fields_is_running_without_anchor() {
    let status = classify(Some(&job()));
    assert_eq!(status, JobStatus::Running);
    assert_eq!(status.anchor(), None);
}

#[test]
fn delayed_reports_remaining_retries_clamped_at_zero() {
    for retry in 0..=7 {
        let mut delayed = job();
        delayed.retry = retry;
        delayed.delayed_until = Some(at_millis(60_000));

        let status = classify(Some(&delayed));
        let expected = 4u32.saturating_sub(retry);
        assert_eq!(
            status,
            JobStatus::Delayed {
                until: at_millis(60_000),
                retries_left: expected,
            },
            "retry={retry}"
        );
        assert_eq!(status.anchor(), Some(at_millis(60_000)));
    }
    assert_eq!(retries_left(9), 0);
}

#[test]
fn failed_anchors_on_failure_time() {
    let mut failed = job();
    failed.failed = Some(at_millis(5_000));
    assert_eq!(
        classify(Some(&failed)),
        JobStatus::Failed {
            at: at_millis(5_000)
        }
    );
}

#[test]
fn completed_elapsed_rounds_to_tenths() {
    let mut done = job();
    done.completed = Some(at_millis(12_340));

    let status = classify(Some(&done));
    let JobStatus::Completed { at, elapsed } = status else {
        panic!("expected completed, got {status:?}");
    };
    assert_eq!(at, at_millis(12_340));
    let elapsed = elapsed.unwrap();
    assert_eq!(elapsed.tenths(), 123);
    assert_eq!(elapsed.to_string(), "12.3");
}

#[test]
fn elapsed_rounds_half_up() {
    assert_eq!(Elapsed::from_millis(12_350).tenths(), 124);
    assert_eq!(Elapsed::from_millis(12_349).tenths(), 123);
    assert_eq!(Elapsed::from_millis(49).tenths(), 0);
    assert_eq!(Elapsed::from_millis(50).tenths(), 1);
    assert_eq!(Elapsed::from_millis(-50).tenths(), 0);
    assert_eq!(Elapsed::from_millis(-51).tenths(), -1);
}

#[test]
fn completed_without_created_at_has_no_elapsed() {
    let mut done = Job::new(3, "https://example.com");
    done.completed = Some(at_millis(1_000));
    assert_eq!(
        classify(Some(&done)),
        JobStatus::Completed {
            at: at_millis(1_000),
            elapsed: None,
        }
    );
}

#[test]
fn conflicting_terminal_fields_prefer_delayed_then_failed_then_completed() {
    let mut all = job();
    all.completed = Some(at_millis(1_000));
    all.failed = Some(at_millis(2_000));
    all.delayed_until = Some(at_millis(3_000));
    assert_eq!(classify(Some(&all)).kind(), StatusKind::Delayed);

    all.delayed_until = None;
    assert_eq!(classify(Some(&all)).kind(), StatusKind::Failed);

    all.failed = None;
    assert_eq!(classify(Some(&all)).kind(), StatusKind::Completed);

    let mut delayed_and_completed = job();
    delayed_and_completed.completed = Some(at_millis(1_000));
    delayed_and_completed.delayed_until = Some(at_millis(3_000));
    assert_eq!(
        classify(Some(&delayed_and_completed)).kind(),
        StatusKind::Delayed
    );
}

#[test]
fn archive_url_uses_completion_time_in_utc() {
    let mut done = Job::new(5, "https://example.com/a?b=c");
    done.completed = Some(Timestamp::new(
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
    ));
    assert_eq!(
        archive_url(&done).as_deref(),
        Some("https://web.archive.org/web/20240102030405/https://example.com/a?b=c")
    );

    assert_eq!(archive_url(&Job::new(6, "https://example.com")), None);
}

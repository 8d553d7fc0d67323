use std::sync::Once;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use monitor_core::{
    update, Effect, Job, Msg, PollConfig, PollState, Stats, StatusKind, Timestamp,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(monitor_logging::initialize_for_tests);
}

fn running(id: u64) -> Job {
    let mut job = Job::new(id, format!("https://example.com/{id}"));
    job.created_at = Some(Timestamp::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()));
    job
}

fn finished(id: u64) -> Job {
    let mut job = running(id);
    job.completed = Some(Timestamp::new(Utc.timestamp_opt(1_700_000_030, 0).unwrap()));
    job
}

/// Drives one full cycle, answering `ResolveOutgoingJob` with `lookup`.
fn cycle_with(
    state: PollState,
    current: Option<Job>,
    lookup: impl Fn(&Job) -> Option<Job>,
) -> (PollState, Vec<Effect>) {
    let (state, effects) = update(state, Msg::CycleStarted);
    assert!(effects.is_empty());
    let (mut state, effects) = update(state, Msg::CurrentJobLoaded(current));
    for effect in effects {
        match effect {
            Effect::ResolveOutgoingJob { job } => {
                let latest = lookup(&job);
                let (next, follow_up) = update(
                    state,
                    Msg::OutgoingJobResolved {
                        outgoing: job,
                        latest,
                    },
                );
                assert!(follow_up.is_empty());
                state = next;
            }
            other => panic!("unexpected mid-cycle effect {other:?}"),
        }
    }
    update(state, Msg::CycleFinished)
}

fn cycle(state: PollState, current: Option<Job>) -> PollState {
    cycle_with(state, current, |job| Some(finished(job.id))).0
}

#[test]
fn cycle_finish_schedules_next_poll_after_period() {
    init_logging();
    let config = PollConfig {
        period: Duration::from_millis(250),
        display_window: 15,
    };
    let (state, effects) = cycle_with(PollState::new(config), None, |_| None);
    assert_eq!(
        effects,
        vec![Effect::ScheduleNextPoll {
            delay: Duration::from_millis(250)
        }]
    );
    assert_eq!(state.cycle(), 1);
}

#[test]
fn job_disappearing_requests_final_state_and_shows_it() {
    init_logging();
    let state = cycle(PollState::default(), Some(running(1)));
    assert_eq!(state.current().map(|j| j.id), Some(1));
    assert!(state.previous().is_none());

    let (state, _) = update(state, Msg::CycleStarted);
    let (state, effects) = update(state, Msg::CurrentJobLoaded(None));
    assert_eq!(effects, vec![Effect::ResolveOutgoingJob { job: running(1) }]);
    assert!(state.current().is_none());

    let (state, _) = update(
        state,
        Msg::OutgoingJobResolved {
            outgoing: running(1),
            latest: Some(finished(1)),
        },
    );
    let (state, _) = update(state, Msg::CycleFinished);

    assert_eq!(state.previous(), Some(&finished(1)));
    assert_eq!(state.previous_age(), 0);
    let view = state.view();
    let recent = view.recent.expect("recent banner");
    assert_eq!(recent.status.kind(), StatusKind::Completed);
    assert!(recent.archive_url.is_some());
    assert_eq!(view.current.status.kind(), StatusKind::None);
}

#[test]
fn job_replaced_by_another_captures_outgoing_job() {
    init_logging();
    let state = cycle(PollState::default(), Some(running(1)));
    let (state, _) = update(state, Msg::CycleStarted);
    let (_, effects) = update(state, Msg::CurrentJobLoaded(Some(running(2))));
    assert_eq!(effects, vec![Effect::ResolveOutgoingJob { job: running(1) }]);

    let state = cycle(PollState::default(), Some(running(1)));
    let state = cycle(state, Some(running(2)));
    assert_eq!(state.current().map(|j| j.id), Some(2));
    assert_eq!(state.previous(), Some(&finished(1)));
}

#[test]
fn failed_lookup_falls_back_to_last_seen_record() {
    init_logging();
    let state = cycle(PollState::default(), Some(running(1)));
    let (state, _) = cycle_with(state, None, |_| None);
    assert_eq!(state.previous(), Some(&running(1)));

    // A record for a different id is not trusted either.
    let state = cycle(PollState::default(), Some(running(1)));
    let (state, _) = cycle_with(state, None, |_| Some(finished(99)));
    assert_eq!(state.previous(), Some(&running(1)));
}

#[test]
fn job_appearing_clears_recent_banner_without_lookup() {
    init_logging();
    let state = cycle(PollState::default(), Some(running(1)));
    let state = cycle(state, None);
    assert!(state.previous().is_some());

    let (state, _) = update(state, Msg::CycleStarted);
    let (state, effects) = update(state, Msg::CurrentJobLoaded(Some(running(2))));
    assert!(effects.is_empty());
    assert!(state.previous().is_none());
}

#[test]
fn recent_banner_visible_for_exactly_the_display_window() {
    init_logging();
    // [J1, J1, None, None x 20]
    let mut state = cycle(PollState::default(), Some(running(1)));
    state = cycle(state, Some(running(1)));
    state = cycle(state, None);

    let mut visible = 1;
    assert!(state.view().recent.is_some());
    for _ in 0..20 {
        state = cycle(state, None);
        if state.view().recent.is_some() {
            visible += 1;
        }
    }
    assert_eq!(visible, 15);
    assert!(state.previous().is_none());
    assert_eq!(state.previous_age(), 0);
}

#[test]
fn banner_appears_after_each_transition_and_expires_independently() {
    init_logging();
    // [J1, J1, None, J2, J2, ..., None, ...]
    let mut state = cycle(PollState::default(), Some(running(1)));
    state = cycle(state, Some(running(1)));
    assert!(state.view().recent.is_none());

    state = cycle(state, None);
    assert_eq!(state.previous().map(|j| j.id), Some(1));

    state = cycle(state, Some(running(2)));
    assert!(state.previous().is_none());
    for _ in 0..5 {
        state = cycle(state, Some(running(2)));
        assert!(state.previous().is_none());
    }

    state = cycle(state, None);
    assert_eq!(state.previous().map(|j| j.id), Some(2));
    let captured = state.cycle();

    for _ in 0..14 {
        state = cycle(state, None);
        assert_eq!(state.previous().map(|j| j.id), Some(2));
    }
    assert_eq!(state.previous_age(), 14);

    state = cycle(state, None);
    assert!(state.previous().is_none());
    assert_eq!(state.cycle(), captured + 15);
}

#[test]
fn new_transition_restarts_the_window() {
    init_logging();
    let mut state = cycle(PollState::default(), Some(running(1)));
    state = cycle(state, Some(running(2)));
    for _ in 0..10 {
        state = cycle(state, Some(running(2)));
    }
    assert_eq!(state.previous_age(), 10);

    state = cycle(state, Some(running(3)));
    assert_eq!(state.previous().map(|j| j.id), Some(2));
    assert_eq!(state.previous_age(), 0);
}

#[test]
fn unchanged_current_job_causes_no_transitions() {
    init_logging();
    let mut state = cycle(PollState::default(), Some(running(1)));
    let transition = state.last_transition_cycle();
    for _ in 0..30 {
        let (next, effects) = cycle_with(state, Some(running(1)), |_| {
            panic!("no lookup expected for an unchanged job")
        });
        assert_eq!(effects.len(), 1);
        state = next;
        assert!(state.previous().is_none());
        assert_eq!(state.last_transition_cycle(), transition);
    }

    // Same identity with refreshed fields is still no transition.
    let mut refreshed = running(1);
    refreshed.retry = 1;
    let (state, _) = cycle_with(state, Some(refreshed.clone()), |_| {
        panic!("no lookup expected for an unchanged job")
    });
    assert_eq!(state.current(), Some(&refreshed));
}

#[test]
fn steady_current_job_does_not_reset_an_existing_banner() {
    init_logging();
    let mut state = cycle(PollState::default(), Some(running(1)));
    state = cycle(state, Some(running(2)));
    let captured = state.last_transition_cycle();
    for expected_age in 1..=5 {
        state = cycle(state, Some(running(2)));
        assert_eq!(state.previous_age(), expected_age);
        assert_eq!(state.last_transition_cycle(), captured);
    }
}

#[test]
fn stats_replace_wholesale_and_mark_dirty_only_on_change() {
    init_logging();
    let mut stats = Stats::default();
    stats.batches = 3;
    stats.jobs.total = 40;

    let (mut state, _) = update(PollState::default(), Msg::StatsLoaded(stats));
    assert_eq!(state.stats(), Some(&stats));
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::StatsLoaded(stats));
    assert!(!state.consume_dirty());

    let replacement = Stats::default();
    let (state, _) = update(state, Msg::StatsLoaded(replacement));
    assert_eq!(state.stats(), Some(&replacement));
}

#[test]
fn consuming_the_change_flag_leaves_the_view_intact() {
    init_logging();
    let state = cycle(PollState::default(), Some(running(1)));
    let mut state = cycle(state, None);
    let before = state.view();

    assert!(state.consume_dirty());
    assert_eq!(state.view(), before);
    assert!(!state.consume_dirty());
    assert_eq!(before.recent.and_then(|banner| banner.job).map(|job| job.id), Some(1));
}

use std::time::Duration;

use crate::view_model::{DashboardView, JobBanner, PageMeta};
use crate::{Effect, Job, Stats};

/// Timing of the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Pause between the end of one cycle and the start of the next.
    pub period: Duration,
    /// Cycles a just-finished job stays visible, capture cycle included.
    pub display_window: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(1000),
            display_window: 15,
        }
    }
}

/// The job that most recently stopped being current.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RecentJob {
    /// `None` when the transition was from "no job" to a job.
    job: Option<Job>,
    captured_at: u64,
}

/// State owned by the polling controller. Only `update` mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PollState {
    config: PollConfig,
    cycle: u64,
    current: Option<Job>,
    recent: Option<RecentJob>,
    stats: Option<Stats>,
    dirty: bool,
}

impl PollState {
    pub fn new(config: PollConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Number of cycles started so far.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn current(&self) -> Option<&Job> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&Job> {
        self.recent.as_ref().and_then(|recent| recent.job.as_ref())
    }

    /// Cycles elapsed since `previous` was captured; 0 when there is none.
    pub fn previous_age(&self) -> u64 {
        match &self.recent {
            Some(recent) if recent.job.is_some() => self.cycle - recent.captured_at,
            _ => 0,
        }
    }

    /// Cycle in which the last transition was recorded.
    pub fn last_transition_cycle(&self) -> Option<u64> {
        self.recent.as_ref().map(|recent| recent.captured_at)
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            page: PageMeta::home(),
            cycle: self.cycle,
            current: JobBanner::current(self.current.as_ref()),
            recent: self.previous().map(JobBanner::recent),
            stats: self.stats,
        }
    }

    /// Returns whether anything visible changed since the last call, and
    /// clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn begin_cycle(&mut self) {
        self.cycle += 1;
    }

    pub(crate) fn apply_current_job(&mut self, job: Option<Job>) -> Vec<Effect> {
        let effects = match (self.current.as_ref(), job.as_ref()) {
            (None, None) => Vec::new(),
            (Some(current), Some(next)) if current.id == next.id => Vec::new(),
            (None, Some(_)) => {
                self.capture(None);
                Vec::new()
            }
            (Some(current), _) => vec![Effect::ResolveOutgoingJob {
                job: current.clone(),
            }],
        };
        if self.current != job {
            self.current = job;
            self.dirty = true;
        }
        effects
    }

    pub(crate) fn apply_outgoing(&mut self, outgoing: Job, latest: Option<Job>) {
        let job = match latest {
            Some(latest) if latest.id == outgoing.id => latest,
            _ => outgoing,
        };
        self.capture(Some(job));
    }

    pub(crate) fn apply_stats(&mut self, stats: Stats) {
        if self.stats.as_ref() != Some(&stats) {
            self.dirty = true;
        }
        self.stats = Some(stats);
    }

    pub(crate) fn finish_cycle(&mut self) -> Vec<Effect> {
        let window = u64::from(self.config.display_window);
        if self.previous().is_some() && self.previous_age() >= window {
            self.recent = None;
            self.dirty = true;
        }
        vec![Effect::ScheduleNextPoll {
            delay: self.config.period,
        }]
    }

    fn capture(&mut self, job: Option<Job>) {
        if self.previous().is_some() || job.is_some() {
            self.dirty = true;
        }
        self.recent = Some(RecentJob {
            job,
            captured_at: self.cycle,
        });
    }
}

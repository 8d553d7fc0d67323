use std::sync::Arc;
use std::time::Duration;

use monitor_core::{update, DashboardView, Effect, Msg, PollConfig, PollState};
use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use tokio_util::sync::CancellationToken;

use crate::BackendApi;

/// Receives a fresh dashboard view whenever something visible changed.
pub trait ViewSink: Send + Sync {
    fn publish(&self, view: DashboardView);
}

pub struct ChannelViewSink {
    tx: std::sync::mpsc::Sender<DashboardView>,
}

impl ChannelViewSink {
    pub fn new(tx: std::sync::mpsc::Sender<DashboardView>) -> Self {
        Self { tx }
    }
}

impl ViewSink for ChannelViewSink {
    fn publish(&self, view: DashboardView) {
        let _ = self.tx.send(view);
    }
}

/// Drives [`PollState`] against a backend, one strictly sequential cycle at a
/// time.
pub struct Poller {
    backend: Arc<dyn BackendApi>,
    state: PollState,
    next_delay: Duration,
}

impl Poller {
    pub fn new(backend: Arc<dyn BackendApi>, config: PollConfig) -> Self {
        Self {
            backend,
            state: PollState::new(config),
            next_delay: config.period,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn view(&self) -> DashboardView {
        self.state.view()
    }

    /// Delay before the next cycle, as scheduled by the last finished one.
    pub fn next_delay(&self) -> Duration {
        self.next_delay
    }

    /// Runs one cycle to completion. Fetch errors are logged and absorbed;
    /// the cycle always finishes.
    pub async fn run_cycle(&mut self) {
        self.dispatch(Msg::CycleStarted);
        let cycle = self.state.cycle();

        let (current, stats) =
            futures_util::future::join(self.backend.current_job(), self.backend.stats()).await;

        let current = match current {
            Ok(job) => job,
            Err(err) => {
                monitor_warn!("cycle {}: current job unavailable: {}", cycle, err);
                None
            }
        };
        let effects = self.dispatch(Msg::CurrentJobLoaded(current));
        self.run_effects(effects).await;

        match stats {
            Ok(stats) => {
                self.dispatch(Msg::StatsLoaded(stats));
            }
            Err(err) => monitor_warn!("cycle {}: stats unavailable: {}", cycle, err),
        }

        let effects = self.dispatch(Msg::CycleFinished);
        self.run_effects(effects).await;
    }

    /// Polls until `cancel` fires. Cancellation is only observed between
    /// cycles; a cycle in flight always completes.
    pub async fn run(mut self, sink: &dyn ViewSink, cancel: CancellationToken) {
        monitor_info!(
            "Polling every {:?}, recent jobs shown for {} cycles",
            self.state.config().period,
            self.state.config().display_window
        );
        while !cancel.is_cancelled() {
            self.run_cycle().await;
            if self.state.consume_dirty() {
                sink.publish(self.state.view());
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.next_delay) => {}
            }
        }
        monitor_info!("Polling stopped after {} cycles", self.state.cycle());
    }

    async fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ResolveOutgoingJob { job } => {
                    monitor_debug!("Job {} left the current slot, fetching final state", job.id);
                    let latest = match self.backend.job(job.id).await {
                        Ok(Some(latest)) => Some(latest),
                        Ok(None) => {
                            monitor_warn!("Job {} not found, keeping last seen state", job.id);
                            None
                        }
                        Err(err) => {
                            monitor_warn!("Job {} lookup failed: {}", job.id, err);
                            None
                        }
                    };
                    self.dispatch(Msg::OutgoingJobResolved {
                        outgoing: job,
                        latest,
                    });
                }
                Effect::ScheduleNextPoll { delay } => {
                    self.next_delay = delay;
                }
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        effects
    }
}

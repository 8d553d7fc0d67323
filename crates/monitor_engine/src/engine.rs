use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use monitor_core::{DashboardView, PollConfig};
use monitor_logging::monitor_error;
use tokio_util::sync::CancellationToken;

use crate::poller::{ChannelViewSink, Poller};
use crate::BackendApi;

/// The poller thread is gone, so its channel is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("poller thread has stopped")]
pub struct PollerStopped;

/// Runs the poller on its own thread for synchronous consumers.
///
/// Views arrive over a channel; dropping or stopping the handle cancels the
/// loop once the cycle in flight has finished.
pub struct MonitorHandle {
    cancel: CancellationToken,
    view_rx: mpsc::Receiver<DashboardView>,
    worker: Option<JoinHandle<()>>,
}

impl MonitorHandle {
    pub fn spawn(backend: Arc<dyn BackendApi>, config: PollConfig) -> Self {
        let (view_tx, view_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let worker = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    monitor_error!("Could not start poller runtime: {}", err);
                    return;
                }
            };
            let sink = ChannelViewSink::new(view_tx);
            runtime.block_on(Poller::new(backend, config).run(&sink, token));
        });

        Self {
            cancel,
            view_rx,
            worker: Some(worker),
        }
    }

    /// Waits up to `timeout` for the next view. `Ok(None)` means nothing
    /// changed in time; an error means the worker has exited and no view
    /// will ever arrive.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<DashboardView>, PollerStopped> {
        match self.view_rx.recv_timeout(timeout) {
            Ok(view) => Ok(Some(view)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(PollerStopped),
        }
    }

    /// Cancels polling and waits for the worker to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

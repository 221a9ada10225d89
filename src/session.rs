use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::system::collector::Collector;
use crate::system::history::{UsageHistory, UsageSample};
use crate::system::kill::{self, TerminateError};
use crate::system::sampler::{SampleError, Sampler};
use crate::system::snapshot::Snapshot;

/// What the monitor worker delivers back to its consumer.
///
/// `seq` increases monotonically across all events from one session, so
/// consumers can apply results in tick order.
#[derive(Clone, Debug)]
pub enum MonitorEvent {
    /// A new aggregate sample was recorded into the history.
    Sample { seq: u64, sample: UsageSample },
    /// Sampling failed this tick; the loop continues on the next one.
    SampleFailed { seq: u64, error: SampleError },
    /// A requested process enumeration completed.
    Snapshot { seq: u64, snapshot: Snapshot },
}

enum Command {
    Refresh(String),
}

/// One monitoring session: a background worker that samples aggregate
/// usage on a fixed interval and enumerates processes on request.
///
/// Process enumeration is deliberately not tied to the tick. Only the
/// aggregate history is fresh at every tick; the process table refreshes
/// when a consumer asks via [`request_refresh`](Self::request_refresh),
/// matching the explicit-refresh behavior of the table it feeds.
pub struct MonitorSession {
    cmd_tx: mpsc::UnboundedSender<Command>,
    event_rx: mpsc::UnboundedReceiver<MonitorEvent>,
    history: Arc<Mutex<UsageHistory>>,
    worker: JoinHandle<()>,
}

impl MonitorSession {
    /// Spawn the worker and start ticking immediately.
    pub fn start(config: &Config) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let history = Arc::new(Mutex::new(UsageHistory::new(
            config.general.history_capacity,
        )));

        let worker = tokio::spawn(run_worker(
            Duration::from_millis(config.general.refresh_rate_ms),
            PathBuf::from(&config.general.disk_path),
            Arc::clone(&history),
            cmd_rx,
            event_tx,
        ));

        MonitorSession {
            cmd_tx,
            event_rx,
            history,
            worker,
        }
    }

    /// Ask the worker for a fresh enumeration; the result arrives as a
    /// [`MonitorEvent::Snapshot`].
    pub fn request_refresh(&self, filter: &str) {
        let _ = self.cmd_tx.send(Command::Refresh(filter.to_string()));
    }

    /// Next event from the worker, in emission order. Returns `None`
    /// once the session has stopped.
    pub async fn next_event(&mut self) -> Option<MonitorEvent> {
        self.event_rx.recv().await
    }

    /// Copy-on-read view of the recorded (cpu, memory) series.
    pub fn history(&self) -> (Vec<f32>, Vec<f32>) {
        lock_history(&self.history).series()
    }

    /// Most recently recorded sample, if any tick has completed.
    pub fn latest_sample(&self) -> Option<UsageSample> {
        lock_history(&self.history).latest()
    }

    /// Send SIGTERM to `pid`. The session does not mutate any snapshot
    /// on success; call [`request_refresh`](Self::request_refresh) to
    /// observe the updated process set.
    pub fn terminate(&self, pid: u32) -> Result<(), TerminateError> {
        kill::terminate(pid)
    }

    /// Cancel future ticks. In-flight work is dropped, not awaited.
    pub fn stop(&self) {
        self.worker.abort();
    }
}

impl Drop for MonitorSession {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

fn lock_history(history: &Mutex<UsageHistory>) -> MutexGuard<'_, UsageHistory> {
    history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn run_worker(
    tick: Duration,
    disk_path: PathBuf,
    history: Arc<Mutex<UsageHistory>>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    event_tx: mpsc::UnboundedSender<MonitorEvent>,
) {
    let mut collector = Collector::new();
    let mut sampler = Sampler::new();
    let mut interval = tokio::time::interval(tick);
    let mut seq: u64 = 0;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                seq += 1;
                let event = match sampler.sample(&disk_path) {
                    Ok(sample) => {
                        lock_history(&history).record(sample);
                        MonitorEvent::Sample { seq, sample }
                    }
                    Err(error) => {
                        log::warn!("aggregate sampling failed: {error}");
                        MonitorEvent::SampleFailed { seq, error }
                    }
                };
                if event_tx.send(event).is_err() {
                    break;
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(Command::Refresh(filter)) => {
                        seq += 1;
                        let snapshot = collector.enumerate(&filter);
                        if event_tx.send(MonitorEvent::Snapshot { seq, snapshot }).is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
}

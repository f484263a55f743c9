use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::bus::EventBus;
use crate::catalog::ActionCatalog;
use crate::events::ResultEvent;
use crate::fsops;
use crate::model::{Action, OperationSpec};
use crate::process;

pub const CLEAR_ALL_TITLE: &str = "Clear All";
pub const CLEAR_ALL_MESSAGE: &str = "All Xcode caches, archives, and simulators cleared successfully!";

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("task engine worker has stopped")]
    Stopped,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("task engine worker panicked")]
    WorkerPanicked,
}

enum Job {
    Perform(Action),
    PerformAll,
}

/// Runs catalog actions one at a time on a dedicated worker thread.
///
/// Requests are queued FIFO; an operation's progress and result events are
/// all published before the next operation starts. Operations cannot be
/// cancelled once started.
pub struct TaskEngine {
    queue: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    bus: EventBus,
}

impl TaskEngine {
    pub fn start(catalog: ActionCatalog, bus: EventBus) -> Result<Self, EngineError> {
        let (tx, rx) = mpsc::channel();
        let running = Arc::new(AtomicBool::new(false));
        let worker = Worker {
            catalog,
            bus: bus.clone(),
            running: Arc::clone(&running),
        };
        let handle = thread::Builder::new()
            .name("reclaim-worker".into())
            .spawn(move || worker.run(rx))?;
        Ok(Self {
            queue: Some(tx),
            worker: Some(handle),
            running,
            bus,
        })
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Queue one action behind whatever is already pending.
    pub fn perform(&self, action: Action) -> Result<(), EngineError> {
        self.enqueue(Job::Perform(action))
    }

    /// Queue every action in catalog order, followed by one aggregate
    /// "Clear All" result.
    pub fn perform_all(&self) -> Result<(), EngineError> {
        self.enqueue(Job::PerformAll)
    }

    /// Whether the worker is executing an operation right now.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop accepting work, finish everything already queued, and join the
    /// worker.
    pub fn shutdown(mut self) -> Result<(), EngineError> {
        self.stop()
    }

    fn enqueue(&self, job: Job) -> Result<(), EngineError> {
        let queue = self.queue.as_ref().ok_or(EngineError::Stopped)?;
        queue.send(job).map_err(|_| EngineError::Stopped)
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        drop(self.queue.take());
        match self.worker.take() {
            Some(handle) => handle.join().map_err(|_| EngineError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for TaskEngine {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            tracing::error!("{e}");
        }
    }
}

struct Worker {
    catalog: ActionCatalog,
    bus: EventBus,
    running: Arc<AtomicBool>,
}

impl Worker {
    fn run(self, jobs: Receiver<Job>) {
        for job in jobs {
            self.running.store(true, Ordering::SeqCst);
            match job {
                Job::Perform(action) => self.perform(action),
                Job::PerformAll => {
                    for action in Action::ALL {
                        self.perform(action);
                    }
                    self.bus
                        .publish_result(ResultEvent::success(CLEAR_ALL_TITLE, CLEAR_ALL_MESSAGE));
                }
            }
            self.running.store(false, Ordering::SeqCst);
        }
        tracing::debug!("worker queue closed");
    }

    fn perform(&self, action: Action) {
        let job_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("job", %action, %job_id);
        let _guard = span.enter();

        let spec = self.catalog.resolve(action);
        tracing::info!(target_path = %spec.target(), "starting");
        let started = Instant::now();

        let result = dispatch(spec, &self.bus);

        let elapsed = humantime::format_duration(truncate_to_millis(started.elapsed()));
        tracing::info!(success = result.success, %elapsed, "finished");
        self.bus.publish_result(result);
    }
}

/// Execute one operation synchronously on the calling thread.
///
/// Progress events are published on `bus` as the operation runs; the
/// returned result is not.
pub fn dispatch(spec: &OperationSpec, bus: &EventBus) -> ResultEvent {
    match spec {
        OperationSpec::DirectoryPurge { path, label } => fsops::purge(path, label, bus),
        OperationSpec::ShellCommand {
            program,
            args,
            label,
            success_message,
            failure_message,
        } => process::run(program, args, label, success_message, failure_message),
    }
}

fn truncate_to_millis(d: std::time::Duration) -> std::time::Duration {
    std::time::Duration::from_millis(d.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perform_after_shutdown_reports_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = TaskEngine::start(ActionCatalog::new(dir.path()), EventBus::new()).unwrap();
        engine.stop().unwrap();
        assert!(matches!(
            engine.perform(Action::PurgeArchives),
            Err(EngineError::Stopped)
        ));
    }

    #[test]
    fn idle_engine_is_not_running() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TaskEngine::start(ActionCatalog::new(dir.path()), EventBus::new()).unwrap();
        assert!(!engine.is_running());
        engine.shutdown().unwrap();
    }

    #[test]
    fn dispatch_missing_folder_emits_no_progress() {
        let dir = tempfile::tempdir().unwrap();
        let bus = EventBus::new();
        let progress = bus.subscribe_progress();
        let spec = OperationSpec::DirectoryPurge {
            path: dir.path().join("missing"),
            label: "DerivedData".into(),
        };
        let result = dispatch(&spec, &bus);
        assert_eq!(result, ResultEvent::failure("Info", "DerivedData folder not found!"));
        assert!(progress.try_recv().is_err());
    }
}

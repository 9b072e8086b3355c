//! Process lifecycle manager.
//!
//! Owns the single background ingestion worker: idempotent start/stop,
//! explicit readiness signalling (no fixed startup sleep), cooperative
//! shutdown with a bounded wait, crash reporting, and the periodic session
//! eviction sweep.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tracing::{error, info, warn};

use conversation::ConversationStateMachine;
use resume_core::error::{Error, Result};
use resume_core::limits::{SESSION_TTL, SWEEP_INTERVAL};

use crate::gateway::MessageGateway;
use crate::ingest::IngestWorker;

/// Lifecycle phase of the ingestion worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Stopped,
    Starting,
    Running,
    Stopping,
    Crashed,
}

/// How the worker is executed. One manager, parameterized by mode, replaces
/// the per-deployment copies this design descends from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Worker runs as a task on the shared runtime.
    #[default]
    Direct,
    /// Worker runs on a dedicated thread with its own single-threaded
    /// runtime.
    Threaded,
}

/// Lifecycle configuration.
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub mode: DeploymentMode,
    /// Bound on waiting for the worker's readiness signal.
    pub start_timeout: Duration,
    /// Bound on waiting for the worker to exit after a stop signal.
    pub stop_timeout: Duration,
    /// Interval between session eviction sweeps.
    pub sweep_interval: Duration,
    /// Inactivity window before a session is reclaimed.
    pub session_ttl: Duration,
    /// Pause between failed provider polls.
    pub poll_backoff: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::Direct,
            start_timeout: Duration::from_secs(3),
            stop_timeout: Duration::from_secs(5),
            sweep_interval: SWEEP_INTERVAL,
            session_ttl: SESSION_TTL,
            poll_backoff: Duration::from_secs(1),
        }
    }
}

/// Pure-read status report.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatusReport {
    pub phase: Phase,
    pub worker_alive: bool,
    pub crashed: bool,
}

/// Outcome of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Clean,
    /// The worker did not exit within the bound; it is left to finish its
    /// in-flight call and is never force-killed.
    TimedOut,
}

/// Shared phase cell; the worker marks crashes and clean exits itself.
#[derive(Debug)]
pub struct PhaseCell(RwLock<Phase>);

impl PhaseCell {
    pub fn new() -> Self {
        Self(RwLock::new(Phase::Stopped))
    }

    pub fn get(&self) -> Phase {
        *self.0.read()
    }

    pub fn set(&self, phase: Phase) {
        *self.0.write() = phase;
    }

    /// Sets `new` only if the current phase is `expected`.
    pub fn compare_set(&self, expected: Phase, new: Phase) -> bool {
        let mut guard = self.0.write();
        if *guard == expected {
            *guard = new;
            true
        } else {
            false
        }
    }
}

impl Default for PhaseCell {
    fn default() -> Self {
        Self::new()
    }
}

enum WorkerHandle {
    Task(tokio::task::JoinHandle<()>),
    Thread(std::thread::JoinHandle<()>),
}

impl WorkerHandle {
    fn is_alive(&self) -> bool {
        match self {
            Self::Task(handle) => !handle.is_finished(),
            Self::Thread(handle) => !handle.is_finished(),
        }
    }
}

struct WorkerRuntime {
    stop_tx: watch::Sender<bool>,
    done_rx: Option<oneshot::Receiver<()>>,
    handle: WorkerHandle,
    sweep: tokio::task::JoinHandle<()>,
}

/// Single global supervisor for the ingestion worker.
pub struct ProcessLifecycleManager {
    config: LifecycleConfig,
    gateway: Arc<dyn MessageGateway>,
    machine: Arc<ConversationStateMachine>,
    phase: Arc<PhaseCell>,
    /// Serializes start/stop; never held across status reads.
    op_lock: tokio::sync::Mutex<()>,
    runtime: Mutex<Option<WorkerRuntime>>,
}

impl ProcessLifecycleManager {
    pub fn new(
        config: LifecycleConfig,
        gateway: Arc<dyn MessageGateway>,
        machine: Arc<ConversationStateMachine>,
    ) -> Self {
        Self {
            config,
            gateway,
            machine,
            phase: Arc::new(PhaseCell::new()),
            op_lock: tokio::sync::Mutex::new(()),
            runtime: Mutex::new(None),
        }
    }

    /// Starts the worker. Rejected while any worker exists; a crashed worker
    /// counts as stopped for restart purposes.
    ///
    /// Blocks until the worker signals readiness (bounded by
    /// `start_timeout`), so success means the worker verified its provider
    /// connection; there is no fixed startup sleep.
    pub async fn start(&self) -> Result<()> {
        let _op = self.op_lock.lock().await;

        match self.phase.get() {
            Phase::Stopped | Phase::Crashed => {}
            _ => return Err(Error::already_running()),
        }
        self.phase.set(Phase::Starting);

        // A crashed predecessor leaves its runtime behind; reap it.
        if let Some(previous) = self.runtime.lock().take() {
            previous.sweep.abort();
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let (ready_tx, ready_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        let worker = IngestWorker::new(
            self.gateway.clone(),
            self.machine.clone(),
            self.phase.clone(),
            stop_rx,
            self.config.poll_backoff,
        );

        let handle = match self.config.mode {
            DeploymentMode::Direct => {
                WorkerHandle::Task(tokio::spawn(worker.run(ready_tx, done_tx)))
            }
            DeploymentMode::Threaded => {
                let thread = std::thread::Builder::new()
                    .name("ingest-worker".to_string())
                    .spawn(move || match tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()
                    {
                        Ok(runtime) => runtime.block_on(worker.run(ready_tx, done_tx)),
                        Err(e) => {
                            error!(error = %e, "worker runtime construction failed");
                            let _ = ready_tx.send(Err(e.to_string()));
                            let _ = done_tx.send(());
                        }
                    })
                    .map_err(|e| {
                        self.phase.set(Phase::Stopped);
                        Error::internal(format!("failed to spawn worker thread: {e}"))
                    })?;
                WorkerHandle::Thread(thread)
            }
        };

        match tokio::time::timeout(self.config.start_timeout, ready_rx).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(message))) => {
                // Worker failed its own initialization and has exited.
                self.phase.set(Phase::Stopped);
                return Err(Error::internal(format!("worker failed to start: {message}")));
            }
            Ok(Err(_)) => {
                self.phase.set(Phase::Crashed);
                return Err(Error::WorkerCrashed(
                    "worker exited before signalling readiness".to_string(),
                ));
            }
            Err(_) => {
                self.phase.set(Phase::Crashed);
                return Err(Error::WorkerCrashed(format!(
                    "worker did not signal readiness within {:?}",
                    self.config.start_timeout
                )));
            }
        }

        // The worker may have crashed in the window after signalling ready;
        // only promote Starting to Running.
        if !self.phase.compare_set(Phase::Starting, Phase::Running) {
            return Err(Error::WorkerCrashed(
                "worker crashed during startup".to_string(),
            ));
        }
        let sweep = self.spawn_sweep();
        *self.runtime.lock() = Some(WorkerRuntime {
            stop_tx,
            done_rx: Some(done_rx),
            handle,
            sweep,
        });

        info!(mode = ?self.config.mode, "ingestion worker running");
        Ok(())
    }

    /// Signals the worker to stop cooperatively and waits up to
    /// `stop_timeout` for it to exit. On timeout the phase stays Stopping
    /// and the worker finishes on its own; it is never force-killed.
    pub async fn stop(&self) -> Result<StopOutcome> {
        let _op = self.op_lock.lock().await;

        if self.phase.get() != Phase::Running {
            return Err(Error::not_running());
        }
        self.phase.set(Phase::Stopping);

        let Some(mut runtime) = self.runtime.lock().take() else {
            // Phase said Running but no worker exists; repair the phase.
            self.phase.set(Phase::Stopped);
            return Err(Error::not_running());
        };

        runtime.sweep.abort();
        let _ = runtime.stop_tx.send(true);

        let done_rx = runtime.done_rx.take();
        let outcome = match done_rx {
            Some(done_rx) => {
                match tokio::time::timeout(self.config.stop_timeout, done_rx).await {
                    Ok(_) => StopOutcome::Clean,
                    Err(_) => StopOutcome::TimedOut,
                }
            }
            None => StopOutcome::Clean,
        };

        match outcome {
            StopOutcome::Clean => {
                // The worker set the final phase (Stopped, or Crashed if it
                // died mid-shutdown) before signalling done.
                info!("ingestion worker stopped");
            }
            StopOutcome::TimedOut => {
                warn!(
                    timeout = ?self.config.stop_timeout,
                    "worker did not exit in time; leaving it to finish"
                );
                // Keep the handle so status() can still see the straggler.
                *self.runtime.lock() = Some(runtime);
            }
        }

        Ok(outcome)
    }

    /// Pure read: current phase, whether a worker execution unit is alive,
    /// and whether the last exit was a crash.
    pub fn status(&self) -> StatusReport {
        let phase = self.phase.get();
        let worker_alive = self
            .runtime
            .lock()
            .as_ref()
            .map(|r| r.handle.is_alive())
            .unwrap_or(false);

        StatusReport {
            phase,
            worker_alive,
            crashed: phase == Phase::Crashed,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    fn spawn_sweep(&self) -> tokio::task::JoinHandle<()> {
        let store = self.machine.store().clone();
        let interval = self.config.sweep_interval;
        let ttl = self.config.session_ttl;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // immediate first tick
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(ttl);
                if evicted > 0 {
                    info!(evicted = evicted, "session sweep reclaimed idle sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InboundUpdate;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Gateway that polls nothing, with programmable connection failure.
    struct IdleGateway {
        fail_connection: AtomicBool,
        fail_polls: AtomicBool,
    }

    impl IdleGateway {
        fn new() -> Self {
            Self {
                fail_connection: AtomicBool::new(false),
                fail_polls: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl MessageGateway for IdleGateway {
        async fn check_connection(&self) -> Result<()> {
            if self.fail_connection.load(Ordering::SeqCst) {
                return Err(Error::provider("unauthorized"));
            }
            Ok(())
        }

        async fn poll_updates(&self, offset: i64) -> Result<(Vec<InboundUpdate>, i64)> {
            if self.fail_polls.load(Ordering::SeqCst) {
                return Err(Error::provider("poll failed"));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok((Vec::new(), offset))
        }

        async fn download_document(&self, _file_id: &str) -> Result<Bytes> {
            Err(Error::provider("no documents here"))
        }

        async fn send_text(&self, _chat_id: i64, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn send_document(&self, _chat_id: i64, _name: &str, _bytes: Bytes) -> Result<()> {
            Ok(())
        }
    }

    struct NullAnalyzer;

    #[async_trait]
    impl gemini_client::ResumeAnalyzer for NullAnalyzer {
        async fn analyze_resume(&self, _text: &str) -> Result<resume_core::ResumeData> {
            Ok(resume_core::ResumeData::default())
        }

        async fn chat(
            &self,
            _question: &str,
            _resume: &resume_core::ResumeData,
        ) -> Result<String> {
            Ok("ok".to_string())
        }

        async fn interview_prep(
            &self,
            _resume: &resume_core::ResumeData,
            _interview_type: resume_core::InterviewType,
        ) -> Result<resume_core::InterviewGuide> {
            Ok(resume_core::InterviewGuide::default())
        }
    }

    fn manager_with(gateway: Arc<IdleGateway>, mode: DeploymentMode) -> ProcessLifecycleManager {
        let machine = Arc::new(ConversationStateMachine::new(
            Arc::new(conversation::SessionStore::new()),
            Arc::new(extract::DocumentTextExtractor::new()),
            Arc::new(NullAnalyzer),
        ));
        let config = LifecycleConfig {
            mode,
            start_timeout: Duration::from_secs(1),
            stop_timeout: Duration::from_secs(1),
            poll_backoff: Duration::from_millis(1),
            ..Default::default()
        };
        ProcessLifecycleManager::new(config, gateway, machine)
    }

    #[tokio::test]
    async fn test_start_reaches_running() {
        let manager = manager_with(Arc::new(IdleGateway::new()), DeploymentMode::Direct);

        manager.start().await.unwrap();
        let status = manager.status();
        assert_eq!(status.phase, Phase::Running);
        assert!(status.worker_alive);
        assert!(!status.crashed);

        manager.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_double_start_rejected_with_one_worker_alive() {
        let manager = manager_with(Arc::new(IdleGateway::new()), DeploymentMode::Direct);

        manager.start().await.unwrap();
        let err = manager.start().await.unwrap_err();
        assert!(matches!(err, Error::LifecycleConflict(_)));

        let status = manager.status();
        assert_eq!(status.phase, Phase::Running);
        assert!(status.worker_alive);

        manager.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_when_stopped_is_rejected_noop() {
        let manager = manager_with(Arc::new(IdleGateway::new()), DeploymentMode::Direct);

        let err = manager.stop().await.unwrap_err();
        assert!(matches!(err, Error::LifecycleConflict(_)));
        assert_eq!(manager.status().phase, Phase::Stopped);
    }

    #[tokio::test]
    async fn test_stop_then_restart() {
        let manager = manager_with(Arc::new(IdleGateway::new()), DeploymentMode::Direct);

        manager.start().await.unwrap();
        let outcome = manager.stop().await.unwrap();
        assert_eq!(outcome, StopOutcome::Clean);
        assert_eq!(manager.status().phase, Phase::Stopped);

        manager.start().await.unwrap();
        assert_eq!(manager.status().phase, Phase::Running);
        manager.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_connection_failure_fails_start() {
        let gateway = Arc::new(IdleGateway::new());
        gateway.fail_connection.store(true, Ordering::SeqCst);
        let manager = manager_with(gateway, DeploymentMode::Direct);

        let err = manager.start().await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
        assert_eq!(manager.status().phase, Phase::Stopped);
    }

    #[tokio::test]
    async fn test_poll_failures_crash_worker_and_allow_restart() {
        let gateway = Arc::new(IdleGateway::new());
        let manager = manager_with(gateway.clone(), DeploymentMode::Direct);

        manager.start().await.unwrap();
        gateway.fail_polls.store(true, Ordering::SeqCst);

        // The worker gives up after repeated failures and marks the crash.
        tokio::time::timeout(Duration::from_secs(2), async {
            while manager.status().phase != Phase::Crashed {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("worker should crash after repeated poll failures");

        let status = manager.status();
        assert!(status.crashed);

        // Crashed counts as stopped for restart purposes.
        gateway.fail_polls.store(false, Ordering::SeqCst);
        manager.start().await.unwrap();
        assert_eq!(manager.status().phase, Phase::Running);
        manager.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_threaded_mode_start_stop() {
        let manager = manager_with(Arc::new(IdleGateway::new()), DeploymentMode::Threaded);

        manager.start().await.unwrap();
        assert_eq!(manager.status().phase, Phase::Running);

        let outcome = manager.stop().await.unwrap();
        assert_eq!(outcome, StopOutcome::Clean);
        assert_eq!(manager.status().phase, Phase::Stopped);
    }
}

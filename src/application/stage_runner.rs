//! StageRunner - drives a [`StageRun`] on a timer.
//!
//! Each run is owned by a spawned task that ticks every `tick_interval`,
//! adding `progress_step` to the processing stage until it reaches 100%,
//! then moves on. After the last stage the task waits `settle_delay`,
//! marks the run completed, notifies the [`CompletionNotifier`] and emits
//! a single `RunCompleted`.
//!
//! The task is owned by a [`StageRunHandle`]. Cancelling or dropping the
//! handle aborts it; nothing is emitted afterwards.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time;

use crate::config::SimulationConfig;
use crate::domain::foundation::{DomainError, ErrorCode, Percentage, StageRunId};
use crate::domain::processing::{progress_ticks, RunPhase, StageDescriptor, StageRun, StageRunUpdate};
use crate::ports::CompletionNotifier;

/// Timing for stage runs.
#[derive(Debug, Clone)]
pub struct StageRunnerConfig {
    pub tick_interval: Duration,
    pub progress_step: u8,
    pub settle_delay: Duration,
}

impl Default for StageRunnerConfig {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

impl From<&SimulationConfig> for StageRunnerConfig {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            tick_interval: config.tick_interval(),
            progress_step: config.progress_step,
            settle_delay: config.settle_delay(),
        }
    }
}

/// Starts timer-driven stage runs.
pub struct StageRunner {
    notifier: Arc<dyn CompletionNotifier>,
    config: StageRunnerConfig,
}

impl StageRunner {
    pub fn new(notifier: Arc<dyn CompletionNotifier>, config: StageRunnerConfig) -> Self {
        Self { notifier, config }
    }

    /// Starts a run over `descriptors`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if `descriptors` is empty or the progress
    ///   step is out of range; no task is spawned
    pub fn start(&self, descriptors: Vec<StageDescriptor>) -> Result<StageRunHandle, DomainError> {
        let ticks = progress_ticks(self.config.progress_step)?;
        let run = StageRun::new(StageRunId::new(), descriptors)?;
        let id = run.id();

        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let snapshot = Arc::new(watch::Sender::new(run));

        let driver = RunDriver {
            snapshot: Arc::clone(&snapshot),
            updates: updates_tx,
            notifier: Arc::clone(&self.notifier),
            ticks,
            tick_interval: self.config.tick_interval,
            settle_delay: self.config.settle_delay,
        };

        tracing::info!(run_id = %id, stages = snapshot.borrow().stage_count(), "Stage run started");
        let task = tokio::spawn(driver.drive());

        Ok(StageRunHandle {
            id,
            snapshot,
            updates: updates_rx,
            task,
        })
    }
}

/// Owns a running stage run.
///
/// Dropping the handle aborts the driving task.
pub struct StageRunHandle {
    id: StageRunId,
    snapshot: Arc<watch::Sender<StageRun>>,
    updates: mpsc::UnboundedReceiver<StageRunUpdate>,
    task: JoinHandle<()>,
}

impl StageRunHandle {
    pub fn id(&self) -> StageRunId {
        self.id
    }

    /// Current state of the run.
    pub fn snapshot(&self) -> StageRun {
        self.snapshot.borrow().clone()
    }

    /// Watches the run state; the receiver sees every published change.
    pub fn subscribe(&self) -> watch::Receiver<StageRun> {
        self.snapshot.subscribe()
    }

    /// Waits for the next update. Returns `None` once the run is over and
    /// every update has been read.
    pub async fn next_update(&mut self) -> Option<StageRunUpdate> {
        self.updates.recv().await
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the run where it is.
    ///
    /// Stage state stays as last published and no further updates are
    /// sent. Returns false if the run had already completed or been
    /// cancelled.
    pub fn cancel(&mut self) -> bool {
        self.task.abort();
        self.updates.close();

        let mut cancelled = false;
        self.snapshot.send_if_modified(|run| {
            cancelled = run.cancel();
            cancelled
        });

        if cancelled {
            tracing::info!(run_id = %self.id, "Stage run cancelled");
        }
        cancelled
    }
}

impl Drop for StageRunHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// State owned by the spawned task.
struct RunDriver {
    snapshot: Arc<watch::Sender<StageRun>>,
    updates: mpsc::UnboundedSender<StageRunUpdate>,
    notifier: Arc<dyn CompletionNotifier>,
    ticks: Vec<Percentage>,
    tick_interval: Duration,
    settle_delay: Duration,
}

impl RunDriver {
    async fn drive(self) {
        if let Err(err) = self.run_stages().await {
            tracing::error!(error = %err, "Stage run aborted");
        }
    }

    async fn run_stages(&self) -> Result<(), DomainError> {
        let stage_count = self.snapshot.borrow().stage_count();

        for _ in 0..stage_count {
            if !self.apply(StageRun::begin_next_stage)? {
                return Ok(());
            }
            for &progress in &self.ticks {
                time::sleep(self.tick_interval).await;
                if !self.apply(|run| run.report_progress(progress))? {
                    return Ok(());
                }
            }
            if !self.apply(StageRun::complete_current_stage)? {
                return Ok(());
            }
        }

        time::sleep(self.settle_delay).await;

        let mut completion = None;
        self.snapshot.send_if_modified(|run| {
            completion = run.mark_completed().ok();
            completion.is_some()
        });
        let Some(completion) = completion else {
            return Ok(());
        };

        let finished = self.snapshot.borrow().clone();
        tracing::info!(run_id = %finished.id(), "Stage run completed");
        if let Err(err) = self.notifier.run_completed(&finished).await {
            tracing::warn!(run_id = %finished.id(), error = %err, "Completion notifier failed");
        }

        let _ = self.updates.send(completion);
        Ok(())
    }

    /// Applies a transition to the shared run and forwards its update.
    ///
    /// Returns false if the run was cancelled, in which case nothing is
    /// changed or sent.
    fn apply<F>(&self, transition: F) -> Result<bool, DomainError>
    where
        F: FnOnce(&mut StageRun) -> Result<StageRunUpdate, DomainError>,
    {
        let mut outcome = Ok(None);
        self.snapshot.send_if_modified(|run| {
            if run.phase() == RunPhase::Cancelled {
                return false;
            }
            match transition(run) {
                Ok(update) => {
                    outcome = Ok(Some(update));
                    true
                }
                Err(err) => {
                    outcome = Err(err);
                    false
                }
            }
        });

        match outcome? {
            Some(update) => {
                tracing::trace!(?update, "Stage run update");
                // The update receiver may have been dropped; the snapshot still counts.
                let _ = self.updates.send(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Runs that exist at the same time, keyed by id.
#[derive(Default)]
pub struct StageRunRegistry {
    runs: RwLock<HashMap<StageRunId, StageRunHandle>>,
}

impl StageRunRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, handle: StageRunHandle) -> StageRunId {
        let id = handle.id();
        self.runs.write().await.insert(id, handle);
        id
    }

    pub async fn snapshot(&self, id: StageRunId) -> Result<StageRun, DomainError> {
        self.runs
            .read()
            .await
            .get(&id)
            .map(StageRunHandle::snapshot)
            .ok_or_else(|| not_found(id))
    }

    pub async fn subscribe(&self, id: StageRunId) -> Result<watch::Receiver<StageRun>, DomainError> {
        self.runs
            .read()
            .await
            .get(&id)
            .map(StageRunHandle::subscribe)
            .ok_or_else(|| not_found(id))
    }

    /// Cancels and forgets a run, returning its final state.
    pub async fn cancel(&self, id: StageRunId) -> Result<StageRun, DomainError> {
        let mut handle = self.runs.write().await.remove(&id).ok_or_else(|| not_found(id))?;
        handle.cancel();
        Ok(handle.snapshot())
    }

    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }
}

fn not_found(id: StageRunId) -> DomainError {
    DomainError::new(ErrorCode::StageRunNotFound, format!("Stage run not found: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::processing::default_pipeline;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        completed: Mutex<Vec<StageRunId>>,
    }

    #[async_trait]
    impl CompletionNotifier for RecordingNotifier {
        async fn run_completed(&self, run: &StageRun) -> Result<(), DomainError> {
            self.completed.lock().unwrap().push(run.id());
            Ok(())
        }
    }

    fn runner() -> (StageRunner, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let runner = StageRunner::new(notifier.clone(), StageRunnerConfig::default());
        (runner, notifier)
    }

    fn stages(n: usize) -> Vec<StageDescriptor> {
        (0..n)
            .map(|i| StageDescriptor::new(format!("s{i}"), format!("Stage {i}"), ""))
            .collect()
    }

    #[tokio::test]
    async fn empty_stage_list_is_rejected() {
        let (runner, _) = runner();
        let err = runner.start(Vec::new()).err().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration);
    }

    #[tokio::test]
    async fn bad_progress_step_is_rejected() {
        let notifier = Arc::new(RecordingNotifier::default());
        let config = StageRunnerConfig {
            progress_step: 0,
            ..Default::default()
        };
        let runner = StageRunner::new(notifier, config);
        assert!(runner.start(stages(1)).is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn single_stage_emits_full_sequence() {
        let (runner, notifier) = runner();
        let mut handle = runner.start(stages(1)).unwrap();

        let mut updates = Vec::new();
        while let Some(update) = handle.next_update().await {
            updates.push(update);
        }

        // started, 11 ticks, completed, run completed
        assert_eq!(updates.len(), 14);
        assert!(matches!(updates[0], StageRunUpdate::StageStarted { stage_index: 0, .. }));
        assert!(matches!(updates[12], StageRunUpdate::StageCompleted { stage_index: 0, .. }));
        assert_eq!(
            updates[13],
            StageRunUpdate::RunCompleted { overall_progress: Percentage::HUNDRED }
        );
        assert_eq!(notifier.completed.lock().unwrap().as_slice(), &[handle.id()]);
        assert_eq!(handle.snapshot().phase(), RunPhase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn default_pipeline_timing_matches_ticks_and_settle() {
        let (runner, notifier) = runner();
        let handle = runner.start(default_pipeline()).unwrap();

        // 5 stages x 11 ticks x 200ms = 11s, then 1.5s settle
        time::sleep(Duration::from_millis(11_000 + 100)).await;
        let run = handle.snapshot();
        assert!(run.all_stages_complete());
        assert_eq!(run.phase(), RunPhase::Settling);
        assert!(notifier.completed.lock().unwrap().is_empty());

        time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(handle.snapshot().phase(), RunPhase::Completed);
        assert_eq!(notifier.completed.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn overall_progress_never_decreases() {
        let (runner, _) = runner();
        let mut handle = runner.start(stages(3)).unwrap();

        let mut last = 0;
        while let Some(update) = handle.next_update().await {
            if let Some(overall) = update.overall_progress() {
                assert!(overall.value() >= last);
                last = overall.value();
            }
        }
        assert_eq!(last, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_freezes_state_and_stops_updates() {
        let (runner, notifier) = runner();
        let mut handle = runner.start(stages(2)).unwrap();

        // stage 0 started plus three ticks
        time::sleep(Duration::from_millis(650)).await;
        assert!(handle.cancel());
        let frozen = handle.snapshot();
        assert_eq!(frozen.phase(), RunPhase::Cancelled);
        assert_eq!(frozen.stages()[0].progress, Percentage::new(20));

        let mut drained = Vec::new();
        while let Some(update) = handle.next_update().await {
            drained.push(update);
        }
        assert_eq!(drained.len(), 4);

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(handle.snapshot().stages()[0].progress, Percentage::new(20));
        assert!(notifier.completed.lock().unwrap().is_empty());

        assert!(!handle.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_the_task() {
        let (runner, notifier) = runner();
        let handle = runner.start(stages(1)).unwrap();
        let watcher = handle.subscribe();
        drop(handle);

        time::sleep(Duration::from_secs(30)).await;
        assert!(notifier.completed.lock().unwrap().is_empty());
        assert_ne!(watcher.borrow().phase(), RunPhase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn registry_tracks_runs_independently() {
        let (runner, _) = runner();
        let registry = StageRunRegistry::new();
        let first = registry.insert(runner.start(stages(1)).unwrap()).await;
        let second = registry.insert(runner.start(stages(1)).unwrap()).await;
        assert_eq!(registry.len().await, 2);

        time::sleep(Duration::from_millis(450)).await;
        let cancelled = registry.cancel(first).await.unwrap();
        assert_eq!(cancelled.phase(), RunPhase::Cancelled);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(registry.snapshot(second).await.unwrap().phase(), RunPhase::Completed);

        let err = registry.snapshot(first).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::StageRunNotFound);
    }
}

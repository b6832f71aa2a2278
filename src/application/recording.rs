//! Recording sessions with a running clock.
//!
//! A [`RecordingCounter`] wraps one [`RecordingSession`] and owns the
//! interval task that advances its elapsed seconds. There is at most one
//! such task per counter; it exists only while recording and is aborted on
//! pause, stop, accept and drop.
//!
//! [`RecordingService`] keeps the counters that exist at the same time and
//! hands accepted recordings to a [`ProcessingLauncher`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::domain::foundation::{DomainError, ErrorCode, RecordingSessionId, StageRunId};
use crate::domain::recording::{
    CaptureOptions, RecordingHandoff, RecordingPhase, RecordingSession, RecordingSource,
};
use crate::ports::ProcessingLauncher;

/// One recording session plus its clock task.
pub struct RecordingCounter {
    session: Arc<watch::Sender<RecordingSession>>,
    tick: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl RecordingCounter {
    pub fn new(id: RecordingSessionId, tick: Duration) -> Self {
        Self {
            session: Arc::new(watch::Sender::new(RecordingSession::new(id))),
            tick,
            ticker: None,
        }
    }

    pub fn id(&self) -> RecordingSessionId {
        self.session.borrow().id()
    }

    pub fn snapshot(&self) -> RecordingSession {
        self.session.borrow().clone()
    }

    /// Watches the session; every tick of the clock is published.
    pub fn subscribe(&self) -> watch::Receiver<RecordingSession> {
        self.session.subscribe()
    }

    /// True while a clock task is alive.
    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn select_source(&mut self, source: RecordingSource) -> Result<(), DomainError> {
        self.update(|s| s.select_source(source))
    }

    pub fn set_options(&mut self, options: CaptureOptions) -> Result<(), DomainError> {
        self.update(|s| s.set_options(options))
    }

    /// Starts recording from zero and starts the clock.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.update(RecordingSession::start)?;
        self.spawn_ticker();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), DomainError> {
        self.update(RecordingSession::pause)?;
        self.stop_ticker();
        Ok(())
    }

    /// Resumes counting. The first tick lands one full period later.
    pub fn resume(&mut self) -> Result<(), DomainError> {
        self.update(RecordingSession::resume)?;
        self.spawn_ticker();
        Ok(())
    }

    pub fn toggle_pause(&mut self) -> Result<RecordingPhase, DomainError> {
        let phase = self.session.borrow().phase();
        match phase {
            RecordingPhase::Recording => self.pause()?,
            _ => self.resume()?,
        }
        Ok(self.session.borrow().phase())
    }

    /// Ends capture; the clock stops for good.
    pub fn stop(&mut self) -> Result<(), DomainError> {
        self.update(RecordingSession::stop)?;
        self.stop_ticker();
        Ok(())
    }

    pub fn discard(&mut self) -> Result<(), DomainError> {
        self.update(RecordingSession::discard)
    }

    pub fn accept(&mut self) -> Result<RecordingHandoff, DomainError> {
        let handoff = self.session.borrow().accept()?;
        self.stop_ticker();
        Ok(handoff)
    }

    fn update<F>(&self, change: F) -> Result<(), DomainError>
    where
        F: FnOnce(&mut RecordingSession) -> Result<(), DomainError>,
    {
        let mut outcome = Ok(());
        self.session.send_if_modified(|session| {
            outcome = change(session);
            outcome.is_ok()
        });
        outcome
    }

    fn spawn_ticker(&mut self) {
        self.stop_ticker();

        let session = Arc::clone(&self.session);
        let period = self.tick;
        self.ticker = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                session.send_if_modified(RecordingSession::tick);
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for RecordingCounter {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// Result of accepting a recording.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedRecording {
    pub handoff: RecordingHandoff,
    pub run_id: StageRunId,
}

/// Lifecycle commands that take no arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingCommand {
    Start,
    Pause,
    Resume,
    TogglePause,
    Stop,
    Discard,
}

/// Manages every open recording session.
pub struct RecordingService {
    sessions: RwLock<HashMap<RecordingSessionId, RecordingCounter>>,
    launcher: Arc<dyn ProcessingLauncher>,
    tick: Duration,
}

impl RecordingService {
    pub fn new(launcher: Arc<dyn ProcessingLauncher>, tick: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            launcher,
            tick,
        }
    }

    /// Opens a new session in the configuring phase.
    pub async fn create(&self) -> RecordingSession {
        let counter = RecordingCounter::new(RecordingSessionId::new(), self.tick);
        let session = counter.snapshot();
        self.sessions.write().await.insert(session.id(), counter);
        tracing::debug!(session_id = %session.id(), "Recording session opened");
        session
    }

    pub async fn get(&self, id: RecordingSessionId) -> Result<RecordingSession, DomainError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(RecordingCounter::snapshot)
            .ok_or_else(|| not_found(id))
    }

    pub async fn subscribe(
        &self,
        id: RecordingSessionId,
    ) -> Result<watch::Receiver<RecordingSession>, DomainError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(RecordingCounter::subscribe)
            .ok_or_else(|| not_found(id))
    }

    /// Updates source and/or capture toggles. Only allowed while configuring.
    pub async fn configure(
        &self,
        id: RecordingSessionId,
        source: Option<RecordingSource>,
        options: Option<CaptureOptions>,
    ) -> Result<RecordingSession, DomainError> {
        let mut sessions = self.sessions.write().await;
        let counter = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        if let Some(source) = source {
            counter.select_source(source)?;
        }
        if let Some(options) = options {
            counter.set_options(options)?;
        }
        Ok(counter.snapshot())
    }

    pub async fn apply(
        &self,
        id: RecordingSessionId,
        command: RecordingCommand,
    ) -> Result<RecordingSession, DomainError> {
        let mut sessions = self.sessions.write().await;
        let counter = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;

        match command {
            RecordingCommand::Start => counter.start()?,
            RecordingCommand::Pause => counter.pause()?,
            RecordingCommand::Resume => counter.resume()?,
            RecordingCommand::TogglePause => {
                counter.toggle_pause()?;
            }
            RecordingCommand::Stop => counter.stop()?,
            RecordingCommand::Discard => counter.discard()?,
        }

        let session = counter.snapshot();
        tracing::info!(
            session_id = %id,
            ?command,
            phase = %session.phase(),
            elapsed = session.elapsed_seconds(),
            "Recording session updated"
        );
        Ok(session)
    }

    /// Accepts a reviewed take, starts processing and closes the session.
    ///
    /// The session is kept if the launch fails, so the take can be accepted
    /// again.
    pub async fn accept(&self, id: RecordingSessionId) -> Result<AcceptedRecording, DomainError> {
        let mut sessions = self.sessions.write().await;
        let counter = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        let handoff = counter.accept()?;

        let run_id = match self.launcher.launch(handoff.clone()).await {
            Ok(run_id) => run_id,
            Err(err) => {
                tracing::warn!(session_id = %id, error = %err, "Processing launch failed");
                return Err(err);
            }
        };
        sessions.remove(&id);

        tracing::info!(
            session_id = %id,
            %run_id,
            duration_seconds = handoff.duration_seconds,
            "Recording accepted"
        );
        Ok(AcceptedRecording { handoff, run_id })
    }

    /// Drops a session without handing it off. Its clock stops with it.
    pub async fn close(&self, id: RecordingSessionId) -> Result<(), DomainError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| not_found(id))?;
        tracing::debug!(session_id = %id, "Recording session closed");
        Ok(())
    }

    /// Number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn not_found(id: RecordingSessionId) -> DomainError {
    DomainError::new(
        ErrorCode::RecordingSessionNotFound,
        format!("Recording session not found: {}", id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const TICK: Duration = Duration::from_secs(1);

    fn counter() -> RecordingCounter {
        RecordingCounter::new(RecordingSessionId::new(), TICK)
    }

    #[tokio::test(start_paused = true)]
    async fn clock_counts_while_recording() {
        let mut counter = counter();
        counter.start().unwrap();
        time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(counter.snapshot().elapsed_seconds(), 3);
        assert_eq!(counter.snapshot().formatted_elapsed(), "00:03");
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_the_clock_and_resume_restarts_it() {
        let mut counter = counter();
        counter.start().unwrap();
        time::sleep(Duration::from_millis(2_500)).await;

        counter.pause().unwrap();
        assert!(!counter.is_ticking());
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(counter.snapshot().elapsed_seconds(), 2);

        counter.resume().unwrap();
        time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(counter.snapshot().elapsed_seconds(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pause_alternates() {
        let mut counter = counter();
        counter.start().unwrap();
        assert_eq!(counter.toggle_pause().unwrap(), RecordingPhase::Paused);
        assert_eq!(counter.toggle_pause().unwrap(), RecordingPhase::Recording);
        assert!(counter.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_elapsed() {
        let mut counter = counter();
        counter.start().unwrap();
        time::sleep(Duration::from_millis(5_200)).await;
        counter.stop().unwrap();
        time::sleep(Duration::from_secs(60)).await;

        let session = counter.snapshot();
        assert_eq!(session.phase(), RecordingPhase::Reviewing);
        assert_eq!(session.elapsed_seconds(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn discard_then_restart_begins_at_zero() {
        let mut counter = counter();
        counter.start().unwrap();
        time::sleep(Duration::from_millis(4_100)).await;
        counter.stop().unwrap();
        counter.discard().unwrap();
        assert_eq!(counter.snapshot().elapsed_seconds(), 0);

        counter.start().unwrap();
        time::sleep(Duration::from_millis(1_100)).await;
        assert_eq!(counter.snapshot().elapsed_seconds(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_transition_leaves_clock_alone() {
        let mut counter = counter();
        let err = counter.pause().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(!counter.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_each_tick() {
        let mut counter = counter();
        let mut rx = counter.subscribe();
        counter.start().unwrap();
        rx.borrow_and_update();

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().elapsed_seconds(), 1);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().elapsed_seconds(), 2);
    }

    #[derive(Default)]
    struct CapturingLauncher {
        handoffs: Mutex<Vec<RecordingHandoff>>,
    }

    #[async_trait]
    impl ProcessingLauncher for CapturingLauncher {
        async fn launch(&self, handoff: RecordingHandoff) -> Result<StageRunId, DomainError> {
            self.handoffs.lock().unwrap().push(handoff);
            Ok(StageRunId::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn accept_hands_off_and_closes_the_session() {
        let launcher = Arc::new(CapturingLauncher::default());
        let service = RecordingService::new(launcher.clone(), TICK);
        let session = service.create().await;
        let id = session.id();

        service
            .configure(id, Some(RecordingSource::Tab), None)
            .await
            .unwrap();
        service.apply(id, RecordingCommand::Start).await.unwrap();
        time::sleep(Duration::from_millis(7_300)).await;
        service.apply(id, RecordingCommand::Stop).await.unwrap();

        let accepted = service.accept(id).await.unwrap();
        assert_eq!(accepted.handoff.duration_seconds, 7);
        assert_eq!(accepted.handoff.source, RecordingSource::Tab);
        assert_eq!(launcher.handoffs.lock().unwrap().len(), 1);

        let err = service.get(id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RecordingSessionNotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn accept_requires_review() {
        let service = RecordingService::new(Arc::new(CapturingLauncher::default()), TICK);
        let id = service.create().await.id();
        service.apply(id, RecordingCommand::Start).await.unwrap();

        let err = service.accept(id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(service.get(id).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn options_are_locked_once_recording() {
        let service = RecordingService::new(Arc::new(CapturingLauncher::default()), TICK);
        let id = service.create().await.id();
        service.apply(id, RecordingCommand::Start).await.unwrap();

        let options = CaptureOptions {
            camera_enabled: true,
            ..Default::default()
        };
        let err = service.configure(id, None, Some(options)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_count_independently() {
        let service = RecordingService::new(Arc::new(CapturingLauncher::default()), TICK);
        let a = service.create().await.id();
        let b = service.create().await.id();

        service.apply(a, RecordingCommand::Start).await.unwrap();
        time::sleep(Duration::from_millis(2_500)).await;
        service.apply(b, RecordingCommand::Start).await.unwrap();
        time::sleep(Duration::from_millis(1_000)).await;

        assert_eq!(service.get(a).await.unwrap().elapsed_seconds(), 3);
        assert_eq!(service.get(b).await.unwrap().elapsed_seconds(), 1);
    }

    /// Fails the first launch, then succeeds.
    #[derive(Default)]
    struct FlakyLauncher {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ProcessingLauncher for FlakyLauncher {
        async fn launch(&self, _handoff: RecordingHandoff) -> Result<StageRunId, DomainError> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(DomainError::new(ErrorCode::InternalError, "launcher unavailable"))
            } else {
                Ok(StageRunId::new())
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_launch_keeps_the_take_for_another_accept() {
        let service = RecordingService::new(Arc::new(FlakyLauncher::default()), TICK);
        let id = service.create().await.id();
        service.apply(id, RecordingCommand::Start).await.unwrap();
        time::sleep(Duration::from_millis(4_200)).await;
        service.apply(id, RecordingCommand::Stop).await.unwrap();

        let err = service.accept(id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        let kept = service.get(id).await.unwrap();
        assert_eq!(kept.phase(), RecordingPhase::Reviewing);
        assert_eq!(kept.elapsed_seconds(), 4);

        let accepted = service.accept(id).await.unwrap();
        assert_eq!(accepted.handoff.duration_seconds, 4);
        assert!(service.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn close_mid_recording_stops_the_clock() {
        let service = RecordingService::new(Arc::new(CapturingLauncher::default()), TICK);
        let id = service.create().await.id();
        service.apply(id, RecordingCommand::Start).await.unwrap();
        let mut rx = service.subscribe(id).await.unwrap();
        rx.borrow_and_update();

        service.close(id).await.unwrap();
        assert!(service.is_empty().await);
        // The sender lives in the aborted ticker and the dropped counter.
        assert!(rx.changed().await.is_err());
        assert_eq!(rx.borrow().elapsed_seconds(), 0);

        let err = service.close(id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RecordingSessionNotFound);
    }
}

//! Launcher that starts the default pipeline for an accepted recording.

use async_trait::async_trait;
use std::sync::Arc;

use crate::application::{StageRunRegistry, StageRunner};
use crate::domain::foundation::{DomainError, StageRunId};
use crate::domain::processing::default_pipeline;
use crate::domain::recording::RecordingHandoff;
use crate::ports::ProcessingLauncher;

/// Starts a stage run and registers it so it can be watched by id.
pub struct RecordingProcessingLauncher {
    runner: Arc<StageRunner>,
    runs: Arc<StageRunRegistry>,
}

impl RecordingProcessingLauncher {
    pub fn new(runner: Arc<StageRunner>, runs: Arc<StageRunRegistry>) -> Self {
        Self { runner, runs }
    }
}

#[async_trait]
impl ProcessingLauncher for RecordingProcessingLauncher {
    async fn launch(&self, handoff: RecordingHandoff) -> Result<StageRunId, DomainError> {
        let handle = self.runner.start(default_pipeline())?;
        tracing::debug!(
            session_id = %handoff.session_id,
            run_id = %handle.id(),
            "Processing started for recording"
        );
        Ok(self.runs.insert(handle).await)
    }
}

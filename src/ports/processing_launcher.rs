//! Processing launcher port.
//!
//! Receives an accepted recording and starts processing it.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StageRunId};
use crate::domain::recording::RecordingHandoff;

#[async_trait]
pub trait ProcessingLauncher: Send + Sync {
    /// Starts processing and returns the id of the new run.
    async fn launch(&self, handoff: RecordingHandoff) -> Result<StageRunId, DomainError>;
}

//! Completion notifier port.
//!
//! Invoked once when a stage run finishes and its settle delay has passed.
//! In the browser this was the jump to the editor; here it is whatever the
//! host wires in.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::processing::StageRun;

#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    /// Called exactly once per completed run, never for cancelled runs.
    async fn run_completed(&self, run: &StageRun) -> Result<(), DomainError>;
}

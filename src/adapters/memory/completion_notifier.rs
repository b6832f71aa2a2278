//! Completion notifier that only logs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::foundation::DomainError;
use crate::domain::processing::StageRun;
use crate::ports::CompletionNotifier;

/// Logs each completed run and counts them.
#[derive(Debug, Default)]
pub struct LoggingCompletionNotifier {
    completed: AtomicUsize,
}

impl LoggingCompletionNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionNotifier for LoggingCompletionNotifier {
    async fn run_completed(&self, run: &StageRun) -> Result<(), DomainError> {
        self.completed.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            run_id = %run.id(),
            stages = run.stage_count(),
            "Processing finished, project ready for editing"
        );
        Ok(())
    }
}

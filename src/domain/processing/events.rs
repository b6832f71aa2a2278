//! Updates emitted while a stage run advances.

use serde::Serialize;

use crate::domain::foundation::Percentage;

/// One observable step of a stage run, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageRunUpdate {
    /// A stage moved from pending to processing.
    StageStarted { stage_index: usize, stage_id: String },
    /// The processing stage reported new progress.
    Progress {
        stage_index: usize,
        stage_progress: Percentage,
        overall_progress: Percentage,
    },
    /// A stage moved from processing to complete.
    StageCompleted { stage_index: usize, stage_id: String },
    /// All stages are complete and the settle delay has passed. Sent once.
    RunCompleted { overall_progress: Percentage },
}

impl StageRunUpdate {
    /// Overall progress carried by this update, if any.
    pub fn overall_progress(&self) -> Option<Percentage> {
        match self {
            StageRunUpdate::Progress { overall_progress, .. }
            | StageRunUpdate::RunCompleted { overall_progress } => Some(*overall_progress),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, StageRunUpdate::RunCompleted { .. })
    }
}

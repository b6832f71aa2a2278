//! Processing stages and their lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Percentage, StateMachine};

/// Static description of one unit of simulated work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl StageDescriptor {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Lifecycle of a stage. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    #[default]
    Pending,
    Processing,
    Complete,
}

impl StageStatus {
    pub fn is_processing(&self) -> bool {
        matches!(self, StageStatus::Processing)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, StageStatus::Complete)
    }
}

impl StateMachine for StageStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use StageStatus::*;
        matches!((self, target), (Pending, Processing) | (Processing, Complete))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use StageStatus::*;
        match self {
            Pending => vec![Processing],
            Processing => vec![Complete],
            Complete => vec![],
        }
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Pending => "Pending",
            StageStatus::Processing => "Processing",
            StageStatus::Complete => "Complete",
        };
        write!(f, "{}", s)
    }
}

/// A stage inside a run: its descriptor plus live status.
///
/// `progress` only carries meaning while the stage is processing; a
/// complete stage always reports 100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingStage {
    #[serde(flatten)]
    pub descriptor: StageDescriptor,
    pub status: StageStatus,
    pub progress: Percentage,
}

impl ProcessingStage {
    pub fn pending(descriptor: StageDescriptor) -> Self {
        Self {
            descriptor,
            status: StageStatus::Pending,
            progress: Percentage::ZERO,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }
}

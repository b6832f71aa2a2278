//! Recording phase state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a recording session is in its lifecycle.
///
/// ```text
/// Configuring ──start──▶ Recording ◀──resume/pause──▶ Paused
///      ▲                     │                          │
///      └──discard── Reviewing ◀────────stop─────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordingPhase {
    #[default]
    Configuring,
    Recording,
    Paused,
    Reviewing,
}

impl RecordingPhase {
    /// True while the elapsed counter should be ticking.
    pub fn is_counting(&self) -> bool {
        matches!(self, RecordingPhase::Recording)
    }

    /// True between start and stop.
    pub fn is_capturing(&self) -> bool {
        matches!(self, RecordingPhase::Recording | RecordingPhase::Paused)
    }
}

impl StateMachine for RecordingPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use RecordingPhase::*;
        matches!(
            (self, target),
            (Configuring, Recording)
                | (Recording, Paused)
                | (Paused, Recording)
                | (Recording, Reviewing)
                | (Paused, Reviewing)
                | (Reviewing, Configuring)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use RecordingPhase::*;
        match self {
            Configuring => vec![Recording],
            Recording => vec![Paused, Reviewing],
            Paused => vec![Recording, Reviewing],
            Reviewing => vec![Configuring],
        }
    }
}

impl fmt::Display for RecordingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordingPhase::Configuring => "Configuring",
            RecordingPhase::Recording => "Recording",
            RecordingPhase::Paused => "Paused",
            RecordingPhase::Reviewing => "Reviewing",
        };
        write!(f, "{}", s)
    }
}

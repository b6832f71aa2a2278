//! Step-by-step guide generated from a recording, as shown in the editor.

use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode, Percentage};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideStep {
    pub number: u32,
    pub title: String,
    pub description: String,
    /// Offset into the video where the step begins.
    pub timestamp_secs: u64,
}

impl GuideStep {
    pub fn new(number: u32, title: impl Into<String>, description: impl Into<String>, timestamp_secs: u64) -> Self {
        Self {
            number,
            title: title.into(),
            description: description.into(),
            timestamp_secs,
        }
    }
}

/// Formats seconds as `M:SS` (minutes unpadded).
pub fn format_playback(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// The editor's view of a guide: steps plus a playhead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuideDocument {
    steps: Vec<GuideStep>,
    duration_secs: u64,
    selected_step: Option<u32>,
    current_time_secs: u64,
}

impl GuideDocument {
    /// Creates a document with the first step selected and the playhead at 0.
    pub fn new(steps: Vec<GuideStep>, duration_secs: u64) -> Self {
        let selected_step = steps.first().map(|s| s.number);
        Self {
            steps,
            duration_secs,
            selected_step,
            current_time_secs: 0,
        }
    }

    pub fn steps(&self) -> &[GuideStep] {
        &self.steps
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn selected_step(&self) -> Option<&GuideStep> {
        self.selected_step
            .and_then(|n| self.steps.iter().find(|s| s.number == n))
    }

    pub fn current_time_secs(&self) -> u64 {
        self.current_time_secs
    }

    /// Selects a step and moves the playhead to where it begins.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if no step has that number
    pub fn select_step(&mut self, number: u32) -> Result<&GuideStep, DomainError> {
        let step = self
            .steps
            .iter()
            .find(|s| s.number == number)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ValidationFailed, format!("Guide has no step {}", number))
                    .with_detail("field", "step")
            })?;

        self.selected_step = Some(step.number);
        self.current_time_secs = step.timestamp_secs.min(self.duration_secs);
        Ok(step)
    }

    /// Playhead position as a share of the video.
    pub fn playhead(&self) -> Percentage {
        if self.duration_secs == 0 {
            return Percentage::ZERO;
        }
        Percentage::new((self.current_time_secs * 100 / self.duration_secs) as u8)
    }

    /// `current / total`, e.g. "0:45 / 2:00".
    pub fn position_label(&self) -> String {
        format!(
            "{} / {}",
            format_playback(self.current_time_secs),
            format_playback(self.duration_secs)
        )
    }
}

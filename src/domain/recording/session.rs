//! RecordingSession aggregate.
//!
//! Nothing is captured; the session only tracks the chosen source, the
//! capture toggles and how many seconds have been "recorded".

use serde::{Deserialize, Serialize};

use super::phase::RecordingPhase;
use crate::domain::foundation::{DomainError, ErrorCode, RecordingSessionId, StateMachine};

/// What the user chose to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordingSource {
    #[default]
    Screen,
    Window,
    Tab,
}

impl RecordingSource {
    pub fn label(&self) -> &'static str {
        match self {
            RecordingSource::Screen => "Full Screen",
            RecordingSource::Window => "Window",
            RecordingSource::Tab => "Browser Tab",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RecordingSource::Screen => "Record your entire screen",
            RecordingSource::Window => "Record a specific application",
            RecordingSource::Tab => "Record a single browser tab",
        }
    }
}

/// Independent capture toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureOptions {
    pub mic_enabled: bool,
    pub camera_enabled: bool,
    pub system_audio_enabled: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            mic_enabled: true,
            camera_enabled: false,
            system_audio_enabled: true,
        }
    }
}

/// What an accepted recording hands to processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingHandoff {
    pub session_id: RecordingSessionId,
    pub source: RecordingSource,
    pub options: CaptureOptions,
    pub duration_seconds: u64,
}

/// Formats seconds as zero-padded `MM:SS`.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// A simulated recording.
///
/// # Invariants
///
/// - `elapsed_seconds` only grows while the phase is `Recording`
/// - source and options only change while `Configuring`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordingSession {
    id: RecordingSessionId,
    source: RecordingSource,
    options: CaptureOptions,
    phase: RecordingPhase,
    elapsed_seconds: u64,
}

impl RecordingSession {
    pub fn new(id: RecordingSessionId) -> Self {
        Self {
            id,
            source: RecordingSource::default(),
            options: CaptureOptions::default(),
            phase: RecordingPhase::Configuring,
            elapsed_seconds: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> RecordingSessionId {
        self.id
    }

    pub fn source(&self) -> RecordingSource {
        self.source
    }

    pub fn options(&self) -> CaptureOptions {
        self.options
    }

    pub fn phase(&self) -> RecordingPhase {
        self.phase
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn formatted_elapsed(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────────

    pub fn select_source(&mut self, source: RecordingSource) -> Result<(), DomainError> {
        self.ensure_configuring()?;
        self.source = source;
        Ok(())
    }

    pub fn set_options(&mut self, options: CaptureOptions) -> Result<(), DomainError> {
        self.ensure_configuring()?;
        self.options = options;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Begins recording from zero.
    pub fn start(&mut self) -> Result<(), DomainError> {
        self.transition(RecordingPhase::Recording, &[RecordingPhase::Configuring])?;
        self.elapsed_seconds = 0;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), DomainError> {
        self.transition(RecordingPhase::Paused, &[RecordingPhase::Recording])
    }

    pub fn resume(&mut self) -> Result<(), DomainError> {
        self.transition(RecordingPhase::Recording, &[RecordingPhase::Paused])
    }

    /// Pauses a running recording or resumes a paused one.
    pub fn toggle_pause(&mut self) -> Result<RecordingPhase, DomainError> {
        match self.phase {
            RecordingPhase::Recording => self.pause()?,
            RecordingPhase::Paused => self.resume()?,
            other => return Err(DomainError::invalid_transition(other, RecordingPhase::Paused)),
        }
        Ok(self.phase)
    }

    /// Ends capture; elapsed time is frozen from here on.
    pub fn stop(&mut self) -> Result<(), DomainError> {
        self.transition(RecordingPhase::Reviewing, &[RecordingPhase::Recording, RecordingPhase::Paused])
    }

    /// Throws the take away and returns to configuring with a zeroed clock.
    pub fn discard(&mut self) -> Result<(), DomainError> {
        self.transition(RecordingPhase::Configuring, &[RecordingPhase::Reviewing])?;
        self.elapsed_seconds = 0;
        Ok(())
    }

    /// Accepts the take. The caller hands the result to processing and
    /// drops the session.
    pub fn accept(&self) -> Result<RecordingHandoff, DomainError> {
        if self.phase != RecordingPhase::Reviewing {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Only a reviewed recording can be accepted, session is {}", self.phase),
            ));
        }
        Ok(RecordingHandoff {
            session_id: self.id,
            source: self.source,
            options: self.options,
            duration_seconds: self.elapsed_seconds,
        })
    }

    /// Advances the clock by one second. Ignored unless recording.
    pub fn tick(&mut self) -> bool {
        if self.phase.is_counting() {
            self.elapsed_seconds += 1;
            true
        } else {
            false
        }
    }

    fn ensure_configuring(&self) -> Result<(), DomainError> {
        if self.phase == RecordingPhase::Configuring {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Capture settings are locked while {}", self.phase),
            ))
        }
    }

    fn transition(&mut self, target: RecordingPhase, allowed_from: &[RecordingPhase]) -> Result<(), DomainError> {
        if !allowed_from.contains(&self.phase) {
            return Err(DomainError::invalid_transition(self.phase, target));
        }
        self.phase = self.phase.transition_to(target)?;
        Ok(())
    }
}

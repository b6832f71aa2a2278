//! Timings for the simulated recording, processing and chat flows

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Timer settings shared by every simulated session
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Delay between processing progress ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Stage progress added per tick (1-100)
    #[serde(default = "default_progress_step")]
    pub progress_step: u8,

    /// Pause after the last stage before completion is signalled
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,

    /// Simulated assistant "typing" time
    #[serde(default = "default_reply_latency")]
    pub reply_latency_ms: u64,

    /// Recording clock period
    #[serde(default = "default_recording_tick")]
    pub recording_tick_ms: u64,
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn reply_latency(&self) -> Duration {
        Duration::from_millis(self.reply_latency_ms)
    }

    pub fn recording_tick(&self) -> Duration {
        Duration::from_millis(self.recording_tick_ms)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tick_interval_ms == 0 {
            return Err(ValidationError::ZeroInterval("tick_interval_ms"));
        }
        if self.recording_tick_ms == 0 {
            return Err(ValidationError::ZeroInterval("recording_tick_ms"));
        }
        if self.progress_step == 0 || self.progress_step > 100 {
            return Err(ValidationError::InvalidProgressStep(self.progress_step));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            progress_step: default_progress_step(),
            settle_delay_ms: default_settle_delay(),
            reply_latency_ms: default_reply_latency(),
            recording_tick_ms: default_recording_tick(),
        }
    }
}

fn default_tick_interval() -> u64 {
    200
}

fn default_progress_step() -> u8 {
    10
}

fn default_settle_delay() -> u64 {
    1500
}

fn default_reply_latency() -> u64 {
    1000
}

fn default_recording_tick() -> u64 {
    1000
}

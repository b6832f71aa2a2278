//! Application layer - Services that own timers and coordinate ports.
//!
//! - `ChatService` - assistant conversations with simulated reply latency
//! - `StageRunner` - timer-driven processing runs and their registry
//! - `RecordingService` - recording sessions with a running clock

mod chat;
mod recording;
mod stage_runner;

pub use chat::{ChatExchange, ChatService};
pub use recording::{AcceptedRecording, RecordingCommand, RecordingCounter, RecordingService};
pub use stage_runner::{StageRunHandle, StageRunRegistry, StageRunner, StageRunnerConfig};

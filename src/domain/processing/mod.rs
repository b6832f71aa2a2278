//! Processing domain module.
//!
//! Simulated AI processing: an ordered list of stages, each driven from
//! 0 to 100% before the next one starts.

mod events;
mod pipeline;
mod run;
mod stage;

pub use events::StageRunUpdate;
pub use pipeline::default_pipeline;
pub use run::{overall_progress, progress_ticks, RunPhase, StageRun};
pub use stage::{ProcessingStage, StageDescriptor, StageStatus};

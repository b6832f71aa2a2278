//! Recording domain module.
//!
//! A simulated capture session: source selection, capture toggles, and an
//! elapsed-seconds clock that only runs while recording.

mod phase;
mod session;

pub use phase::RecordingPhase;
pub use session::{
    format_elapsed, CaptureOptions, RecordingHandoff, RecordingSession, RecordingSource,
};

//! The standard AI processing pipeline shown after a recording is accepted.

use super::stage::StageDescriptor;

/// The five stages every accepted recording goes through.
pub fn default_pipeline() -> Vec<StageDescriptor> {
    vec![
        StageDescriptor::new(
            "analyze",
            "Analyzing Video",
            "Extracting audio and detecting scene changes",
        ),
        StageDescriptor::new(
            "transcribe",
            "Transcribing Audio",
            "Converting speech to text with timestamps",
        ),
        StageDescriptor::new(
            "enhance",
            "AI Enhancement",
            "Improving script clarity and structure",
        ),
        StageDescriptor::new(
            "voice",
            "Voice Generation",
            "Creating professional AI voiceover",
        ),
        StageDescriptor::new(
            "guide",
            "Guide Creation",
            "Generating step-by-step documentation",
        ),
    ]
}

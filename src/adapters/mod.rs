//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory stores, sample catalog, logging notifier
//! - `http` - axum routes over the application services

pub mod http;
pub mod memory;

pub use http::{api_router, AppState};
pub use memory::{
    InMemoryConversationStore, LoggingCompletionNotifier, RecordingProcessingLauncher,
    SampleProjectCatalog,
};

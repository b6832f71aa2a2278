//! In-memory adapters.
//!
//! Nothing in the product persists; these back the ports for the server
//! and for tests.

mod completion_notifier;
mod conversation_store;
mod processing_launcher;
mod project_catalog;

pub use completion_notifier::LoggingCompletionNotifier;
pub use conversation_store::InMemoryConversationStore;
pub use processing_launcher::RecordingProcessingLauncher;
pub use project_catalog::SampleProjectCatalog;

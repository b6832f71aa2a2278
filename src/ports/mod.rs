//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationStore` - Where assistant conversations live
//! - `ProjectCatalog` - Dashboard projects, stats and guides
//! - `CompletionNotifier` - Signal fired when a stage run finishes
//! - `ProcessingLauncher` - Hand-off from an accepted recording to processing

mod completion_notifier;
mod conversation_store;
mod processing_launcher;
mod project_catalog;

pub use completion_notifier::CompletionNotifier;
pub use conversation_store::ConversationStore;
pub use processing_launcher::ProcessingLauncher;
pub use project_catalog::ProjectCatalog;

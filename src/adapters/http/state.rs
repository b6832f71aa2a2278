//! Shared state handed to every route.

use std::sync::Arc;

use crate::adapters::memory::{
    InMemoryConversationStore, LoggingCompletionNotifier, RecordingProcessingLauncher,
    SampleProjectCatalog,
};
use crate::application::{ChatService, RecordingService, StageRunRegistry, StageRunner, StageRunnerConfig};
use crate::config::SimulationConfig;
use crate::ports::ProjectCatalog;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub runner: Arc<StageRunner>,
    pub runs: Arc<StageRunRegistry>,
    pub recordings: Arc<RecordingService>,
    pub catalog: Arc<dyn ProjectCatalog>,
}

impl AppState {
    /// Wires every service to the in-memory adapters.
    pub fn in_memory(simulation: &SimulationConfig) -> Self {
        let notifier = Arc::new(LoggingCompletionNotifier::new());
        let runner = Arc::new(StageRunner::new(notifier, StageRunnerConfig::from(simulation)));
        let runs = Arc::new(StageRunRegistry::new());
        let launcher = Arc::new(RecordingProcessingLauncher::new(runner.clone(), runs.clone()));

        Self {
            chat: Arc::new(ChatService::new(
                Arc::new(InMemoryConversationStore::new()),
                simulation.reply_latency(),
            )),
            runner,
            runs,
            recordings: Arc::new(RecordingService::new(launcher, simulation.recording_tick())),
            catalog: Arc::new(SampleProjectCatalog::new()),
        }
    }
}

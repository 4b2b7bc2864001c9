use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use vita_ai::{AiError, AiOrchestrator};
use vita_config::Config;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub ai: AiOrchestrator,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AiError> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let ai = AiOrchestrator::from_config(&config.gemini, timeout)?;
        Ok(Self::with_orchestrator(config, ai))
    }

    /// Use a prebuilt orchestrator, e.g. one over a scripted backend
    pub fn with_orchestrator(config: Config, ai: AiOrchestrator) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            ai,
        }
    }
}

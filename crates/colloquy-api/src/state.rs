use std::sync::Arc;

use colloquy_engine::ChatEngine;
use colloquy_persist::ThreadStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// All resources are wrapped in Arc for efficient sharing across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ThreadStore>,
    pub engine: Arc<ChatEngine>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn ThreadStore>, engine: ChatEngine) -> Self {
        Self {
            config: Arc::new(config),
            store,
            engine: Arc::new(engine),
        }
    }
}

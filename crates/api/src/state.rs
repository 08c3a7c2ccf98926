use std::sync::Arc;

use taskboard_core::store::Store;
use taskboard_core::Services;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState<S>>`.
///
/// Generic over the store so tests can run the full router on
/// [`taskboard_core::MemoryStore`].
pub struct AppState<S: Store> {
    pub services: Arc<Services<S>>,
    pub config: Arc<ServerConfig>,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, config: ServerConfig) -> Self {
        Self {
            services: Arc::new(Services::new(store)),
            config: Arc::new(config),
        }
    }
}

impl<S: Store> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            services: Arc::clone(&self.services),
            config: Arc::clone(&self.config),
        }
    }
}

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    // Single-slot guard: the build tool shares one build directory, so at
    // most one training run may be in flight. Extra requests are rejected.
    build_guard: Mutex<()>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                build_guard: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    pub fn build_guard(&self) -> &Mutex<()> {
        &self.inner.build_guard
    }
}

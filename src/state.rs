use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::video::VideoBackend;

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    backend: Arc<dyn VideoBackend>,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: &Config, backend: Arc<dyn VideoBackend>) -> Self {
        Self {
            config: Arc::new(config.clone()),
            backend,
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn backend(&self) -> Arc<dyn VideoBackend> {
        self.backend.clone()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

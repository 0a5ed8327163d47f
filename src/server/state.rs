//! Application state shared by every request handler
//!
//! Everything here is read-only after startup.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::inference::Pipeline;

/// Shared application state
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Loaded classifier, catalog and preprocessing settings
    pub pipeline: Pipeline,
    /// Server start time
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, pipeline: Pipeline) -> Self {
        Self {
            config,
            pipeline,
            started_at: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

pub type SharedState = Arc<AppState>;

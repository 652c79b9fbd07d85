pub mod config;
pub mod rest;
pub mod retry;
pub mod tasks;

use std::sync::Arc;

use config::ServerConfig;
use tasks::TaskService;

/// Shared application state passed to every HTTP handler.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub tasks: Arc<TaskService>,
    pub started_at: std::time::Instant,
}

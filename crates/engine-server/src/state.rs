use std::sync::Arc;
use std::time::Instant;

use engine_runtime::InstanceRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<InstanceRegistry>,
    pub e2e_mode: bool,
    pub started_at: Instant,
}

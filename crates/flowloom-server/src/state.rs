use std::sync::Arc;

use flowloom_llm::Generator;

/// Shared application state. Everything here is read-only after startup;
/// requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
    pub version: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator: Arc::new(generator),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    pub fn uptime(&self) -> String {
        let secs = (chrono::Utc::now() - self.started_at).num_seconds();
        format!("{secs}s")
    }
}

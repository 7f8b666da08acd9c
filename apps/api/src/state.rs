use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no usable credential is configured; analysis then goes
    /// straight to the fallback generator.
    pub llm: Option<Arc<dyn CompletionBackend>>,
    pub config: Config,
}

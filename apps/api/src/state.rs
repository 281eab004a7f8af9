use std::sync::Arc;

use crate::config::Config;
use crate::document_store::DocumentStore;
use crate::session::SessionStore;
use crate::webhook::WebhookClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Default: RedisSessionStore.
    pub sessions: Arc<dyn SessionStore>,
    /// Default: PgDocumentStore.
    pub documents: Arc<dyn DocumentStore>,
    pub webhook: WebhookClient,
}

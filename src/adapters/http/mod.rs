//! Inbound HTTP adapter. Routes Intercom webhooks and operational endpoints to the application.

pub mod diagnostics;
pub mod webhook;

use crate::shared::config::AppConfig;
use crate::usecases::WebhookService;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Shared handler state. Built once at startup; never mutated.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WebhookService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(service: WebhookService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config: Arc::new(config),
        }
    }
}

/// Build the full router. `POST /` is accepted as an alias of the webhook.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(diagnostics::index).post(webhook::handle_webhook))
        .route("/intercom-webhook", post(webhook::handle_webhook))
        .route("/health", get(diagnostics::health))
        .route("/debug", get(diagnostics::debug_config))
        .route("/test-asana", get(diagnostics::test_asana))
        .route(
            "/test-search/{conversation_id}",
            get(diagnostics::test_search),
        )
        .with_state(state)
}

//! HTTP router for the radar API.

mod health;
mod websites;

use crate::service::WebsiteService;
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WebsiteService>,
}

impl AppState {
    pub fn new(service: WebsiteService) -> Self {
        Self { service: Arc::new(service) }
    }
}

/// Build the API router. Every route is a read-only GET.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/websites", get(websites::list_websites))
        .route("/websites/:hostname", get(websites::get_website))
        .route("/health", get(health::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

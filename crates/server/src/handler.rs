//! HTTP router and shared handler state.
//!
//! This module wires the contact routes to a shared [`ContactStore`].

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};
use contactbook_core::ContactStore;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::routes;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new(store: impl ContactStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }
}

/// Build the contact book router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/post", post(routes::add::add_contact))
        .route("/update", post(routes::update::edit_contact))
        .route("/search", get(routes::search::search_contact))
        .route("/delete", delete(routes::delete::remove_contact))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

//! wordrill engine library
//!
//! Adaptive vocabulary drilling: merges submitted vocabulary into the
//! catalog, picks the next word to quiz and rescores words from quiz
//! outcomes. The HTTP router in [`build_router`] is a thin adapter over
//! [`services::WordService`].

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod services;
pub mod store;

pub use crate::error::{ApiError, ApiResult};
pub use crate::services::WordService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WordService>,
}

impl AppState {
    pub fn new(service: WordService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::word_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::pipeline::{CycleOutcome, Pipeline};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/new", get(new_vacancies))
        .route("/all", get(all_vacancies))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// "Report items new since checkpoint". 404 means "checked successfully,
/// nothing new"; callers must be able to tell that apart from a broken
/// pipeline, which would surface as a 5xx from the framework.
async fn new_vacancies(State(state): State<AppState>) -> impl IntoResponse {
    match state.pipeline.check_new().await {
        CycleOutcome::Fresh { digest, .. } => plain_text(StatusCode::OK, digest),
        CycleOutcome::NothingNew => {
            plain_text(StatusCode::NOT_FOUND, "No new vacancies found.".to_string())
        }
    }
}

/// "Report all current items", checkpoint untouched.
async fn all_vacancies(State(state): State<AppState>) -> impl IntoResponse {
    match state.pipeline.snapshot_all().await {
        Some(digest) => plain_text(StatusCode::OK, digest),
        None => plain_text(StatusCode::NOT_FOUND, "No vacancies found.".to_string()),
    }
}

fn plain_text(status: StatusCode, body: String) -> impl IntoResponse {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
}

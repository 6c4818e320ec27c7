//! Word endpoints
//!
//! Thin adapters over [`crate::services::WordService`]; all validation and
//! scoring happens in the service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use tracing::debug;

use crate::error::ApiResult;
use crate::services::{OutcomeRequest, SubmitOutcome, WordRequest, WordSummary};
use crate::AppState;

/// GET /words
pub async fn list_words(State(state): State<AppState>) -> ApiResult<Json<Vec<WordSummary>>> {
    let words = state.service.list_words().await?;
    Ok(Json(words))
}

/// POST /words
///
/// 201 when a new word was created, 200 when an existing word was extended
/// or already knew every meaning.
pub async fn submit_word(
    State(state): State<AppState>,
    Json(request): Json<WordRequest>,
) -> ApiResult<Response> {
    let outcome = state.service.submit_word(request).await?;
    let status = match outcome {
        SubmitOutcome::Created { .. } => StatusCode::CREATED,
        SubmitOutcome::Extended { .. } | SubmitOutcome::Unchanged { .. } => StatusCode::OK,
    };
    Ok((status, Json(outcome)).into_response())
}

/// GET /words/next
///
/// 204 when the catalog is empty.
pub async fn pick_next(State(state): State<AppState>) -> ApiResult<Response> {
    match state.service.pick_next().await? {
        Some(word) => Ok(Json(word).into_response()),
        None => {
            debug!("No word to present");
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// POST /words/outcome
pub async fn apply_outcome(
    State(state): State<AppState>,
    Json(request): Json<OutcomeRequest>,
) -> ApiResult<StatusCode> {
    state.service.apply_outcome(request).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /words/:id
pub async fn archive_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.archive_word(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /words/:id/restore
pub async fn restore_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.restore_word(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /words/:id/purge
pub async fn purge_word(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.service.purge_word(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build word routes
pub fn word_routes() -> Router<AppState> {
    Router::new()
        .route("/words", get(list_words).post(submit_word))
        .route("/words/next", get(pick_next))
        .route("/words/outcome", post(apply_outcome))
        .route("/words/:id", delete(archive_word))
        .route("/words/:id/restore", post(restore_word))
        .route("/words/:id/purge", delete(purge_word))
}

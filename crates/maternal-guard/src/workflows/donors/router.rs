use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tracing::error;

use super::domain::DonorRegistration;
use super::matcher::MatchQuery;
use super::service::{DonorRegistry, DonorServiceError};
use super::store::DonorStore;

/// Router builder exposing donor registration, listing, and matching.
pub fn donor_router<S>(registry: Arc<DonorRegistry<S>>) -> Router
where
    S: DonorStore + 'static,
{
    Router::new()
        .route(
            "/donors",
            post(register_handler::<S>).get(list_handler::<S>),
        )
        .route("/donors/match", post(match_handler::<S>))
        .with_state(registry)
}

pub(crate) async fn register_handler<S>(
    State(registry): State<Arc<DonorRegistry<S>>>,
    axum::Json(registration): axum::Json<DonorRegistration>,
) -> Response
where
    S: DonorStore + 'static,
{
    // Store calls block on file i/o and the append lock.
    match tokio::task::spawn_blocking(move || registry.register(registration)).await {
        Ok(Ok(record)) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(join_error) => aborted_response(join_error),
    }
}

pub(crate) async fn list_handler<S>(State(registry): State<Arc<DonorRegistry<S>>>) -> Response
where
    S: DonorStore + 'static,
{
    match tokio::task::spawn_blocking(move || registry.list()).await {
        Ok(Ok(listing)) => (StatusCode::OK, axum::Json(listing)).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(join_error) => aborted_response(join_error),
    }
}

pub(crate) async fn match_handler<S>(
    State(registry): State<Arc<DonorRegistry<S>>>,
    axum::Json(query): axum::Json<MatchQuery>,
) -> Response
where
    S: DonorStore + 'static,
{
    match tokio::task::spawn_blocking(move || registry.find_matches(&query)).await {
        Ok(Ok(matches)) => (StatusCode::OK, axum::Json(matches)).into_response(),
        Ok(Err(err)) => error_response(err),
        Err(join_error) => aborted_response(join_error),
    }
}

fn error_response(err: DonorServiceError) -> Response {
    let status = match err {
        DonorServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DonorServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": err.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

fn aborted_response(join_error: tokio::task::JoinError) -> Response {
    error!(error = %join_error, "donor registry task aborted");
    let payload = json!({
        "error": "donor request did not complete",
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

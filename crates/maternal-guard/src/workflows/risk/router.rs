use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;
use tracing::error;

use super::alert::AlertTransport;
use super::classifier::RiskModel;
use super::service::{RiskAssessmentError, RiskAssessmentRequest, RiskAssessmentService};

/// Router builder exposing the risk assessment endpoint.
pub fn risk_router<M, T>(service: Arc<RiskAssessmentService<M, T>>) -> Router
where
    M: RiskModel + 'static,
    T: AlertTransport + 'static,
{
    Router::new()
        .route("/risk-assessment", post(assess_handler::<M, T>))
        .with_state(service)
}

pub(crate) async fn assess_handler<M, T>(
    State(service): State<Arc<RiskAssessmentService<M, T>>>,
    axum::Json(request): axum::Json<RiskAssessmentRequest>,
) -> Response
where
    M: RiskModel + 'static,
    T: AlertTransport + 'static,
{
    // The alert path blocks on the mail relay.
    let outcome = tokio::task::spawn_blocking(move || service.assess(request)).await;

    match outcome {
        Ok(Ok(assessment)) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Ok(Err(RiskAssessmentError::Validation(err))) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Ok(Err(RiskAssessmentError::Classification(err))) => {
            error!(error = %err, "risk classification failed");
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            error!(error = %join_error, "risk assessment task aborted");
            let payload = json!({
                "error": "risk assessment did not complete",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::donors::DonorServiceError;
use crate::workflows::risk::{ModelLoadError, NotificationError, RiskAssessmentError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Model(ModelLoadError),
    Notification(NotificationError),
    Assessment(RiskAssessmentError),
    Donors(DonorServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Model(err) => write!(f, "risk model error: {}", err),
            AppError::Notification(err) => write!(f, "notification setup error: {}", err),
            AppError::Assessment(err) => write!(f, "risk assessment error: {}", err),
            AppError::Donors(err) => write!(f, "donor registry error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Model(err) => Some(err),
            AppError::Notification(err) => Some(err),
            AppError::Assessment(err) => Some(err),
            AppError::Donors(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Assessment(RiskAssessmentError::Validation(_))
            | AppError::Donors(DonorServiceError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Model(_)
            | AppError::Notification(_)
            | AppError::Assessment(_)
            | AppError::Donors(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ModelLoadError> for AppError {
    fn from(value: ModelLoadError) -> Self {
        Self::Model(value)
    }
}

impl From<NotificationError> for AppError {
    fn from(value: NotificationError) -> Self {
        Self::Notification(value)
    }
}

impl From<RiskAssessmentError> for AppError {
    fn from(value: RiskAssessmentError) -> Self {
        Self::Assessment(value)
    }
}

impl From<DonorServiceError> for AppError {
    fn from(value: DonorServiceError) -> Self {
        Self::Donors(value)
    }
}

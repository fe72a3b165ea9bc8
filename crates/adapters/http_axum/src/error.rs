//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use relaydash_app::controller::ActionError;
use relaydash_domain::error::ValidationError;

/// JSON error body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Everything a dashboard handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// A path or form value did not parse.
    Validation(ValidationError),
    /// The controller refused or is gone.
    Action(ActionError),
    /// A template failed to render.
    Render(askama::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        Self::Action(err)
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        Self::Render(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::Action(ActionError::NotFound(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Action(ActionError::ControllerGone) => {
                tracing::error!("dashboard controller is gone");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "dashboard unavailable".to_string(),
                )
            }
            Self::Render(err) => {
                tracing::error!(error = %err, "template rendering failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

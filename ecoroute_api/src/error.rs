use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ecoroute_core::optimizer::OptimizeError;
use serde::Serialize;
use tracing::{error, warn};

pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug)]
pub enum ApiError {
    /// Shown to the caller as is
    BadRequest(String),
    /// Logged, the caller only gets a generic message
    InternalServerError(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl From<OptimizeError> for ApiError {
    fn from(error: OptimizeError) -> Self {
        match error {
            OptimizeError::InvalidInput(_)
            | OptimizeError::NoRoutesFound { .. }
            | OptimizeError::Selection(_) => ApiError::BadRequest(error.to_string()),
            OptimizeError::Provider(error) => ApiError::InternalServerError(format!("{:?}", error)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InternalServerError(detail) => {
                error!("Error in optimize_route: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: INTERNAL_ERROR_MESSAGE,
                    }),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => {
                warn!("Rejected optimize_route request: {}", message);
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error: &message })).into_response()
            }
        }
    }
}

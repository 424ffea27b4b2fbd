use axum::{http::StatusCode, response::IntoResponse, Json};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error("{0}")]
    BookingConflict(String),
    #[error("{0}")]
    EntityNotFound(String),
    #[error("{0}")]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    NotCalendarContent(String),
    #[error("{0}")]
    NotConfigured(String),
    #[error("{0}")]
    ExternalServiceError(String),
    #[error("upstream request failed")]
    UpstreamRequestError(#[source] reqwest::Error),
    #[error("an error occurred while running a database operation")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error("{0}")]
    ConvertToUuidError(#[from] uuid::Error),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error("authorization is missing or wrong")]
    UnauthorizedError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status_code = match self {
            AppError::InvalidRequest(_)
            | AppError::ValidationError(_)
            | AppError::ConvertToUuidError(_) => StatusCode::BAD_REQUEST,
            AppError::UnauthorizedError => StatusCode::UNAUTHORIZED,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BookingConflict(_) => StatusCode::CONFLICT,
            AppError::UnprocessableEntity(_) | AppError::NotCalendarContent(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::NotConfigured(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::ExternalServiceError(ref e) => {
                tracing::warn!(error.message = %e, "Upstream service rejected the request");
                StatusCode::BAD_GATEWAY
            }
            e @ (AppError::UpstreamRequestError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::ConversionEntityError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Unexpected error happened"
                );
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let body = serde_json::json!({ "ok": false, "reason": self.to_string() });
        (status_code, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

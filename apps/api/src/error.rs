use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use formcraft_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Validation(_)
            | AppError::InvalidFieldType(_)
            | AppError::Reorder(_)
            | AppError::Format(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        let payload = Json(ErrorResponse {
            error: self.0.to_string(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use formcraft_core::AppError;

    use super::ApiError;

    #[test]
    fn error_categories_map_to_status_codes() {
        let cases = [
            (AppError::Validation("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::InvalidFieldType("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::Reorder("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::Format("x".to_owned()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".to_owned()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".to_owned()), StatusCode::CONFLICT),
            (AppError::Transport("x".to_owned()), StatusCode::BAD_GATEWAY),
            (
                AppError::Internal("x".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).into_response().status(), status);
        }
    }
}

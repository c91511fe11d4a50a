use crate::services::taxonomy::TaxonomyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Domain error carrier for the taxonomy handlers. Maps the error
/// taxonomy onto statuses: not-found is 404, validation and uniqueness
/// conflicts are 400, store failures are 500 with the detail kept out of
/// the response body.
pub struct ApiError(TaxonomyError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, class, detail) = match &self.0 {
            TaxonomyError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not Found", None),
            TaxonomyError::Conflict { field, .. } => (StatusCode::BAD_REQUEST, "Conflict", Some(*field)),
            TaxonomyError::Invalid { field, .. } => {
                (StatusCode::BAD_REQUEST, "Validation", Some(*field))
            }
            TaxonomyError::Store(_) | TaxonomyError::Pool(_) => {
                tracing::error!("store error: {:?}", self.0);
                let body = json!({
                    "error": "Internal Server Error",
                    "message": "internal server error",
                });
                return (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response();
            }
        };

        let mut body = json!({
            "error": class,
            "message": self.0.to_string(),
        });
        if let Some(field) = detail {
            body["detail"] = json!(field);
        }
        (status, Json(body)).into_response()
    }
}

impl From<TaxonomyError> for ApiError {
    fn from(err: TaxonomyError) -> Self {
        Self(err)
    }
}

/// Catch-all for infrastructure handlers (healthz) where any failure is
/// an internal error.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Application error: {:?}", self.0);
        let body = json!({
            "error": "Internal Server Error",
            "message": "internal server error",
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

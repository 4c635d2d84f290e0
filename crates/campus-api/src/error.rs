//! API error type: maps the core taxonomy onto HTTP statuses with a
//! uniform `{"message": "..."}` body. Internal failure detail is
//! logged server-side and never exposed to the caller.

use axum::Json;
use axum::extract::FromRequest;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use campus_auth::AuthError;
use campus_core::error::CampusError;
use serde_json::json;

#[derive(Debug)]
pub struct ApiError(pub CampusError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<CampusError> for ApiError {
    fn from(err: CampusError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CampusError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            CampusError::Unauthorized { reason } => (StatusCode::UNAUTHORIZED, reason.clone()),
            CampusError::Forbidden { reason } => (StatusCode::FORBIDDEN, reason.clone()),
            CampusError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            CampusError::Conflict { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            CampusError::Validation { message } => {
                (StatusCode::UNPROCESSABLE_ENTITY, message.clone())
            }
            CampusError::Database(_) | CampusError::Crypto(_) | CampusError::Internal(_) => {
                tracing::error!(error = %self.0, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// JSON extractor whose rejection carries the uniform error body shape
/// (a malformed or missing body is a 400, like any other bad input).
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::from_request(req, state)
            .await
            .map_err(|e| ApiError(CampusError::bad_request(e.body_text())))?;
        Ok(AppJson(value))
    }
}

//! HTTP translation of core failures.
//!
//! The core crate reports outcomes as [`CoreError`] variants; this module is
//! the only place that decides what each variant means on the wire. Error
//! bodies always carry a single `detail` string, which is what the dashboard
//! client parses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use coursebook_core::CoreError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

/// Wrapper carrying a core failure out of a handler.
#[derive(Debug)]
pub struct Failure(pub CoreError);

pub type ApiResult<T> = Result<T, Failure>;

impl From<CoreError> for Failure {
    fn from(err: CoreError) -> Self {
        Self(err)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Conflict(_) | CoreError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CoreError::Store(_) | CoreError::Decode(_) => {
                tracing::error!("internal error: {:?}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorRes {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CoreError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (
                CoreError::InvalidArgument("x".into()),
                StatusCode::BAD_REQUEST,
            ),
            (CoreError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
        ];
        for (err, expected) in cases {
            let response = Failure(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}

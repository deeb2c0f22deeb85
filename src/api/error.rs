//! JSON error responses.
//!
//! Every failure is returned as `{"error": ..., "details": ...}` with a non-2xx status.

use crate::core::error::ServiceError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError {
            status,
            error: error.into(),
            details: details.into(),
        }
    }

    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request", details)
    }

    pub fn unauthorized(details: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", details)
    }

    /// Replaces the headline while keeping status and details.
    pub fn headline(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let (status, headline) = match &err {
            ServiceError::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
            ServiceError::QuotaExceeded => (StatusCode::TOO_MANY_REQUESTS, "Daily limit reached"),
            ServiceError::InvalidCredentials | ServiceError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            ServiceError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            ServiceError::Conflict(_) => (StatusCode::CONFLICT, "Conflict"),
            ServiceError::Generation(_)
            | ServiceError::PasswordHash(_)
            | ServiceError::Repository(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong. Please try again.")
            }
        };

        if err.is_internal() {
            error!("{err}");
        }

        ApiError::new(status, headline, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), "Invalid request", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(rejection.status(), "Invalid request", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(rejection.status(), "Invalid request", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.error,
                details: self.details,
            }),
        )
            .into_response()
    }
}

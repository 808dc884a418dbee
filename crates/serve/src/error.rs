//! API error responses
//!
//! Every failure leaves the server as `{ "message", "code", "appcode" }`
//! with the HTTP status equal to `code`.
//!
//! App code prefixes:
//! - `SV` server errors
//! - `AU` authorization errors
//! - `DT` data errors
//! - `CL` client errors

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use shelf_core::ShelfError;
use thiserror::Error;
use tracing::{error, warn};

/// Error kinds exposed to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    BadRequest,
    NotFound,
    PayloadTooLarge,
    /// Not raised by any route yet; kept for mapping backend timeouts
    RequestTimeout,
    UnknownError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn appcode(self) -> &'static str {
        match self {
            Self::UnknownError => "SV01",
            Self::Unauthorized => "AU01",
            Self::NotFound => "DT01",
            Self::BadRequest => "CL01",
            Self::RequestTimeout => "CL02",
            Self::PayloadTooLarge => "CL03",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::UnknownError => "Something went wrong..",
            Self::Unauthorized => "Unauthorized Access is Forbidden",
            Self::NotFound => "Not Found",
            Self::BadRequest => "Bad Request",
            Self::RequestTimeout => "Request Timed Out",
            Self::PayloadTooLarge => "Payload Too Large",
        }
    }
}

/// JSON body of an error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appcode: Option<String>,
}

/// An error ready to be sent to an API client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    /// Create an error with the kind's standard message
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.message().to_string(),
        }
    }

    /// Create an error whose message carries extra detail for the client
    pub fn with_detail<S: AsRef<str>>(kind: ErrorKind, detail: S) -> Self {
        Self {
            kind,
            message: format!("{}: {}", kind.message(), detail.as_ref()),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized)
    }

    pub fn bad_request<S: AsRef<str>>(detail: S) -> Self {
        Self::with_detail(ErrorKind::BadRequest, detail)
    }

    pub fn not_found() -> Self {
        Self::new(ErrorKind::NotFound)
    }

    pub fn payload_too_large() -> Self {
        Self::new(ErrorKind::PayloadTooLarge)
    }

    pub fn request_timeout() -> Self {
        Self::new(ErrorKind::RequestTimeout)
    }

    pub fn unknown() -> Self {
        Self::new(ErrorKind::UnknownError)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// The response body for this error
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.message.clone(),
            code: self.status().as_u16(),
            appcode: Some(self.kind.appcode().to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<ShelfError> for ApiError {
    fn from(err: ShelfError) -> Self {
        match err {
            ShelfError::BadRequest { message } => Self::bad_request(message),
            ShelfError::Unauthorized { .. } => Self::unauthorized(),
            ShelfError::NotFound { resource } => Self::with_detail(ErrorKind::NotFound, resource),
            other => {
                error!(category = %other.category(), "Request failed: {}", other);
                Self::unknown()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            warn!("Request body exceeds the configured limit");
            return Self::payload_too_large();
        }
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_statuses() {
        assert_eq!(ErrorKind::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::BadRequest.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::RequestTimeout.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            ErrorKind::PayloadTooLarge.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ErrorKind::UnknownError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_body_shape() {
        let body = ApiError::unauthorized().body();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Unauthorized Access is Forbidden",
                "code": 401,
                "appcode": "AU01"
            })
        );
    }

    #[test]
    fn test_reserved_timeout_kind() {
        let body = ApiError::request_timeout().body();
        assert_eq!(body.code, 408);
        assert_eq!(body.appcode.as_deref(), Some("CL02"));
        assert_eq!(body.message, "Request Timed Out");
    }

    #[test]
    fn test_bad_request_detail() {
        let err = ApiError::bad_request("query too long");
        assert_eq!(err.to_string(), "Bad Request: query too long");
        assert_eq!(err.body().code, 400);
    }

    #[test]
    fn test_from_shelf_error() {
        let err: ApiError = ShelfError::bad_request("not an array").into();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(err.to_string().contains("not an array"));

        let err: ApiError = ShelfError::not_found("products/9").into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: ApiError = ShelfError::unauthorized("bad token").into();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_backend_errors_hide_details() {
        let err: ApiError = ShelfError::search_engine("cluster red: shard 3 failed").into();
        assert_eq!(err.kind(), ErrorKind::UnknownError);
        assert_eq!(err.body().message, "Something went wrong..");

        let err: ApiError = ShelfError::timeout("search engine search").into();
        assert_eq!(err.kind(), ErrorKind::UnknownError);
        assert_eq!(err.body().code, 500);
        assert_eq!(err.body().appcode.as_deref(), Some("SV01"));

        let err: ApiError = ShelfError::cache("SETEX failed").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_into_response() {
        let response = ApiError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, 404);
        assert_eq!(body.appcode.as_deref(), Some("DT01"));
    }
}

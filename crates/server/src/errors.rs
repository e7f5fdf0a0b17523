use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use service::auth::errors::AuthError;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

/// Every failure a handler or guard can return, already classified for HTTP.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request body")]
    InvalidBody,
    /// 400 with an `error` field.
    #[error("{0}")]
    BadRequest(String),
    /// 400 with a `message` field; the request is understood but refused.
    #[error("{0}")]
    Refused(String),
    #[error("{0} is already registered, please use another username")]
    Conflict(String),
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("{0}")]
    Forbidden(String),
    /// The addressed entity does not exist.
    #[error("{0}")]
    NotFound(String),
    /// A referenced entity (or route) does not exist.
    #[error("{0}")]
    MissingReference(String),
    #[error("{0}")]
    Store(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::BadRequest(_) | ApiError::Refused(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::InvalidToken | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::MissingToken | ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) | ApiError::MissingReference(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        let msg = self.to_string();
        match self {
            ApiError::MissingToken | ApiError::InvalidToken => json!({"auth": false, "message": msg}),
            ApiError::InvalidCredentials => json!({"auth": false, "token": null, "error": msg}),
            ApiError::Refused(_) | ApiError::Forbidden(_) | ApiError::NotFound(_) => json!({"message": msg}),
            _ => json!({"error": msg}),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Model(e) => ApiError::BadRequest(e.to_string()),
            ServiceError::Conflict(msg) | ServiceError::ForeignKey(msg) => ApiError::BadRequest(msg),
            ServiceError::Db(msg) | ServiceError::Internal(msg) => ApiError::Store(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(msg) => ApiError::BadRequest(msg),
            AuthError::Conflict(username) => ApiError::Conflict(username),
            AuthError::Unauthorized => ApiError::InvalidCredentials,
            other => ApiError::Store(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "json body rejected");
        ApiError::InvalidBody
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(reason = %rejection.body_text(), "path rejected");
        ApiError::InvalidBody
    }
}

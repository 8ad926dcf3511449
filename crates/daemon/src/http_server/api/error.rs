use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::RETRY_AFTER;
use http::{HeaderValue, StatusCode};
use serde::Serialize;

use common::prelude::{AuthError, ErrorKind, StoreError};

/// Failure of any API handler, rendered as `{"error": <kind>, "msg": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("missing or malformed Authorization header")]
    MissingCredentials,
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorKind,
    msg: String,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Store(e) => e.kind(),
            ServiceError::Auth(e) => e.kind(),
            ServiceError::Body(_) | ServiceError::InvalidRequest(_) => ErrorKind::InvalidFormat,
            ServiceError::MissingCredentials => ErrorKind::Unauthorized,
            ServiceError::Worker(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        if let ServiceError::MissingCredentials = self {
            return StatusCode::UNAUTHORIZED;
        }
        match self.kind() {
            ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists => StatusCode::CONFLICT,
            ErrorKind::InvalidFormat | ErrorKind::InvalidName => StatusCode::BAD_REQUEST,
            ErrorKind::StorageUnavailable | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            ServiceError::Auth(AuthError::RateLimited { retry_after }) => Some(*retry_after),
            _ => None,
        }
    }

    /// Client-facing message. Server-side failures are not detailed.
    fn message(&self) -> String {
        match self.kind() {
            ErrorKind::StorageUnavailable | ErrorKind::Internal => {
                "internal server error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("API ERROR: {}", self);
        } else {
            tracing::debug!("API ERROR: {}", self);
        }

        let body = ErrorBody {
            error: self.kind(),
            msg: self.message(),
        };
        let mut response = (status, Json(body)).into_response();

        if let Some(wait) = self.retry_after() {
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            if let Ok(value) = HeaderValue::from_str(&secs.max(1).to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }
        response
    }
}

/// Run blocking store or credential work off the async runtime.
pub async fn blocking<T, E, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    ServiceError: From<E>,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}

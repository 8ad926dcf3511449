use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

/// Credentials carried by an `Authorization` header.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorization {
    /// `Bearer <handle>:<token>`
    Token { handle: String, token: String },
    /// `<handle>:<password>`
    Password { handle: String, password: String },
}

impl std::fmt::Debug for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authorization::Token { handle, .. } => {
                f.debug_struct("Token").field("handle", handle).finish_non_exhaustive()
            }
            Authorization::Password { handle, .. } => f
                .debug_struct("Password")
                .field("handle", handle)
                .finish_non_exhaustive(),
        }
    }
}

impl Authorization {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ServiceError> {
        let value = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ServiceError::MissingCredentials)?
            .trim();

        let (bearer, pair) = match value.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => (true, rest.trim()),
            Some(_) => return Err(ServiceError::MissingCredentials),
            None => (false, value),
        };
        let (handle, secret) = pair
            .split_once(':')
            .filter(|(handle, secret)| !handle.is_empty() && !secret.is_empty())
            .ok_or(ServiceError::MissingCredentials)?;

        let handle = handle.to_string();
        Ok(if bearer {
            Authorization::Token {
                handle,
                token: secret.to_string(),
            }
        } else {
            Authorization::Password {
                handle,
                password: secret.to_string(),
            }
        })
    }

    pub fn handle(&self) -> &str {
        match self {
            Authorization::Token { handle, .. } | Authorization::Password { handle, .. } => handle,
        }
    }

    /// Verify against the superuser realm.
    pub async fn verify_superuser(self, state: &ServiceState) -> Result<String, ServiceError> {
        let credentials = state.credentials().clone();
        blocking(move || {
            let superusers = credentials.superusers();
            match self {
                Authorization::Token { handle, token } => {
                    superusers.check(&handle, &token).map(|_| handle)
                }
                Authorization::Password { handle, password } => superusers
                    .authenticate(&handle, &password)
                    .map(|identity| identity.handle),
            }
        })
        .await
    }
}

/// Rate limiter key for a request: the peer IP when known.
pub fn client_key(addr: Option<ConnectInfo<SocketAddr>>) -> String {
    match addr {
        Some(ConnectInfo(addr)) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

/// Gate document routes behind a superuser when `protect_documents` is set.
pub async fn require_superuser(
    State(state): State<ServiceState>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if !state.protect_documents() {
        return Ok(next.run(request).await);
    }

    let authorization = Authorization::from_headers(request.headers())?;
    let handle = authorization.verify_superuser(&state).await?;
    tracing::debug!(identity = %handle, "document request authorized");

    Ok(next.run(request).await)
}

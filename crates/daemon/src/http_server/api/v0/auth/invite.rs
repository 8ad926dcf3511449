use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

use crate::http_server::api::error::{blocking, ServiceError};
use crate::http_server::api::v0::Authorization;
use crate::ServiceState;

#[derive(Clone, Serialize, Deserialize)]
pub struct InviteResponse {
    pub code: String,
    pub expires_in_secs: u64,
}

impl std::fmt::Debug for InviteResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InviteResponse")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish_non_exhaustive()
    }
}

/// Mint a one-time registration code. Requires `Authorization: Bearer
/// <handle>:<token>` of a superuser.
pub async fn handler(
    State(state): State<ServiceState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    let (handle, token) = match Authorization::from_headers(&headers)? {
        Authorization::Token { handle, token } => (handle, token),
        Authorization::Password { .. } => {
            return Err(ServiceError::InvalidRequest(
                "invites require a bearer token".into(),
            ))
        }
    };
    tracing::info!("INVITE: requested by '{}'", handle);

    let credentials = state.credentials().clone();
    let invite = blocking(move || credentials.issue_invite(&handle, &token)).await?;

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            code: invite.code,
            expires_in_secs: invite.expires_in_secs,
        }),
    ))
}

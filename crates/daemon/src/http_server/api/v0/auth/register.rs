use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use common::prelude::Realm;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub identity: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    /// Invite code, or the bootstrap token for the first superuser
    pub token: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("identity", &self.identity)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: String,
    pub user: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Extension(realm): Extension<Realm>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(req) = payload?;
    tracing::info!("REGISTER: {} '{}'", realm, req.identity);

    let credentials = state.credentials().clone();
    let identity = blocking(move || {
        credentials.register(realm, &req.token, &req.identity, &req.name, &req.password)
    })
    .await?;

    Ok(Json(RegisterResponse {
        status: "created".to_string(),
        user: identity.handle,
    }))
}

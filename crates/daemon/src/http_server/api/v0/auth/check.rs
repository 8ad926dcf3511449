use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use common::prelude::Realm;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Clone, Serialize, Deserialize)]
pub struct CheckRequest {
    pub username: String,
    pub token: String,
}

impl std::fmt::Debug for CheckRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    pub status: String,
    pub user: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Extension(realm): Extension<Realm>,
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(req) = payload?;

    let credentials = state.credentials().clone();
    let username = req.username.clone();
    blocking(move || credentials.realm(realm).check(&req.username, &req.token)).await?;

    tracing::debug!("CHECK: {} token valid for '{}'", realm, username);
    Ok(Json(CheckResponse {
        status: "ok".to_string(),
        user: username,
    }))
}

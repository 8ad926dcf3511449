use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Realm;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::{blocking, ServiceError};
use crate::http_server::api::v0::client_key;
use crate::ServiceState;

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub token: String,
    pub user: String,
    pub name: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Extension(realm): Extension<Realm>,
    addr: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(req) = payload?;
    let client = client_key(addr);
    tracing::info!("LOGIN: {} '{}' from {}", realm, req.identity, client);

    let credentials = state.credentials().clone();
    let issued = blocking(move || {
        credentials
            .realm(realm)
            .login(&client, &req.identity, &req.password)
    })
    .await?;

    Ok(Json(LoginResponse {
        status: "ok".to_string(),
        token: issued.token,
        user: issued.identity,
        name: issued.name,
    }))
}

/// Login against a realm's route prefix (`admin` or `customer`).
#[derive(Debug, Clone)]
pub struct RealmLogin {
    pub prefix: &'static str,
    pub request: LoginRequest,
}

impl ApiRequest for RealmLogin {
    type Response = LoginResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join(&format!("/api/v0/{}/login", self.prefix))?;
        Ok(client.post(full_url).json(&self.request))
    }
}

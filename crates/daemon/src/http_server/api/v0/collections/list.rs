use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct ListRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub collections: Vec<String>,
}

pub async fn handler(State(state): State<ServiceState>) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store().clone();
    let collections = blocking(move || store.list_collections()).await?;

    tracing::debug!("LIST COLLECTIONS: {} collections", collections.len());
    Ok(Json(ListResponse { collections }))
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/collections")?;
        Ok(client.get(full_url))
    }
}

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Document;

use crate::http_server::api::client::{api_url, ApiError, ApiRequest};
use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct GetRequest {
    /// Collection identifier
    #[arg(long)]
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetResponse {
    pub collection: String,
    /// Number of records currently stored
    pub count: usize,
    pub config: Document,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store().clone();
    let info = blocking(move || store.get_collection(&collection)).await?;

    Ok(Json(GetResponse {
        collection: info.id,
        count: info.count,
        config: info.config,
    }))
}

impl ApiRequest for GetRequest {
    type Response = GetResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = api_url(base_url, "/api/v0/collections", &[&self.collection])?;
        Ok(client.get(full_url))
    }
}

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::{api_url, ApiError, ApiRequest};
use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct DeleteRequest {
    /// Collection identifier
    #[arg(long)]
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub collection: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    tracing::info!("DELETE COLLECTION: '{}'", collection);

    let store = state.store().clone();
    let id = collection.clone();
    blocking(move || store.delete_collection(&id)).await?;

    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
        collection,
    }))
}

impl ApiRequest for DeleteRequest {
    type Response = DeleteResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = api_url(base_url, "/api/v0/collections", &[&self.collection])?;
        Ok(client.delete(full_url))
    }
}

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Document;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CreateRequest {
    /// Display name of the collection to create
    #[arg(long)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub collection: String,
    pub config: Document,
}

pub async fn handler(
    State(state): State<ServiceState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(req) = payload?;
    tracing::info!(
        "CREATE COLLECTION: Received request to create collection '{}'",
        req.name
    );

    let store = state.store().clone();
    let info = blocking(move || store.create_collection(&req.name)).await?;

    tracing::info!("CREATE COLLECTION: created with ID {}", info.id);
    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            collection: info.id,
            config: info.config,
        }),
    ))
}

impl ApiRequest for CreateRequest {
    type Response = CreateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/collections")?;
        Ok(client.post(full_url).json(&self))
    }
}

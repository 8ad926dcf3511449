use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::Document;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

/// Replacement config document. Any JSON object is accepted.
pub type UpdateRequest = Document;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    pub collection: String,
    pub config: Document,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(collection): Path<String>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(body) = payload?;
    tracing::info!("UPDATE COLLECTION: replacing config of '{}'", collection);

    let store = state.store().clone();
    let id = collection.clone();
    let config = blocking(move || store.update_collection(&id, body)).await?;

    Ok(Json(UpdateResponse {
        status: "updated".to_string(),
        collection,
        config,
    }))
}

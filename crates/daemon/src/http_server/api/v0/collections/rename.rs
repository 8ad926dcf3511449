use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    /// New collection identifier
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameResponse {
    pub status: String,
    pub collection: String,
    pub renamed_to: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(collection): Path<String>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(req) = payload?;
    tracing::info!("RENAME COLLECTION: '{}' -> '{}'", collection, req.to);

    let store = state.store().clone();
    let (from, to) = (collection.clone(), req.to.clone());
    blocking(move || store.rename_collection(&from, &to)).await?;

    Ok(Json(RenameResponse {
        status: "renamed".to_string(),
        collection,
        renamed_to: req.to,
    }))
}

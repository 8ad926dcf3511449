use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::Document;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    pub id: String,
    pub collection: String,
    pub data: Document,
}

/// Full overwrite of an existing record; fields are not merged.
pub async fn handler(
    State(state): State<ServiceState>,
    Path((collection, id)): Path<(String, String)>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(body) = payload?;

    let store = state.store().clone();
    let (target, record) = (collection.clone(), id.clone());
    let data = blocking(move || store.update_record(&target, &record, &body).map(|_| body)).await?;

    tracing::info!("UPDATE RECORD: {} in '{}'", id, collection);
    Ok(Json(UpdateResponse {
        status: "updated".to_string(),
        id,
        collection,
        data,
    }))
}

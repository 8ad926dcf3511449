use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    pub id: String,
    pub collection: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store().clone();
    let (target, record) = (collection.clone(), id.clone());
    blocking(move || store.delete_record(&target, &record)).await?;

    tracing::info!("DELETE RECORD: {} in '{}'", id, collection);
    Ok(Json(DeleteResponse {
        status: "deleted".to_string(),
        id,
        collection,
    }))
}

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use common::prelude::Record;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub collection: String,
    pub count: usize,
    pub items: Vec<Record>,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(collection): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store().clone();
    let id = collection.clone();
    let items = blocking(move || {
        store
            .list_records(&id)
            .map(|records| records.collect::<Vec<_>>())
    })
    .await?;

    tracing::debug!("LIST RECORDS: {} records in '{}'", items.len(), collection);
    Ok(Json(ListResponse {
        collection,
        count: items.len(),
        items,
    }))
}

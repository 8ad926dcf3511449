use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::{Deserialize, Serialize};

use common::prelude::Document;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub status: String,
    pub id: String,
    pub collection: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Path(collection): Path<String>,
    payload: Result<Json<Document>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let Json(body) = payload?;

    let store = state.store().clone();
    let target = collection.clone();
    let id = blocking(move || store.create_record(&target, &body)).await?;

    tracing::info!("CREATE RECORD: {} in '{}'", id, collection);
    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            status: "created".to_string(),
            id,
            collection,
        }),
    ))
}

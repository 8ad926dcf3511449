use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::http_server::api::error::{blocking, ServiceError};
use crate::ServiceState;

/// Responds with the stored record body as-is.
pub async fn handler(
    State(state): State<ServiceState>,
    Path((collection, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServiceError> {
    let store = state.store().clone();
    let body = blocking(move || store.read_record(&collection, &id)).await?;
    Ok(Json(body))
}

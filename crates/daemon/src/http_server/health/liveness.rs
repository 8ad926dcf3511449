use axum::response::IntoResponse;

use super::HealthStatus;

/// The process is up and serving requests. Storage is not consulted.
#[tracing::instrument]
pub async fn handler() -> impl IntoResponse {
    HealthStatus::ok()
}

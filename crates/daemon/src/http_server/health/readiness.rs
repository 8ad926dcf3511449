use std::time::Duration;

use axum::response::{IntoResponse, Response};
use tokio::time::timeout;

use super::data_source::{DataSourceError, StateDataSource};
use super::HealthStatus;

const READINESS_TIMEOUT: Duration = Duration::from_secs(10);

/// Ready once the storage root and the credential directory answer.
#[tracing::instrument]
pub async fn handler(data_src: StateDataSource) -> Response {
    let status = match timeout(READINESS_TIMEOUT, data_src.is_ready()).await {
        Ok(Ok(())) => HealthStatus::ok(),
        Ok(Err(DataSourceError::DependencyFailure)) => {
            HealthStatus::failure("storage is not reachable")
        }
        Ok(Err(DataSourceError::ShuttingDown)) => HealthStatus::failure("shutting down"),
        Err(_) => {
            tracing::warn!("readiness check exceeded {:?}", READINESS_TIMEOUT);
            HealthStatus::failure("readiness check timed out")
        }
    };
    status.into_response()
}

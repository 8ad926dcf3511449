use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;

mod data_source;
mod liveness;
mod readiness;
mod version;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(liveness::handler))
        .route("/readyz", get(readiness::handler))
        .route("/version", get(version::handler))
        .with_state(state)
}

/// Body of the liveness and readiness probes.
#[derive(Debug, Clone, Serialize)]
struct HealthStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl HealthStatus {
    fn ok() -> Self {
        Self {
            status: "ok",
            message: None,
        }
    }

    fn failure(message: &'static str) -> Self {
        Self {
            status: "failure",
            message: Some(message),
        }
    }
}

impl IntoResponse for HealthStatus {
    fn into_response(self) -> Response {
        let code = match self.message {
            None => StatusCode::OK,
            Some(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        (code, Json(self)).into_response()
    }
}

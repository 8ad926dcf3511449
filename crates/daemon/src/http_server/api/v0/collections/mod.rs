use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod rename;
pub mod update;

pub use create::{CreateRequest, CreateResponse};
pub use delete::{DeleteRequest, DeleteResponse};
pub use get::{GetRequest, GetResponse};
pub use list::{ListRequest, ListResponse};
pub use rename::{RenameRequest, RenameResponse};
pub use update::{UpdateRequest, UpdateResponse};

use super::guard::require_superuser;
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(list::handler).post(create::handler))
        .route(
            "/:collection",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .route("/:collection/rename", post(rename::handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_superuser,
        ))
        .with_state(state)
}

use axum::middleware;
use axum::routing::get;
use axum::Router;

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use create::CreateResponse;
pub use delete::DeleteResponse;
pub use list::ListResponse;
pub use update::UpdateResponse;

use super::guard::require_superuser;
use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/:collection", get(list::handler).post(create::handler))
        .route(
            "/:collection/:id",
            get(get::handler)
                .patch(update::handler)
                .delete(delete::handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_superuser,
        ))
        .with_state(state)
}

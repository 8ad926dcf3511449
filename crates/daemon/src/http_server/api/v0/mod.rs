use axum::Router;

use common::prelude::Realm;

pub mod auth;
pub mod collections;
mod guard;
pub mod records;

pub use guard::{client_key, Authorization};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/collections", collections::router(state.clone()))
        .nest("/collection", records::router(state.clone()))
        .nest("/admin", auth::router(Realm::Superuser, state.clone()))
        .nest("/customer", auth::router(Realm::Customer, state.clone()))
        .with_state(state)
}

use axum::routing::post;
use axum::{Extension, Router};

use common::prelude::Realm;

pub mod check;
pub mod invite;
pub mod login;
pub mod register;

pub use check::{CheckRequest, CheckResponse};
pub use invite::InviteResponse;
pub use login::{LoginRequest, LoginResponse};
pub use register::{RegisterRequest, RegisterResponse};

use crate::ServiceState;

/// Login, check and register for one realm. Invites are only minted under
/// the superuser realm.
pub fn router(realm: Realm, state: ServiceState) -> Router<ServiceState> {
    let router = Router::new()
        .route("/login", post(login::handler))
        .route("/check", post(check::handler))
        .route("/register", post(register::handler));

    let router = match realm {
        Realm::Superuser => router.route("/invite", post(invite::handler)),
        Realm::Customer => router,
    };

    router.layer(Extension(realm)).with_state(state)
}

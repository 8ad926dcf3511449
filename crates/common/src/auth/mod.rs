//! Credential subsystem
//!
//! Two user classes ([`Realm`]s) share the same machinery:
//!
//! - an [`IdentityStore`] file mapping handle to `{identity, password, name}`
//!   with bcrypt password hashes
//! - a [`TokenLedger`] file mapping handle to the bcrypt hashes of its last
//!   five issued tokens
//! - a process-wide [`RateLimiter`] in front of every login attempt
//!
//! A [`CredentialService`] runs login and token checks for one realm.
//! [`Credentials`] bundles both realms with the [`RegistrationGate`] that
//! decides who may register.
//!
//! Plaintext passwords and tokens only ever exist in memory for the
//! duration of a call; neither is written to disk nor logged.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::fs::FsError;

mod credential;
mod identity;
mod invite;
mod ledger;
mod rate_limit;
mod token;

pub use credential::CredentialService;
pub use identity::{Identities, Identity, IdentityStore};
pub use invite::{InviteCode, RegistrationGate};
pub use ledger::{TokenHistories, TokenLedger, TOKEN_HISTORY_LIMIT};
pub use rate_limit::{RateLimitConfig, RateLimiter};
pub use token::IssuedToken;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("too many login attempts, retry in {}s", retry_after.as_secs().max(1))]
    RateLimited { retry_after: Duration },
    #[error("identity already exists: {0}")]
    IdentityExists(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("identity file does not exist")]
    MissingIdentityFile,
    #[error("credential storage unavailable: {0}")]
    Storage(#[from] FsError),
    #[error("hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("random source failed: {0}")]
    Random(#[from] getrandom::Error),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Unauthorized => ErrorKind::Unauthorized,
            AuthError::RateLimited { .. } => ErrorKind::RateLimited,
            AuthError::IdentityExists(_) => ErrorKind::AlreadyExists,
            AuthError::InvalidRequest(_) => ErrorKind::InvalidFormat,
            AuthError::MissingIdentityFile | AuthError::Storage(_) => {
                ErrorKind::StorageUnavailable
            }
            AuthError::Hash(_) | AuthError::Random(_) => ErrorKind::Internal,
        }
    }
}

/// User class an identity belongs to. Each realm has its own identity file
/// and token ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Realm {
    Superuser,
    Customer,
}

impl Realm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Realm::Superuser => "superuser",
            Realm::Customer => "customer",
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Both realms plus the gate guarding registration.
#[derive(Debug)]
pub struct Credentials {
    superusers: CredentialService,
    customers: CredentialService,
    gate: RegistrationGate,
    // serializes gate admission with the identity insert it authorizes
    registration: Mutex<()>,
}

impl Credentials {
    pub fn new(
        superusers: CredentialService,
        customers: CredentialService,
        gate: RegistrationGate,
    ) -> Self {
        Self {
            superusers,
            customers,
            gate,
            registration: Mutex::new(()),
        }
    }

    pub fn realm(&self, realm: Realm) -> &CredentialService {
        match realm {
            Realm::Superuser => &self.superusers,
            Realm::Customer => &self.customers,
        }
    }

    pub fn superusers(&self) -> &CredentialService {
        &self.superusers
    }

    pub fn customers(&self) -> &CredentialService {
        &self.customers
    }

    pub fn gate(&self) -> &RegistrationGate {
        &self.gate
    }

    /// The limiter shared by both realms.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        self.superusers.limiter()
    }

    /// Register a new identity in `realm`, admitted by `code`.
    ///
    /// `code` must be a live invite, or the configured bootstrap secret while
    /// no superuser exists yet (superuser realm only). An invite is consumed
    /// only once the identity has been stored.
    pub fn register(
        &self,
        realm: Realm,
        code: &str,
        handle: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        let _registration = self.registration.lock();

        let allow_bootstrap =
            realm == Realm::Superuser && self.superusers.identities().is_empty()?;
        let admission = self.gate.admit(code, allow_bootstrap)?;

        let identity = self.realm(realm).register(handle, display_name, password)?;
        self.gate.consume(admission);

        Ok(identity)
    }

    /// Mint a one-time invite on behalf of an authenticated superuser.
    pub fn issue_invite(&self, handle: &str, token: &str) -> Result<InviteCode, AuthError> {
        self.superusers.check(handle, token)?;
        let invite = self.gate.issue_invite()?;
        tracing::info!(issuer = handle, "invite issued");
        Ok(invite)
    }
}

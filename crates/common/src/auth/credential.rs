use std::sync::Arc;

use super::identity::{Identity, IdentityStore};
use super::ledger::TokenLedger;
use super::rate_limit::RateLimiter;
use super::token::{generate_secret, hash_secret, verify_secret, IssuedToken};
use super::{AuthError, Realm};

/// Login, token checks and registration for a single realm.
#[derive(Debug)]
pub struct CredentialService {
    realm: Realm,
    identities: IdentityStore,
    ledger: TokenLedger,
    limiter: Arc<RateLimiter>,
    hash_cost: u32,
    // verified against when the handle is unknown, so both failures cost the same
    decoy_hash: String,
}

impl CredentialService {
    pub fn new(
        realm: Realm,
        identities: IdentityStore,
        ledger: TokenLedger,
        limiter: Arc<RateLimiter>,
        hash_cost: u32,
    ) -> Result<Self, AuthError> {
        let decoy_hash = hash_secret(&generate_secret()?, hash_cost)?;
        Ok(Self {
            realm,
            identities,
            ledger,
            limiter,
            hash_cost,
            decoy_hash,
        })
    }

    pub fn realm(&self) -> Realm {
        self.realm
    }

    pub fn identities(&self) -> &IdentityStore {
        &self.identities
    }

    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Hash `password` and store a new identity under `handle`.
    pub fn register(
        &self,
        handle: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        if handle.is_empty() {
            return Err(AuthError::InvalidRequest("identity must not be empty".into()));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidRequest("password must not be empty".into()));
        }

        let identity = Identity {
            handle: handle.to_string(),
            password_hash: hash_secret(password, self.hash_cost)?,
            display_name: display_name.to_string(),
        };
        self.identities.insert(identity.clone())?;
        tracing::info!(realm = %self.realm, identity = handle, "registered");
        Ok(identity)
    }

    /// Verify a password without issuing a token.
    ///
    /// Unknown handles and wrong passwords both yield
    /// [`AuthError::Unauthorized`].
    pub fn authenticate(&self, handle: &str, password: &str) -> Result<Identity, AuthError> {
        let identity = self.identities.load()?.remove(handle);

        match identity {
            Some(identity) if verify_secret(password, &identity.password_hash) => Ok(identity),
            Some(_) => Err(AuthError::Unauthorized),
            None => {
                let _ = verify_secret(password, &self.decoy_hash);
                Err(AuthError::Unauthorized)
            }
        }
    }

    /// Rate-gated login. On success a fresh token is returned once and its
    /// hash is appended to the identity's history.
    pub fn login(
        &self,
        client: &str,
        handle: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        if let Err(retry_after) = self.limiter.check(client) {
            tracing::warn!(realm = %self.realm, client, "login rate limited");
            return Err(AuthError::RateLimited { retry_after });
        }

        let identity = match self.authenticate(handle, password) {
            Ok(identity) => identity,
            Err(AuthError::Unauthorized) => {
                tracing::warn!(realm = %self.realm, client, identity = handle, "login rejected");
                return Err(AuthError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        let token = generate_secret()?;
        self.ledger
            .append(&identity.handle, hash_secret(&token, self.hash_cost)?)?;
        tracing::info!(realm = %self.realm, identity = handle, "token issued");

        Ok(IssuedToken {
            identity: identity.handle,
            name: identity.display_name,
            token,
        })
    }

    /// Accept `token` if it matches any hash in `handle`'s history.
    pub fn check(&self, handle: &str, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let history = self.ledger.history(handle)?;
        if history.iter().any(|hash| verify_secret(token, hash)) {
            Ok(())
        } else {
            tracing::debug!(realm = %self.realm, identity = handle, "token check failed");
            Err(AuthError::Unauthorized)
        }
    }
}

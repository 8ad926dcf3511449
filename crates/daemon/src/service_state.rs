use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use common::prelude::*;

use crate::state::{
    AuthConfig, CUSTOMERS_FILE_NAME, CUSTOMER_TOKENS_FILE_NAME, SUPERUSERS_FILE_NAME,
    SUPERUSER_TOKENS_FILE_NAME,
};
use crate::ServiceConfig;

/// Shared handles behind every request. Cheap to clone.
#[derive(Debug, Clone)]
pub struct State {
    store: Arc<DocumentStore>,
    credentials: Arc<Credentials>,
    protect_documents: bool,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let database_path = config.database_path.clone();
        let auth_path = config.auth_path.clone();
        let auth = config.auth.clone();

        // bcrypt runs while building the credential services
        tokio::task::spawn_blocking(move || Self::open(&database_path, &auth_path, &auth))
            .await
            .map_err(|e| StateSetupError::Worker(e.to_string()))?
    }

    /// Open the document store and both credential realms.
    pub fn open(
        database_path: &Path,
        auth_path: &Path,
        auth: &AuthConfig,
    ) -> Result<Self, StateSetupError> {
        if auth.login_burst == 0 || auth.login_interval_secs == 0 {
            return Err(StateSetupError::InvalidConfig(
                "login_burst and login_interval_secs must be positive".into(),
            ));
        }

        let store = DocumentStore::open(database_path)?;
        tracing::info!(root = %store.root().display(), "document store ready");

        let limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(
            auth.login_burst,
            Duration::from_secs(auth.login_interval_secs),
        )));

        let superusers = CredentialService::new(
            Realm::Superuser,
            IdentityStore::new(auth_path.join(SUPERUSERS_FILE_NAME)),
            TokenLedger::new(auth_path.join(SUPERUSER_TOKENS_FILE_NAME)),
            limiter.clone(),
            auth.hash_cost,
        )?;
        let customers = CredentialService::new(
            Realm::Customer,
            IdentityStore::new(auth_path.join(CUSTOMERS_FILE_NAME)),
            TokenLedger::new(auth_path.join(CUSTOMER_TOKENS_FILE_NAME)),
            limiter,
            auth.hash_cost,
        )?;
        let gate = RegistrationGate::new(
            auth.bootstrap_token.as_deref(),
            Duration::from_secs(auth.invite_ttl_secs),
        );
        if auth.bootstrap_token.is_some() {
            tracing::info!("bootstrap token configured for the first superuser");
        }

        Ok(Self {
            store: Arc::new(store),
            credentials: Arc::new(Credentials::new(superusers, customers, gate)),
            protect_documents: auth.protect_documents,
        })
    }

    pub fn store(&self) -> &Arc<DocumentStore> {
        &self.store
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    /// Whether document routes require a superuser bearer token.
    pub fn protect_documents(&self) -> bool {
        self.protect_documents
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("document store: {0}")]
    Store(#[from] StoreError),
    #[error("credentials: {0}")]
    Auth(#[from] AuthError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("setup task failed: {0}")]
    Worker(String),
}

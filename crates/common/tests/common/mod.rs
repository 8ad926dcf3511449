//! Shared test utilities for store and credential integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use common::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// bcrypt's minimum cost, to keep hashing fast
pub const TEST_HASH_COST: u32 = 4;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Set up a document store rooted in a fresh temp dir
pub fn setup_store() -> (DocumentStore, TempDir) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let store = DocumentStore::open(temp_dir.path().join("database")).unwrap();
    (store, temp_dir)
}

/// Set up both realms sharing one limiter, laid out the way the daemon
/// lays out its config directory
pub fn setup_credentials(burst: u32, bootstrap: Option<&str>) -> (Credentials, TempDir) {
    init_tracing();
    let temp_dir = TempDir::new().unwrap();
    let auth = temp_dir.path().join("auth");
    let limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(
        burst,
        Duration::from_secs(60),
    )));

    let superusers = CredentialService::new(
        Realm::Superuser,
        IdentityStore::new(auth.join("superusers.json")),
        TokenLedger::new(auth.join("token.json")),
        limiter.clone(),
        TEST_HASH_COST,
    )
    .unwrap();
    let customers = CredentialService::new(
        Realm::Customer,
        IdentityStore::new(auth.join("customers.json")),
        TokenLedger::new(auth.join("customer_tokens.json")),
        limiter,
        TEST_HASH_COST,
    )
    .unwrap();
    let gate = RegistrationGate::new(bootstrap, Duration::from_secs(3600));

    (Credentials::new(superusers, customers, gate), temp_dir)
}

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

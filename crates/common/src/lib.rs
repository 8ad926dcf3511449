/**
 * Credential subsystem.
 *  - Identity store and token ledger files
 *  - Per-client login rate limiting
 *  - Token issuance, rotation and verification
 */
pub mod auth;
/**
 * Stable error kinds shared by the store
 *  and the credential subsystem, so callers
 *  can map failures without matching on
 *  every module's error type.
 */
pub mod error;
/**
 * Whole-file JSON persistence helpers.
 *  Writes go through a temp file and a rename
 *  so readers never observe a torn file.
 */
pub mod fs;
/**
 * Filesystem-backed document store.
 *  Collections are directories, records
 *  are JSON files inside them.
 */
pub mod store;
pub mod version;

pub mod prelude {
    pub use crate::auth::{
        AuthError, CredentialService, Credentials, IdentityStore, InviteCode, IssuedToken, Realm,
        RateLimitConfig, RateLimiter, RegistrationGate, TokenLedger,
    };
    pub use crate::error::ErrorKind;
    pub use crate::store::{CollectionInfo, Document, DocumentStore, Record, StoreError};
    pub use crate::version::BuildInfo;
}

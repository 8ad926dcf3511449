use std::fmt;

use serde::Serialize;

use super::AuthError;

/// Random bytes behind every issued token (hex encoded on the wire).
pub const TOKEN_BYTES: usize = 32;

/// A freshly issued bearer token. The plaintext only lives in this value;
/// the ledger keeps its hash.
#[derive(Clone, Serialize)]
pub struct IssuedToken {
    pub identity: String,
    pub name: String,
    pub token: String,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("identity", &self.identity)
            .field("name", &self.name)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Generate an opaque secret from the OS random source.
pub(crate) fn generate_secret() -> Result<String, AuthError> {
    let mut buff = [0u8; TOKEN_BYTES];
    getrandom::getrandom(&mut buff)?;
    Ok(hex::encode(buff))
}

/// Salted, irreversible hash of a password or token.
pub(crate) fn hash_secret(secret: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(secret, cost)?)
}

/// Check `secret` against a stored hash. A malformed hash never matches.
pub(crate) fn verify_secret(secret: &str, hash: &str) -> bool {
    match bcrypt::verify(secret, hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!("stored hash could not be verified: {}", e);
            false
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable failure category carried by every store and credential error.
///
/// The HTTP layer maps these to status codes; the string form is what
/// clients see in the `error` field of a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad credentials or token
    Unauthorized,
    /// Login attempt throttled
    RateLimited,
    /// Missing identity, collection or record
    NotFound,
    /// Naming collision
    AlreadyExists,
    /// Malformed stored or supplied JSON
    InvalidFormat,
    /// Identifier that cannot name a file or directory
    InvalidName,
    /// I/O failure against the backing files
    StorageUnavailable,
    /// Anything else that is not the caller's fault
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::NotFound => "not_found",
            ErrorKind::AlreadyExists => "already_exists",
            ErrorKind::InvalidFormat => "invalid_format",
            ErrorKind::InvalidName => "invalid_name",
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

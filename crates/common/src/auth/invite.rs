//! Who may register.
//!
//! Registration is admitted by a code supplied with the request. A code is
//! either a one-time invite minted for an authenticated superuser, or the
//! operator-configured bootstrap secret. The bootstrap secret only admits
//! while no superuser exists, so it cannot be used once the first one has
//! registered.
//!
//! Only SHA-256 digests of codes are kept, in memory; invites do not survive
//! a restart.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::token::generate_secret;
use super::AuthError;

type CodeDigest = [u8; 32];

fn digest(code: &str) -> CodeDigest {
    Sha256::digest(code.as_bytes()).into()
}

/// A newly minted invite, shown once to the issuing superuser.
#[derive(Clone, Serialize)]
pub struct InviteCode {
    pub code: String,
    pub expires_in_secs: u64,
}

impl fmt::Debug for InviteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InviteCode")
            .field("code", &"<redacted>")
            .field("expires_in_secs", &self.expires_in_secs)
            .finish()
    }
}

/// Proof that a code was accepted. Hand it back to
/// [`RegistrationGate::consume`] once the registration has succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Admission {
    Invite(CodeDigest),
    Bootstrap,
}

pub struct RegistrationGate {
    bootstrap: Option<CodeDigest>,
    invite_ttl: Duration,
    invites: Mutex<HashMap<CodeDigest, Instant>>,
}

impl fmt::Debug for RegistrationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationGate")
            .field("has_bootstrap", &self.bootstrap.is_some())
            .field("invite_ttl", &self.invite_ttl)
            .finish_non_exhaustive()
    }
}

impl RegistrationGate {
    /// An empty bootstrap secret is treated as none.
    pub fn new(bootstrap: Option<&str>, invite_ttl: Duration) -> Self {
        Self {
            bootstrap: bootstrap.filter(|s| !s.is_empty()).map(digest),
            invite_ttl,
            invites: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue_invite(&self) -> Result<InviteCode, AuthError> {
        self.issue_invite_at(Instant::now())
    }

    pub fn issue_invite_at(&self, now: Instant) -> Result<InviteCode, AuthError> {
        let code = generate_secret()?;
        let mut invites = self.invites.lock();
        invites.retain(|_, expires| *expires > now);
        invites.insert(digest(&code), now + self.invite_ttl);

        Ok(InviteCode {
            code,
            expires_in_secs: self.invite_ttl.as_secs(),
        })
    }

    /// Invites issued and not yet used or expired.
    pub fn pending(&self) -> usize {
        let now = Instant::now();
        self.invites
            .lock()
            .values()
            .filter(|expires| **expires > now)
            .count()
    }

    pub(crate) fn admit(&self, code: &str, allow_bootstrap: bool) -> Result<Admission, AuthError> {
        self.admit_at(code, allow_bootstrap, Instant::now())
    }

    pub(crate) fn admit_at(
        &self,
        code: &str,
        allow_bootstrap: bool,
        now: Instant,
    ) -> Result<Admission, AuthError> {
        if code.is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let presented = digest(code);

        if let Some(expires) = self.invites.lock().get(&presented) {
            if *expires > now {
                return Ok(Admission::Invite(presented));
            }
        }
        if allow_bootstrap && self.bootstrap == Some(presented) {
            return Ok(Admission::Bootstrap);
        }

        tracing::warn!("registration rejected: invalid or expired code");
        Err(AuthError::Unauthorized)
    }

    /// Retire an invite after it admitted a registration.
    pub(crate) fn consume(&self, admission: Admission) {
        match admission {
            Admission::Invite(code) => {
                self.invites.lock().remove(&code);
            }
            Admission::Bootstrap => {
                tracing::info!("bootstrap secret used to register the first superuser");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_is_single_use() {
        let gate = RegistrationGate::new(None, Duration::from_secs(60));
        let invite = gate.issue_invite().unwrap();
        assert_eq!(gate.pending(), 1);

        let admission = gate.admit(&invite.code, false).unwrap();
        gate.consume(admission);

        assert!(matches!(
            gate.admit(&invite.code, false),
            Err(AuthError::Unauthorized)
        ));
        assert_eq!(gate.pending(), 0);
    }

    #[test]
    fn test_admission_without_consume_keeps_invite() {
        let gate = RegistrationGate::new(None, Duration::from_secs(60));
        let invite = gate.issue_invite().unwrap();
        gate.admit(&invite.code, false).unwrap();
        gate.admit(&invite.code, false).unwrap();
    }

    #[test]
    fn test_invite_expires() {
        let gate = RegistrationGate::new(None, Duration::from_secs(60));
        let t0 = Instant::now();
        let invite = gate.issue_invite_at(t0).unwrap();

        assert!(gate.admit_at(&invite.code, false, t0).is_ok());
        assert!(gate
            .admit_at(&invite.code, false, t0 + Duration::from_secs(61))
            .is_err());
    }

    #[test]
    fn test_bootstrap_only_when_allowed() {
        let gate = RegistrationGate::new(Some("let-me-in"), Duration::from_secs(60));

        assert_eq!(
            gate.admit("let-me-in", true).unwrap(),
            Admission::Bootstrap
        );
        assert!(matches!(
            gate.admit("let-me-in", false),
            Err(AuthError::Unauthorized)
        ));
        assert!(gate.admit("wrong", true).is_err());
    }

    #[test]
    fn test_empty_codes_never_admit() {
        let gate = RegistrationGate::new(Some(""), Duration::from_secs(60));
        assert!(gate.admit("", true).is_err());
    }

    #[test]
    fn test_debug_hides_code() {
        let gate = RegistrationGate::new(None, Duration::from_secs(60));
        let invite = gate.issue_invite().unwrap();
        assert!(!format!("{invite:?}").contains(&invite.code));
    }
}

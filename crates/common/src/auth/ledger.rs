use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::AuthError;
use crate::fs::{read_json, write_json_atomic, FsError};

/// Most token hashes kept per identity; older ones are evicted first.
pub const TOKEN_HISTORY_LIMIT: usize = 5;

/// handle -> token hashes, oldest first
pub type TokenHistories = BTreeMap<String, Vec<String>>;

/// Per-identity history of issued token hashes, persisted as one JSON file.
///
/// Entries are keyed by handle only; removing an identity does not touch
/// its history here.
#[derive(Debug)]
pub struct TokenLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TokenLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every history, each cut to its newest [`TOKEN_HISTORY_LIMIT`]
    /// entries. An absent ledger file reads as empty.
    pub fn all(&self) -> Result<TokenHistories, AuthError> {
        let mut histories: TokenHistories = read_json(&self.path)?.unwrap_or_default();
        cap_histories(&mut histories);
        Ok(histories)
    }

    pub fn history(&self, handle: &str) -> Result<Vec<String>, AuthError> {
        Ok(self.all()?.remove(handle).unwrap_or_default())
    }

    /// Atomically replace the whole ledger. Histories longer than
    /// [`TOKEN_HISTORY_LIMIT`] keep only their newest entries.
    pub fn persist(&self, histories: &TokenHistories) -> Result<(), AuthError> {
        let mut histories = histories.clone();
        cap_histories(&mut histories);

        let _guard = self.lock.lock();
        self.write(&histories)
    }

    /// Record a newly issued token hash for `handle`, evicting the oldest
    /// entries so the history never exceeds [`TOKEN_HISTORY_LIMIT`].
    ///
    /// The read-modify-write runs under the ledger lock, and the file is
    /// either fully replaced or left untouched.
    pub fn append(&self, handle: &str, hash: String) -> Result<(), AuthError> {
        let _guard = self.lock.lock();

        let mut histories = self.all()?;
        let history = histories.entry(handle.to_string()).or_default();
        while history.len() >= TOKEN_HISTORY_LIMIT {
            history.remove(0);
        }
        history.push(hash);
        let len = history.len();

        self.write(&histories)?;
        tracing::debug!(identity = handle, history = len, "token hash appended");
        Ok(())
    }

    fn write(&self, histories: &TokenHistories) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(FsError::from)?;
        }
        write_json_atomic(&self.path, histories)?;
        Ok(())
    }
}

/// Drop the oldest hashes of every history over the limit.
fn cap_histories(histories: &mut TokenHistories) {
    for history in histories.values_mut() {
        let excess = history.len().saturating_sub(TOKEN_HISTORY_LIMIT);
        history.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = TokenLedger::new(dir.path().join("token.json"));
        assert!(ledger.all().unwrap().is_empty());
        assert!(ledger.history("alice").unwrap().is_empty());
    }

    #[test]
    fn test_fifo_eviction() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = TokenLedger::new(dir.path().join("token.json"));

        for i in 0..8 {
            ledger.append("alice", format!("h{i}")).unwrap();
            assert!(ledger.history("alice").unwrap().len() <= TOKEN_HISTORY_LIMIT);
        }
        assert_eq!(
            ledger.history("alice").unwrap(),
            vec!["h3", "h4", "h5", "h6", "h7"]
        );
    }

    #[test]
    fn test_histories_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = TokenLedger::new(dir.path().join("token.json"));
        ledger.append("alice", "a1".into()).unwrap();
        ledger.append("bob", "b1".into()).unwrap();
        ledger.append("alice", "a2".into()).unwrap();

        let all = ledger.all().unwrap();
        assert_eq!(all["alice"], vec!["a1", "a2"]);
        assert_eq!(all["bob"], vec!["b1"]);
    }

    #[test]
    fn test_persist_caps_histories() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = TokenLedger::new(dir.path().join("token.json"));
        let mut histories = TokenHistories::new();
        histories.insert("alice".into(), (0..7).map(|i| format!("h{i}")).collect());
        histories.insert("bob".into(), vec!["b0".into()]);
        ledger.persist(&histories).unwrap();

        assert_eq!(
            ledger.history("alice").unwrap(),
            vec!["h2", "h3", "h4", "h5", "h6"]
        );
        assert_eq!(ledger.history("bob").unwrap(), vec!["b0"]);

        // the file itself never holds more than the limit
        let raw: TokenHistories =
            serde_json::from_slice(&std::fs::read(ledger.path()).unwrap()).unwrap();
        assert_eq!(raw["alice"].len(), TOKEN_HISTORY_LIMIT);
    }

    #[test]
    fn test_overlong_file_reads_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(
            &path,
            br#"{"alice": ["old0", "old1", "old2", "old3", "old4", "old5", "old6"]}"#,
        )
        .unwrap();
        let ledger = TokenLedger::new(&path);

        assert_eq!(
            ledger.history("alice").unwrap(),
            vec!["old2", "old3", "old4", "old5", "old6"]
        );

        ledger.append("alice", "new".into()).unwrap();
        assert_eq!(
            ledger.history("alice").unwrap(),
            vec!["old3", "old4", "old5", "old6", "new"]
        );
    }

    #[test]
    fn test_corrupt_ledger_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        std::fs::write(&path, b"{broken").unwrap();
        let ledger = TokenLedger::new(&path);

        assert!(matches!(
            ledger.append("alice", "h".into()),
            Err(AuthError::Storage(_))
        ));
        assert_eq!(std::fs::read(&path).unwrap(), b"{broken");
    }
}

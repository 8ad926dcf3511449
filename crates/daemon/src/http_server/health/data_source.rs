use std::fmt::Debug;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::ServiceState;

#[async_trait]
pub trait DataSource {
    /// Perform various checks on the system to ensure its healthy and ready to accept requests.
    async fn is_ready(&self) -> Result<(), DataSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("one or more dependent services aren't available")]
    DependencyFailure,

    #[allow(dead_code)]
    #[error("service has received signal indicating it should shutdown")]
    ShuttingDown,
}

pub type DynDataSource = Arc<dyn DataSource + Send + Sync>;

pub struct StateDataSource(DynDataSource);

impl Debug for StateDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateDataSource").finish()
    }
}

impl StateDataSource {
    #[cfg(test)]
    pub fn new(dds: DynDataSource) -> Self {
        Self(dds)
    }
}

impl Deref for StateDataSource {
    type Target = DynDataSource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Ready while the storage root and the credential directory are reachable.
struct StorageSource {
    database_path: PathBuf,
    auth_path: Option<PathBuf>,
}

#[async_trait]
impl DataSource for StorageSource {
    async fn is_ready(&self) -> Result<(), DataSourceError> {
        let dirs = std::iter::once(&self.database_path).chain(self.auth_path.as_ref());
        for dir in dirs {
            match tokio::fs::metadata(dir).await {
                Ok(meta) if meta.is_dir() => {}
                _ => {
                    tracing::warn!(path = %dir.display(), "storage directory unavailable");
                    return Err(DataSourceError::DependencyFailure);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for StateDataSource {
    type Rejection = ();

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let auth_path = state
            .credentials()
            .superusers()
            .identities()
            .path()
            .parent()
            .map(PathBuf::from);

        Ok(StateDataSource(Arc::new(StorageSource {
            database_path: state.store().root().to_path_buf(),
            auth_path,
        })))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Clone)]
    pub(crate) enum MockReadiness {
        DependencyFailure,
        Ready,
        ShuttingDown,
    }

    #[async_trait]
    impl DataSource for MockReadiness {
        async fn is_ready(&self) -> Result<(), DataSourceError> {
            use MockReadiness::*;

            match self {
                DependencyFailure => Err(DataSourceError::DependencyFailure),
                Ready => Ok(()),
                ShuttingDown => Err(DataSourceError::ShuttingDown),
            }
        }
    }

    #[tokio::test]
    async fn test_storage_source() {
        let temp = tempfile::tempdir().unwrap();
        let ready = StorageSource {
            database_path: temp.path().to_path_buf(),
            auth_path: None,
        };
        assert!(ready.is_ready().await.is_ok());

        let missing = StorageSource {
            database_path: temp.path().to_path_buf(),
            auth_path: Some(temp.path().join("auth")),
        };
        assert!(matches!(
            missing.is_ready().await,
            Err(DataSourceError::DependencyFailure)
        ));
    }
}

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "shelf";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATABASE_DIR_NAME: &str = "database";
pub const AUTH_DIR_NAME: &str = "auth";
pub const SUPERUSERS_FILE_NAME: &str = "superusers.json";
pub const SUPERUSER_TOKENS_FILE_NAME: &str = "token.json";
pub const CUSTOMERS_FILE_NAME: &str = "customers.json";
pub const CUSTOMER_TOKENS_FILE_NAME: &str = "customer_tokens.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API HTTP server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_api_port() -> u16 {
    5001
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            auth: AuthConfig::default(),
        }
    }
}

/// The `[auth]` table of config.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret that admits the first superuser registration.
    ///  Ignored once any superuser exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_token: Option<String>,
    /// bcrypt cost for passwords and tokens
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
    /// Login attempts a client may make back to back
    #[serde(default = "default_login_burst")]
    pub login_burst: u32,
    /// Seconds to regain a single login attempt
    #[serde(default = "default_login_interval_secs")]
    pub login_interval_secs: u64,
    /// Lifetime of an invite code
    #[serde(default = "default_invite_ttl_secs")]
    pub invite_ttl_secs: u64,
    /// Require a superuser bearer token on collection and record routes
    #[serde(default)]
    pub protect_documents: bool,
}

fn default_hash_cost() -> u32 {
    10
}

fn default_login_burst() -> u32 {
    3
}

fn default_login_interval_secs() -> u64 {
    60
}

fn default_invite_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            bootstrap_token: None,
            hash_cost: default_hash_cost(),
            login_burst: default_login_burst(),
            login_interval_secs: default_login_interval_secs(),
            invite_ttl_secs: default_invite_ttl_secs(),
            protect_documents: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the shelf directory (~/.shelf)
    pub shelf_dir: PathBuf,
    /// Storage root for collections
    pub database_path: PathBuf,
    /// Directory holding identity files and token ledgers
    pub auth_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the shelf directory path (custom or default ~/.shelf)
    pub fn shelf_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new shelf directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let shelf_dir = Self::shelf_dir(custom_path)?;

        if shelf_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&shelf_dir)?;

        let database_path = shelf_dir.join(DATABASE_DIR_NAME);
        fs::create_dir_all(&database_path)?;
        let auth_path = shelf_dir.join(AUTH_DIR_NAME);
        fs::create_dir_all(&auth_path)?;

        let config = config.unwrap_or_default();
        let config_path = shelf_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            shelf_dir,
            database_path,
            auth_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the shelf directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let shelf_dir = Self::shelf_dir(custom_path)?;

        if !shelf_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let database_path = shelf_dir.join(DATABASE_DIR_NAME);
        let auth_path = shelf_dir.join(AUTH_DIR_NAME);
        let config_path = shelf_dir.join(CONFIG_FILE_NAME);

        if !database_path.exists() {
            return Err(StateError::MissingFile(format!("{}/", DATABASE_DIR_NAME)));
        }
        if !auth_path.exists() {
            return Err(StateError::MissingFile(format!("{}/", AUTH_DIR_NAME)));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            shelf_dir,
            database_path,
            auth_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("shelf directory not initialized. Run 'shelf init' first")]
    NotInitialized,

    #[error("shelf directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("shelf");

        let state = AppState::init(Some(dir.clone()), None).unwrap();
        assert!(state.database_path.is_dir());
        assert!(state.auth_path.is_dir());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config.api_port, 5001);
        assert_eq!(loaded.config.auth.login_burst, 3);
        assert!(!loaded.config.auth.protect_documents);

        assert!(matches!(
            AppState::init(Some(dir), None),
            Err(StateError::AlreadyInitialized)
        ));
    }

    #[test]
    fn test_load_uninitialized() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            AppState::load(Some(temp.path().join("missing"))),
            Err(StateError::NotInitialized)
        ));
    }

    #[test]
    fn test_partial_auth_table_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
api_port = 7000

[auth]
bootstrap_token = "first-run"
protect_documents = true
"#,
        )
        .unwrap();
        assert_eq!(config.api_port, 7000);
        assert_eq!(config.auth.bootstrap_token.as_deref(), Some("first-run"));
        assert_eq!(config.auth.hash_cost, 10);
        assert_eq!(config.auth.invite_ttl_secs, 86400);
        assert!(config.auth.protect_documents);
    }
}

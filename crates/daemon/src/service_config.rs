use std::path::PathBuf;

use crate::state::AuthConfig;

#[derive(Debug, Clone)]
pub struct Config {
    // storage configuration
    /// Storage root holding one directory per collection
    pub database_path: PathBuf,
    /// Directory holding identity files and token ledgers
    pub auth_path: PathBuf,
    /// Credential settings from the `[auth]` table
    pub auth: AuthConfig,

    // http server configuration
    /// Port for the API HTTP server
    pub api_port: u16,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

use clap::Args;

use shelf_daemon::state::{AppConfig, AppState, AuthConfig, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 5001)]
    pub api_port: u16,

    /// Secret that admits the first superuser registration
    #[arg(long)]
    pub bootstrap_token: Option<String>,

    /// Require a superuser bearer token on collection and record routes
    #[arg(long)]
    pub protect_documents: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            auth: AuthConfig {
                bootstrap_token: self.bootstrap_token.clone(),
                protect_documents: self.protect_documents,
                ..Default::default()
            },
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized shelf directory at: {}\n\
             - Database: {}\n\
             - Auth: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Bootstrap token: {}",
            state.shelf_dir.display(),
            state.database_path.display(),
            state.auth_path.display(),
            state.config_path.display(),
            state.config.api_port,
            if state.config.auth.bootstrap_token.is_some() {
                "set"
            } else {
                "not set (registration needs an invite)"
            }
        );

        Ok(output)
    }
}

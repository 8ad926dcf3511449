pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "shelf")]
#[command(about = "Filesystem-backed JSON document store")]
pub struct Args {
    /// Daemon URL (defaults to localhost on the configured api_port)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the shelf config directory (defaults to ~/.shelf)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Credentials sent as `Authorization: Bearer <handle>:<token>`
    #[arg(long, global = true)]
    pub auth: Option<String>,

    #[command(subcommand)]
    pub command: crate::Command,
}

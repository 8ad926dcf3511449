use clap::Args;

use shelf_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();

        // 1. Check config directory
        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:   {}", state.shelf_dir.display()));
                lines.push("  config.toml: OK".to_string());
                lines.push("  database/:   OK".to_string());
                lines.push("  auth/:       OK".to_string());
                lines.push(format!("  api_port:    {}", state.config.api_port));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check daemon liveness and readiness
        let base = ctx.client.base_url();
        let client = ctx.client.http_client();

        lines.push(String::new());
        lines.push(format!("Daemon ({}):", base));

        for probe in ["livez", "readyz"] {
            let url = format!(
                "{}/_status/{}",
                base.as_str().trim_end_matches('/'),
                probe
            );
            let line = match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => format!("  {}: OK", probe),
                Ok(resp) => format!("  {}: UNHEALTHY ({})", probe, resp.status()),
                Err(_) => format!("  {}: NOT REACHABLE", probe),
            };
            lines.push(line);
        }

        Ok(lines.join("\n"))
    }
}

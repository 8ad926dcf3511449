use clap::Args;

use shelf_daemon::http_server::api::client::ApiError;
use shelf_daemon::http_server::api::v0::auth::login::RealmLogin;
use shelf_daemon::http_server::api::v0::auth::LoginRequest;

#[derive(Args, Debug, Clone)]
pub struct Login {
    /// Identity handle
    #[arg(long)]
    pub identity: String,

    /// Password
    #[arg(long)]
    pub password: String,

    /// Log in as a customer instead of a superuser
    #[arg(long)]
    pub customer: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Login {
    type Error = LoginError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let request = RealmLogin {
            prefix: if self.customer { "customer" } else { "admin" },
            request: LoginRequest {
                identity: self.identity.clone(),
                password: self.password.clone(),
            },
        };

        let response = client.call(request).await?;
        Ok(format!(
            "Logged in as {}\n--auth {}:{}",
            response.user, response.user, response.token
        ))
    }
}

use shelf_daemon::http_server::api::client::ApiError;
use shelf_daemon::http_server::api::v0::collections::GetRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for GetRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;

        let config = serde_json::to_string_pretty(&response.config)
            .unwrap_or_else(|_| format!("{:?}", response.config));
        Ok(format!(
            "{} ({} records)\n{}",
            response.collection, response.count, config
        ))
    }
}

use shelf_daemon::http_server::api::client::ApiError;
use shelf_daemon::http_server::api::v0::collections::ListRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for ListRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;

        if response.collections.is_empty() {
            Ok("No collections found".to_string())
        } else {
            Ok(response.collections.join("\n"))
        }
    }
}

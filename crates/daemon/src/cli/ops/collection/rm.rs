use shelf_daemon::http_server::api::client::ApiError;
use shelf_daemon::http_server::api::v0::collections::DeleteRequest;

#[async_trait::async_trait]
impl crate::cli::op::Op for DeleteRequest {
    type Error = ApiError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(self.clone()).await?;
        Ok(format!("Deleted collection {}", response.collection))
    }
}

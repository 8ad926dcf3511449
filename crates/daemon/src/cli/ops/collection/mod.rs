use clap::{Args, Subcommand};

pub mod create;
pub mod get;
pub mod list;
pub mod rm;

use crate::cli::op::Op;
use shelf_daemon::http_server::api::v0::collections::{
    CreateRequest, DeleteRequest, GetRequest, ListRequest,
};

crate::command_enum! {
    (Create, CreateRequest),
    (List, ListRequest),
    (Get, GetRequest),
    (Rm, DeleteRequest),
}

pub type CollectionCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Collection {
    #[command(subcommand)]
    pub command: CollectionCommand,
}

#[async_trait::async_trait]
impl Op for Collection {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}

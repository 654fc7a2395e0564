use super::schema::InputSchema;
use super::{add_tool, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct TargetUserArgs {
    target_user_id: String,
}

async fn block_user(ctx: ToolContext, args: TargetUserArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().block(&me, &args.target_user_id).await
}

async fn mute_user(ctx: ToolContext, args: TargetUserArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().mute(&me, &args.target_user_id).await
}

async fn unblock_user(ctx: ToolContext, args: TargetUserArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().unblock(&me, &args.target_user_id).await
}

async fn unmute_user(ctx: ToolContext, args: TargetUserArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().unmute(&me, &args.target_user_id).await
}

pub(super) fn register_post(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "block_user",
        "Block a user",
        InputSchema::new().string("target_user_id", "The ID of the user to block"),
        block_user,
    )?;
    add_tool(
        sink,
        ctx,
        "mute_user",
        "Mute a user",
        InputSchema::new().string("target_user_id", "The ID of the user to mute"),
        mute_user,
    )
}

pub(super) fn register_delete(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "unblock_user",
        "Unblock a user",
        InputSchema::new().string("target_user_id", "The ID of the user to unblock"),
        unblock_user,
    )?;
    add_tool(
        sink,
        ctx,
        "unmute_user",
        "Unmute a user",
        InputSchema::new().string("target_user_id", "The ID of the user to unmute"),
        unmute_user,
    )
}

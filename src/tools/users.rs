use super::schema::InputSchema;
use super::{add_tool, NoArgs, Paging, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use serde::Deserialize;
use serde_json::Value;

const FOLLOW_PAGING: Paging = Paging::new(1, 1000, Some(100));

#[derive(Debug, Deserialize)]
struct TargetUserArgs {
    target_user_id: String,
}

#[derive(Debug, Deserialize)]
struct UserIdArgs {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct UserIdsArgs {
    user_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct UsernameArgs {
    username: String,
}

#[derive(Debug, Deserialize)]
struct UsernamesArgs {
    usernames: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ConnectionsArgs {
    user_id: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

async fn follow_user(ctx: ToolContext, args: TargetUserArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().follow(&me, &args.target_user_id).await
}

async fn unfollow_user(ctx: ToolContext, args: TargetUserArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().unfollow(&me, &args.target_user_id).await
}

async fn get_me(ctx: ToolContext, _args: NoArgs) -> Result<Value> {
    ctx.client().me().await
}

async fn get_user(ctx: ToolContext, args: UserIdArgs) -> Result<Value> {
    ctx.client().user(&args.user_id).await
}

async fn get_users(ctx: ToolContext, args: UserIdsArgs) -> Result<Value> {
    ctx.client().users(&args.user_ids).await
}

async fn get_user_by_username(ctx: ToolContext, args: UsernameArgs) -> Result<Value> {
    ctx.client().user_by_username(&args.username).await
}

async fn get_users_by_usernames(ctx: ToolContext, args: UsernamesArgs) -> Result<Value> {
    ctx.client().users_by_usernames(&args.usernames).await
}

async fn get_followers(ctx: ToolContext, args: ConnectionsArgs) -> Result<Value> {
    let page = FOLLOW_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().followers(&args.user_id, &page).await
}

async fn get_following(ctx: ToolContext, args: ConnectionsArgs) -> Result<Value> {
    let page = FOLLOW_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().following(&args.user_id, &page).await
}

pub(super) fn register_post(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "follow_user",
        "Follow a user",
        InputSchema::new().string("target_user_id", "The ID of the user to follow"),
        follow_user,
    )
}

pub(super) fn register_delete(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "unfollow_user",
        "Unfollow a user",
        InputSchema::new().string("target_user_id", "The ID of the user to unfollow"),
        unfollow_user,
    )
}

pub(super) fn register_get(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "get_me",
        "Get authenticated user information",
        InputSchema::new(),
        get_me,
    )?;
    add_tool(
        sink,
        ctx,
        "get_user",
        "Get user information by user ID",
        InputSchema::new().string("user_id", "The user ID"),
        get_user,
    )?;
    add_tool(
        sink,
        ctx,
        "get_users",
        "Get multiple users by user IDs",
        InputSchema::new().string_array("user_ids", "Array of user IDs"),
        get_users,
    )?;
    add_tool(
        sink,
        ctx,
        "get_user_by_username",
        "Get user information by username",
        InputSchema::new().string("username", "The username (without @)"),
        get_user_by_username,
    )?;
    add_tool(
        sink,
        ctx,
        "get_users_by_usernames",
        "Get multiple users by usernames",
        InputSchema::new().string_array("usernames", "Array of usernames (without @)"),
        get_users_by_usernames,
    )?;
    add_tool(
        sink,
        ctx,
        "get_followers",
        "Get followers of a user",
        FOLLOW_PAGING.fields(
            InputSchema::new().string("user_id", "The user ID"),
            "Maximum number of results (1-1000, default 100)",
            "Pagination token",
        ),
        get_followers,
    )?;
    add_tool(
        sink,
        ctx,
        "get_following",
        "Get users that a user follows",
        FOLLOW_PAGING.fields(
            InputSchema::new().string("user_id", "The user ID"),
            "Maximum number of results (1-1000, default 100)",
            "Pagination token",
        ),
        get_following,
    )
}

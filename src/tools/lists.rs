use super::schema::InputSchema;
use super::{add_tool, NoArgs, Paging, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const LIST_PAGING: Paging = Paging::new(1, 100, Some(20));
const PAGE_SIZE_HELP: &str = "Maximum number of results (1-100, default: 20)";
const TOKEN_HELP: &str = "Pagination token for next page of results";

#[derive(Debug, Deserialize)]
struct CreateListArgs {
    name: String,
    description: Option<String>,
    private: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct UpdateListArgs {
    list_id: String,
    name: Option<String>,
    description: Option<String>,
    private: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ListIdArgs {
    list_id: String,
}

#[derive(Debug, Deserialize)]
struct ListMemberArgs {
    list_id: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct ListPageArgs {
    list_id: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserListsArgs {
    user_id: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

/// Body with only the fields the caller set.
fn list_body(name: Option<String>, description: Option<String>, private: Option<bool>) -> Value {
    let mut body = Map::new();
    if let Some(name) = name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(description) = description {
        body.insert("description".to_string(), json!(description));
    }
    if let Some(private) = private {
        body.insert("private".to_string(), json!(private));
    }
    Value::Object(body)
}

async fn create_list(ctx: ToolContext, args: CreateListArgs) -> Result<Value> {
    let body = list_body(Some(args.name), args.description, args.private);
    ctx.client().create_list(body).await
}

async fn update_list(ctx: ToolContext, args: UpdateListArgs) -> Result<Value> {
    let body = list_body(args.name, args.description, args.private);
    ctx.client().update_list(&args.list_id, body).await
}

async fn add_list_member(ctx: ToolContext, args: ListMemberArgs) -> Result<Value> {
    ctx.client().add_list_member(&args.list_id, &args.user_id).await
}

async fn follow_list(ctx: ToolContext, args: ListIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().follow_list(&me, &args.list_id).await
}

async fn pin_list(ctx: ToolContext, args: ListIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().pin_list(&me, &args.list_id).await
}

async fn delete_list(ctx: ToolContext, args: ListIdArgs) -> Result<Value> {
    ctx.client().delete_list(&args.list_id).await
}

async fn remove_list_member(ctx: ToolContext, args: ListMemberArgs) -> Result<Value> {
    ctx.client()
        .remove_list_member(&args.list_id, &args.user_id)
        .await
}

async fn unfollow_list(ctx: ToolContext, args: ListIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().unfollow_list(&me, &args.list_id).await
}

async fn unpin_list(ctx: ToolContext, args: ListIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().unpin_list(&me, &args.list_id).await
}

async fn get_list(ctx: ToolContext, args: ListIdArgs) -> Result<Value> {
    ctx.client().list(&args.list_id).await
}

async fn get_list_tweets(ctx: ToolContext, args: ListPageArgs) -> Result<Value> {
    let page = LIST_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().list_tweets(&args.list_id, &page).await
}

async fn get_owned_lists(ctx: ToolContext, args: UserListsArgs) -> Result<Value> {
    let page = LIST_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().owned_lists(&args.user_id, &page).await
}

async fn get_list_members(ctx: ToolContext, args: ListPageArgs) -> Result<Value> {
    let page = LIST_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().list_members(&args.list_id, &page).await
}

async fn get_followed_lists(ctx: ToolContext, args: UserListsArgs) -> Result<Value> {
    let page = LIST_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().followed_lists(&args.user_id, &page).await
}

async fn get_pinned_lists(ctx: ToolContext, _args: NoArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().pinned_lists(&me).await
}

pub(super) fn register_post(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "create_list",
        "Create a new list",
        InputSchema::new()
            .string("name", "The name of the list")
            .optional_string("description", "The description of the list")
            .optional_bool("private", "Whether the list is private (default: false)"),
        create_list,
    )?;
    add_tool(
        sink,
        ctx,
        "update_list",
        "Update a list",
        InputSchema::new()
            .string("list_id", "The ID of the list")
            .optional_string("name", "The new name of the list")
            .optional_string("description", "The new description of the list")
            .optional_bool("private", "Whether the list should be private"),
        update_list,
    )?;
    add_tool(
        sink,
        ctx,
        "add_list_member",
        "Add a member to a list",
        InputSchema::new()
            .string("list_id", "The ID of the list")
            .string("user_id", "The ID of the user to add"),
        add_list_member,
    )?;
    add_tool(
        sink,
        ctx,
        "follow_list",
        "Follow a list",
        InputSchema::new().string("list_id", "The ID of the list to follow"),
        follow_list,
    )?;
    add_tool(
        sink,
        ctx,
        "pin_list",
        "Pin a list",
        InputSchema::new().string("list_id", "The ID of the list to pin"),
        pin_list,
    )
}

pub(super) fn register_delete(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "delete_list",
        "Delete a list",
        InputSchema::new().string("list_id", "The ID of the list to delete"),
        delete_list,
    )?;
    add_tool(
        sink,
        ctx,
        "remove_list_member",
        "Remove a member from a list",
        InputSchema::new()
            .string("list_id", "The ID of the list")
            .string("user_id", "The ID of the user to remove"),
        remove_list_member,
    )?;
    add_tool(
        sink,
        ctx,
        "unfollow_list",
        "Unfollow a list",
        InputSchema::new().string("list_id", "The ID of the list to unfollow"),
        unfollow_list,
    )?;
    add_tool(
        sink,
        ctx,
        "unpin_list",
        "Unpin a list",
        InputSchema::new().string("list_id", "The ID of the list to unpin"),
        unpin_list,
    )
}

pub(super) fn register_get(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "get_list",
        "Get information about a list",
        InputSchema::new().string("list_id", "The ID of the list"),
        get_list,
    )?;
    add_tool(
        sink,
        ctx,
        "get_list_tweets",
        "Get tweets from a list",
        LIST_PAGING.fields(
            InputSchema::new().string("list_id", "The ID of the list"),
            PAGE_SIZE_HELP,
            TOKEN_HELP,
        ),
        get_list_tweets,
    )?;
    add_tool(
        sink,
        ctx,
        "get_owned_lists",
        "Get lists owned by a user",
        LIST_PAGING.fields(
            InputSchema::new().string("user_id", "The ID of the user"),
            PAGE_SIZE_HELP,
            TOKEN_HELP,
        ),
        get_owned_lists,
    )?;
    add_tool(
        sink,
        ctx,
        "get_list_members",
        "Get members of a list",
        LIST_PAGING.fields(
            InputSchema::new().string("list_id", "The ID of the list"),
            PAGE_SIZE_HELP,
            TOKEN_HELP,
        ),
        get_list_members,
    )?;
    add_tool(
        sink,
        ctx,
        "get_followed_lists",
        "Get lists the user follows",
        LIST_PAGING.fields(
            InputSchema::new().string("user_id", "The ID of the user"),
            PAGE_SIZE_HELP,
            TOKEN_HELP,
        ),
        get_followed_lists,
    )?;
    add_tool(
        sink,
        ctx,
        "get_pinned_lists",
        "Get pinned lists of the authenticated user",
        InputSchema::new(),
        get_pinned_lists,
    )
}

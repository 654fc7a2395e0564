use super::schema::InputSchema;
use super::{add_tool, Paging, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use serde::Deserialize;
use serde_json::{json, Value};

const DM_PAGING: Paging = Paging::new(1, 100, Some(20));

#[derive(Debug, Deserialize)]
struct SendDmArgs {
    participant_id: String,
    text: String,
    media_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationMessageArgs {
    conversation_id: String,
    text: String,
    media_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateConversationArgs {
    participant_ids: Vec<String>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct DmEventsArgs {
    max_results: Option<i64>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationEventsArgs {
    conversation_id: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

fn message_body(text: String, media_id: Option<String>) -> Value {
    match media_id.filter(|id| !id.is_empty()) {
        Some(media_id) => json!({ "text": text, "attachments": [{ "media_id": media_id }] }),
        None => json!({ "text": text }),
    }
}

async fn send_dm(ctx: ToolContext, args: SendDmArgs) -> Result<Value> {
    let body = message_body(args.text, args.media_id);
    ctx.client()
        .send_dm_to_participant(&args.participant_id, body)
        .await
}

async fn send_dm_in_conversation(ctx: ToolContext, args: ConversationMessageArgs) -> Result<Value> {
    let body = message_body(args.text, args.media_id);
    ctx.client()
        .send_dm_in_conversation(&args.conversation_id, body)
        .await
}

async fn create_dm_conversation(ctx: ToolContext, args: CreateConversationArgs) -> Result<Value> {
    ctx.client()
        .create_dm_conversation(&args.participant_ids, &args.message)
        .await
}

async fn get_dm_events(ctx: ToolContext, args: DmEventsArgs) -> Result<Value> {
    let page = DM_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().dm_events(&page).await
}

async fn get_dm_conversation(ctx: ToolContext, args: ConversationEventsArgs) -> Result<Value> {
    let page = DM_PAGING.page(args.max_results, args.next_token)?;
    ctx.client()
        .dm_conversation_events(&args.conversation_id, &page)
        .await
}

pub(super) fn register_post(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "send_dm",
        "Send a DM to a user (1-to-1)",
        InputSchema::new()
            .string("participant_id", "The target user's ID")
            .string("text", "The message text")
            .optional_string("media_id", "Optional media ID to attach"),
        send_dm,
    )?;
    add_tool(
        sink,
        ctx,
        "send_dm_in_conversation",
        "Send a message in an existing DM conversation",
        InputSchema::new()
            .string("conversation_id", "The DM conversation ID")
            .string("text", "The message text")
            .optional_string("media_id", "Optional media ID to attach"),
        send_dm_in_conversation,
    )?;
    add_tool(
        sink,
        ctx,
        "create_dm_conversation",
        "Create a group DM conversation",
        InputSchema::new()
            .string_array(
                "participant_ids",
                "Array of user IDs to include in the conversation",
            )
            .string("message", "The initial message text"),
        create_dm_conversation,
    )
}

pub(super) fn register_get(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "get_dm_events",
        "Get DM events (last 30 days)",
        DM_PAGING.fields(
            InputSchema::new(),
            "Maximum number of results (1-100, default 20)",
            "Pagination token",
        ),
        get_dm_events,
    )?;
    add_tool(
        sink,
        ctx,
        "get_dm_conversation",
        "Get messages in a DM conversation",
        DM_PAGING.fields(
            InputSchema::new().string("conversation_id", "The DM conversation ID"),
            "Maximum number of results (1-100, default 20)",
            "Pagination token",
        ),
        get_dm_conversation,
    )
}

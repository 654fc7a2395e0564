use super::schema::InputSchema;
use super::{add_tool, Paging, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use serde::Deserialize;
use serde_json::{json, Map, Value};

const SEARCH_PAGING: Paging = Paging::new(10, 100, None);

#[derive(Debug, Deserialize)]
struct PostTweetArgs {
    text: String,
    reply_to: Option<String>,
    quote_tweet_id: Option<String>,
    media_ids: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct TweetIdArgs {
    tweet_id: String,
}

#[derive(Debug, Deserialize)]
struct TweetIdsArgs {
    tweet_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    query: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteTweetsArgs {
    tweet_id: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

fn post_payload(args: PostTweetArgs) -> Value {
    let mut payload = Map::new();
    payload.insert("text".to_string(), json!(args.text));
    if let Some(reply_to) = args.reply_to.filter(|s| !s.is_empty()) {
        payload.insert("reply".to_string(), json!({ "in_reply_to_tweet_id": reply_to }));
    }
    if let Some(quote) = args.quote_tweet_id.filter(|s| !s.is_empty()) {
        payload.insert("quote_tweet_id".to_string(), json!(quote));
    }
    if let Some(media_ids) = args.media_ids.filter(|ids| !ids.is_empty()) {
        payload.insert("media".to_string(), json!({ "media_ids": media_ids }));
    }
    Value::Object(payload)
}

async fn post_tweet(ctx: ToolContext, args: PostTweetArgs) -> Result<Value> {
    ctx.client().create_tweet(post_payload(args)).await
}

async fn delete_tweet(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    ctx.client().delete_tweet(&args.tweet_id).await
}

async fn get_tweet(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    ctx.client().get_tweet(&args.tweet_id).await
}

async fn get_tweets(ctx: ToolContext, args: TweetIdsArgs) -> Result<Value> {
    ctx.client().get_tweets(&args.tweet_ids).await
}

async fn search_tweets(ctx: ToolContext, args: SearchArgs) -> Result<Value> {
    let page = SEARCH_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().search_recent(&args.query, &page).await
}

async fn get_quote_tweets(ctx: ToolContext, args: QuoteTweetsArgs) -> Result<Value> {
    let page = SEARCH_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().quote_tweets(&args.tweet_id, &page).await
}

pub(super) fn register_post(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "post_tweet",
        "Post a tweet, optionally as a reply, quote tweet, or with media",
        InputSchema::new()
            .string("text", "The text content of the tweet")
            .optional_string("reply_to", "Tweet ID to reply to")
            .optional_string("quote_tweet_id", "Tweet ID to quote")
            .optional_string_array("media_ids", "Array of media IDs to attach"),
        post_tweet,
    )
}

pub(super) fn register_delete(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "delete_tweet",
        "Delete a tweet by ID",
        InputSchema::new().string("tweet_id", "The ID of the tweet to delete"),
        delete_tweet,
    )
}

pub(super) fn register_get(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "get_tweet",
        "Get a single tweet by ID with detailed information",
        InputSchema::new().string("tweet_id", "The ID of the tweet to retrieve"),
        get_tweet,
    )?;
    add_tool(
        sink,
        ctx,
        "get_tweets",
        "Get multiple tweets by their IDs",
        InputSchema::new().string_array("tweet_ids", "Array of tweet IDs to retrieve"),
        get_tweets,
    )?;
    add_tool(
        sink,
        ctx,
        "search_tweets",
        "Search recent tweets (last 7 days) using Twitter search query syntax",
        SEARCH_PAGING.fields(
            InputSchema::new().string("query", "Search query using Twitter search operators"),
            "Maximum number of results to return (10-100, default: 10)",
            "Pagination token for next page of results",
        ),
        search_tweets,
    )?;
    add_tool(
        sink,
        ctx,
        "get_quote_tweets",
        "Get quote tweets for a specific tweet",
        SEARCH_PAGING.fields(
            InputSchema::new().string("tweet_id", "The ID of the tweet to get quotes for"),
            "Maximum number of results to return (10-100, default: 10)",
            "Pagination token for next page of results",
        ),
        get_quote_tweets,
    )
}

use super::schema::InputSchema;
use super::{add_tool, Paging, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use serde::Deserialize;
use serde_json::Value;

const LIKED_PAGING: Paging = Paging::new(10, 100, Some(10));
const BOOKMARK_PAGING: Paging = Paging::new(1, 100, Some(20));

#[derive(Debug, Deserialize)]
struct TweetIdArgs {
    tweet_id: String,
}

#[derive(Debug, Deserialize)]
struct LikedTweetsArgs {
    user_id: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BookmarksArgs {
    max_results: Option<i64>,
    next_token: Option<String>,
}

async fn like_tweet(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().like(&me, &args.tweet_id).await
}

async fn retweet(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().retweet(&me, &args.tweet_id).await
}

async fn bookmark_tweet(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().bookmark(&me, &args.tweet_id).await
}

async fn unlike_tweet(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().unlike(&me, &args.tweet_id).await
}

async fn unretweet(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().unretweet(&me, &args.tweet_id).await
}

async fn delete_bookmark(ctx: ToolContext, args: TweetIdArgs) -> Result<Value> {
    let me = ctx.my_user_id().await?;
    ctx.client().delete_bookmark(&me, &args.tweet_id).await
}

async fn get_liked_tweets(ctx: ToolContext, args: LikedTweetsArgs) -> Result<Value> {
    let page = LIKED_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().liked_tweets(&args.user_id, &page).await
}

async fn get_bookmarks(ctx: ToolContext, args: BookmarksArgs) -> Result<Value> {
    let page = BOOKMARK_PAGING.page(args.max_results, args.next_token)?;
    let me = ctx.my_user_id().await?;
    ctx.client().bookmarks(&me, &page).await
}

pub(super) fn register_post(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "like_tweet",
        "Like a tweet",
        InputSchema::new().string("tweet_id", "The ID of the tweet to like"),
        like_tweet,
    )?;
    add_tool(
        sink,
        ctx,
        "retweet",
        "Retweet a tweet",
        InputSchema::new().string("tweet_id", "The ID of the tweet to retweet"),
        retweet,
    )?;
    add_tool(
        sink,
        ctx,
        "bookmark_tweet",
        "Bookmark a tweet",
        InputSchema::new().string("tweet_id", "The ID of the tweet to bookmark"),
        bookmark_tweet,
    )
}

pub(super) fn register_delete(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "unlike_tweet",
        "Unlike a tweet",
        InputSchema::new().string("tweet_id", "The ID of the tweet to unlike"),
        unlike_tweet,
    )?;
    add_tool(
        sink,
        ctx,
        "unretweet",
        "Remove a retweet",
        InputSchema::new().string("tweet_id", "The ID of the tweet to unretweet"),
        unretweet,
    )?;
    add_tool(
        sink,
        ctx,
        "delete_bookmark",
        "Remove a bookmark",
        InputSchema::new().string("tweet_id", "The ID of the tweet to unbookmark"),
        delete_bookmark,
    )
}

pub(super) fn register_get(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "get_liked_tweets",
        "Get tweets liked by a user",
        LIKED_PAGING.fields(
            InputSchema::new().string("user_id", "The ID of the user"),
            "Maximum number of results (10-100, default: 10)",
            "Pagination token for next page of results",
        ),
        get_liked_tweets,
    )?;
    add_tool(
        sink,
        ctx,
        "get_bookmarks",
        "Get bookmarked tweets",
        BOOKMARK_PAGING.fields(
            InputSchema::new(),
            "Maximum number of results (1-100, default: 20)",
            "Pagination token for next page of results",
        ),
        get_bookmarks,
    )
}

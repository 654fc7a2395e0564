use super::schema::InputSchema;
use super::{add_tool, Paging, ToolContext};
use crate::error::Result;
use crate::mcp::ToolSink;
use serde::Deserialize;
use serde_json::Value;

const HOME_PAGING: Paging = Paging::new(1, 100, Some(20));
const USER_PAGING: Paging = Paging::new(5, 100, Some(10));

#[derive(Debug, Deserialize)]
struct HomeTimelineArgs {
    max_results: Option<i64>,
    next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserTimelineArgs {
    user_id: String,
    max_results: Option<i64>,
    next_token: Option<String>,
}

async fn get_home_timeline(ctx: ToolContext, args: HomeTimelineArgs) -> Result<Value> {
    let page = HOME_PAGING.page(args.max_results, args.next_token)?;
    let me = ctx.my_user_id().await?;
    ctx.client().home_timeline(&me, &page).await
}

async fn get_user_tweets(ctx: ToolContext, args: UserTimelineArgs) -> Result<Value> {
    let page = USER_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().user_tweets(&args.user_id, &page).await
}

async fn get_user_mentions(ctx: ToolContext, args: UserTimelineArgs) -> Result<Value> {
    let page = USER_PAGING.page(args.max_results, args.next_token)?;
    ctx.client().user_mentions(&args.user_id, &page).await
}

pub(super) fn register_get(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "get_home_timeline",
        "Get home timeline",
        HOME_PAGING.fields(
            InputSchema::new(),
            "Maximum number of tweets to return (1-100, default 20)",
            "Pagination token for next page of results",
        ),
        get_home_timeline,
    )?;
    add_tool(
        sink,
        ctx,
        "get_user_tweets",
        "Get a user's tweets",
        USER_PAGING.fields(
            InputSchema::new().string("user_id", "The user ID to get tweets from"),
            "Maximum number of tweets to return (5-100, default 10)",
            "Pagination token for next page of results",
        ),
        get_user_tweets,
    )?;
    add_tool(
        sink,
        ctx,
        "get_user_mentions",
        "Get a user's mentions",
        USER_PAGING.fields(
            InputSchema::new().string("user_id", "The user ID to get mentions for"),
            "Maximum number of mentions to return (5-100, default 10)",
            "Pagination token for next page of results",
        ),
        get_user_mentions,
    )
}

#[cfg(test)]
mod tests {
    use crate::config::ToolsConfig;
    use crate::tools::build_registry;
    use crate::tools::tests::{call, test_context};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_home_timeline_resolves_self_and_defaults_page_size() {
        let server = MockServer::start();
        let me = server.mock(|when, then| {
            when.method(GET).path("/2/users/me");
            then.status(200).json_body(json!({ "data": { "id": "42" } }));
        });
        let timeline = server.mock(|when, then| {
            when.method(GET)
                .path("/2/users/42/timelines/reverse_chronological")
                .query_param("max_results", "20")
                .query_param("pagination_token", "next");
            then.status(200).json_body(json!({ "data": [] }));
        });

        let registry = build_registry(&test_context(&server), &ToolsConfig::default()).unwrap();
        for _ in 0..2 {
            let result = call(
                &registry,
                "get_home_timeline",
                json!({ "next_token": "next" }),
            )
            .await;
            assert_ne!(result.is_error, Some(true));
        }

        me.assert_hits(1);
        timeline.assert_hits(2);
    }

    #[tokio::test]
    async fn test_user_tweets_lower_bound() {
        let server = MockServer::start();
        let registry = build_registry(&test_context(&server), &ToolsConfig::default()).unwrap();

        let result = call(
            &registry,
            "get_user_tweets",
            json!({ "user_id": "1", "max_results": 4 }),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
    }
}

use super::schema::InputSchema;
use super::{add_tool, NoArgs, ToolContext};
use crate::client::RateLimit;
use crate::error::Result;
use crate::mcp::ToolSink;
use chrono::{DateTime, SecondsFormat};
use serde_json::{json, Value};

const UNAVAILABLE: &str = "Rate limit info not available";

fn rate_limit_summary(rate_limit: Option<RateLimit>) -> Value {
    let Some(limit) = rate_limit else {
        return json!(UNAVAILABLE);
    };

    let reset_at = i64::try_from(limit.reset)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true));

    json!({
        "limit": limit.limit,
        "remaining": limit.remaining,
        "reset": limit.reset,
        "reset_at": reset_at,
    })
}

async fn get_api_usage(ctx: ToolContext, _args: NoArgs) -> Result<Value> {
    let response = ctx.client().me_with_rate_limit().await?;
    let user = response.body.get("data").cloned().unwrap_or(Value::Null);

    Ok(json!({
        "user": user,
        "rate_limit": rate_limit_summary(response.rate_limit),
    }))
}

pub(super) fn register_get(sink: &mut dyn ToolSink, ctx: &ToolContext) -> Result<()> {
    add_tool(
        sink,
        ctx,
        "get_api_usage",
        "Get current API usage/rate limit status",
        InputSchema::new(),
        get_api_usage,
    )
}

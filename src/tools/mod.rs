//! The tool catalogue.
//!
//! Tools are grouped under `group:verb` keys. [`TOOL_GROUPS`] fixes both the
//! set of keys and the order groups are registered in; [`build_registry`]
//! applies the configured allow-list and deny-list on top of it.

mod blocks_mutes;
mod dm;
mod engagement;
mod lists;
mod media;
pub mod schema;
mod timelines;
mod tweets;
mod usage;
mod users;

use crate::client::{MediaFetcher, Page, SelfUserId, XClient};
use crate::config::ToolsConfig;
use crate::error::{Result, XError};
use crate::mcp::registry::{
    install_deny_guard, ToolDescriptor, ToolHandler, ToolRegistry, ToolSink,
};
use crate::mcp::{format_error, format_response};
use crate::routing::{resolve_disabled_tools, resolve_enabled_groups, should_register_group};
use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, JsonObject};
use schema::InputSchema;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub type RegisterFn = fn(&mut dyn ToolSink, &ToolContext) -> Result<()>;

/// One `group:verb` key and the function that registers its tools.
#[derive(Clone, Copy)]
pub struct ToolGroup {
    pub key: &'static str,
    pub register: RegisterFn,
}

pub const TOOL_GROUPS: &[ToolGroup] = &[
    ToolGroup { key: "tweets:post", register: tweets::register_post },
    ToolGroup { key: "tweets:delete", register: tweets::register_delete },
    ToolGroup { key: "tweets:get", register: tweets::register_get },
    ToolGroup { key: "timelines:get", register: timelines::register_get },
    ToolGroup { key: "engagement:post", register: engagement::register_post },
    ToolGroup { key: "engagement:delete", register: engagement::register_delete },
    ToolGroup { key: "engagement:get", register: engagement::register_get },
    ToolGroup { key: "users:post", register: users::register_post },
    ToolGroup { key: "users:delete", register: users::register_delete },
    ToolGroup { key: "users:get", register: users::register_get },
    ToolGroup { key: "blocks-mutes:post", register: blocks_mutes::register_post },
    ToolGroup { key: "blocks-mutes:delete", register: blocks_mutes::register_delete },
    ToolGroup { key: "dm:post", register: dm::register_post },
    ToolGroup { key: "dm:get", register: dm::register_get },
    ToolGroup { key: "lists:post", register: lists::register_post },
    ToolGroup { key: "lists:delete", register: lists::register_delete },
    ToolGroup { key: "lists:get", register: lists::register_get },
    ToolGroup { key: "media:post", register: media::register_post },
    ToolGroup { key: "usage:get", register: usage::register_get },
];

pub fn group_keys() -> impl Iterator<Item = &'static str> {
    TOOL_GROUPS.iter().map(|g| g.key)
}

/// Shared state every tool handler gets a clone of.
#[derive(Debug, Clone)]
pub struct ToolContext {
    client: Arc<XClient>,
    me: Arc<SelfUserId>,
    fetcher: MediaFetcher,
}

impl ToolContext {
    pub fn new(client: XClient, fetcher: MediaFetcher) -> Self {
        Self {
            client: Arc::new(client),
            me: Arc::new(SelfUserId::new()),
            fetcher,
        }
    }

    pub fn client(&self) -> &XClient {
        &self.client
    }

    pub fn fetcher(&self) -> &MediaFetcher {
        &self.fetcher
    }

    /// Id of the authenticated account, looked up once.
    pub async fn my_user_id(&self) -> Result<String> {
        self.me.get(&self.client).await
    }
}

/// Build the registry for this process from the tool policy in `config`.
pub fn build_registry(ctx: &ToolContext, config: &ToolsConfig) -> Result<ToolRegistry> {
    let enabled = resolve_enabled_groups(config.enabled_groups.as_deref(), group_keys());
    let disabled = resolve_disabled_tools(config.disabled_tools.as_deref());

    if !enabled.is_all() {
        info!(?enabled, "Restricting tool groups");
    }

    let mut registry = ToolRegistry::new();
    {
        let mut sink = install_deny_guard(&mut registry, &disabled);
        for group in TOOL_GROUPS {
            if should_register_group(group.key, &enabled) {
                (group.register)(&mut sink, ctx)?;
            } else {
                debug!(group = group.key, "Tool group not enabled");
            }
        }
    }

    info!(
        tools = registry.len(),
        disabled = disabled.len(),
        "Tool registry built"
    );
    Ok(registry)
}

/// Register one tool whose handler deserialises its arguments into `A` and
/// runs `run`. Any error, including bad arguments, becomes the error envelope.
pub(crate) fn add_tool<A, F, Fut>(
    sink: &mut dyn ToolSink,
    ctx: &ToolContext,
    name: &str,
    description: &str,
    schema: InputSchema,
    run: F,
) -> Result<()>
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(ToolContext, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    let descriptor = ToolDescriptor {
        description: description.to_string(),
        input_schema: Arc::new(schema.build()),
    };

    let ctx = ctx.clone();
    let tool = name.to_string();
    let handler: ToolHandler = Arc::new(
        move |args: JsonObject| -> BoxFuture<'static, CallToolResult> {
            let call = serde_json::from_value::<A>(Value::Object(args))
                .map_err(|e| XError::invalid_arguments(e.to_string()))
                .map(|parsed| run(ctx.clone(), parsed));
            let tool = tool.clone();

            Box::pin(async move {
                let outcome = match call {
                    Ok(fut) => fut.await,
                    Err(e) => Err(e),
                };
                match outcome {
                    Ok(value) => format_response(&value),
                    Err(e) => {
                        if e.is_validation() {
                            debug!(tool = %tool, error = %e, "Tool call rejected");
                        } else {
                            warn!(tool = %tool, error = %e, "Tool call failed");
                        }
                        format_error(&e)
                    }
                }
            })
        },
    );

    sink.register(name, descriptor, handler)
}

/// Arguments for tools that take none.
#[derive(Debug, Deserialize)]
pub(crate) struct NoArgs {}

/// Bounds and default for a `max_results` argument.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Paging {
    pub min: i64,
    pub max: i64,
    pub default: Option<i64>,
}

impl Paging {
    pub(crate) const fn new(min: i64, max: i64, default: Option<i64>) -> Self {
        Self { min, max, default }
    }

    /// Check `max_results` against the bounds and build the page request.
    pub(crate) fn page(&self, max_results: Option<i64>, next_token: Option<String>) -> Result<Page> {
        let size = match max_results.or(self.default) {
            Some(n) if n < self.min || n > self.max => {
                return Err(XError::invalid_arguments(format!(
                    "max_results must be between {} and {}, got {}",
                    self.min, self.max, n
                )));
            }
            Some(n) => Some(n as u32),
            None => None,
        };
        Ok(Page::new(size, next_token))
    }

    /// Add the `max_results` and `next_token` fields to a schema.
    pub(crate) fn fields(
        &self,
        schema: InputSchema,
        max_description: &str,
        token_description: &str,
    ) -> InputSchema {
        schema
            .optional_integer("max_results", max_description, self.min, self.max)
            .optional_string("next_token", token_description)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use crate::config::ToolsConfig;
    use crate::mcp::envelope::text_of;
    use httpmock::MockServer;
    use std::collections::HashSet;
    use std::time::Duration;

    pub(crate) fn test_context(server: &MockServer) -> ToolContext {
        let fetcher = MediaFetcher::new(Duration::from_secs(5)).unwrap();
        ToolContext::new(test_client(server), fetcher)
    }

    pub(crate) async fn call(registry: &ToolRegistry, name: &str, args: Value) -> CallToolResult {
        let tool = registry.get(name).unwrap();
        let args = args.as_object().cloned().unwrap_or_default();
        (tool.handler)(args).await
    }

    fn tools_config(enabled: Option<&str>, disabled: Option<&str>) -> ToolsConfig {
        ToolsConfig {
            enabled_groups: enabled.map(str::to_string),
            disabled_tools: disabled.map(str::to_string),
        }
    }

    #[test]
    fn test_group_keys_are_unique() {
        let keys: HashSet<&str> = group_keys().collect();
        assert_eq!(keys.len(), TOOL_GROUPS.len());
        assert_eq!(TOOL_GROUPS.len(), 19);
    }

    #[test]
    fn test_full_catalogue() {
        let server = MockServer::start();
        let registry = build_registry(&test_context(&server), &ToolsConfig::default()).unwrap();

        assert_eq!(registry.len(), 53);
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names[0], "post_tweet");
        assert_eq!(names[names.len() - 1], "get_api_usage");
        for tool in registry.tools() {
            assert_eq!(tool.descriptor.input_schema["type"], "object");
            assert!(!tool.descriptor.description.is_empty());
        }
    }

    #[test]
    fn test_bare_group_pattern() {
        let server = MockServer::start();
        let registry =
            build_registry(&test_context(&server), &tools_config(Some("tweets"), None)).unwrap();

        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![
                "post_tweet",
                "delete_tweet",
                "get_tweet",
                "get_tweets",
                "search_tweets",
                "get_quote_tweets"
            ]
        );
    }

    #[test]
    fn test_deny_wins_over_enabled_group() {
        let server = MockServer::start();
        let registry = build_registry(
            &test_context(&server),
            &tools_config(Some("tweets:get,users:get"), Some("search_tweets,get_me,post_tweet")),
        )
        .unwrap();

        assert!(registry.contains("get_tweet"));
        assert!(registry.contains("get_user"));
        assert!(!registry.contains("search_tweets"));
        assert!(!registry.contains("get_me"));
        assert!(!registry.contains("post_tweet"));
    }

    #[test]
    fn test_pattern_matching_nothing_registers_nothing() {
        let server = MockServer::start();
        let registry = build_registry(
            &test_context(&server),
            &tools_config(Some("bogus-prefix-matching-nothing"), None),
        )
        .unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_paging_bounds() {
        let paging = Paging::new(10, 100, None);
        assert_eq!(paging.page(None, None).unwrap(), Page::default());
        assert_eq!(
            paging.page(Some(50), Some("t".into())).unwrap(),
            Page::new(Some(50), Some("t".into()))
        );
        assert!(paging.page(Some(9), None).is_err());
        assert!(paging.page(Some(101), None).is_err());

        let defaulted = Paging::new(1, 100, Some(20));
        assert_eq!(defaulted.page(None, None).unwrap().max_results, Some(20));
    }

    #[tokio::test]
    async fn test_bad_arguments_become_error_envelope() {
        let server = MockServer::start();
        let registry = build_registry(&test_context(&server), &ToolsConfig::default()).unwrap();

        let result = call(&registry, "post_tweet", serde_json::json!({})).await;
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("Error: Invalid arguments: missing field `text`"));

        let result = call(
            &registry,
            "search_tweets",
            serde_json::json!({ "query": "rust", "max_results": 500 }),
        )
        .await;
        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Error: Invalid arguments: max_results must be between 10 and 100, got 500"
        );
    }
}

//! Tool registration: the sink interface, the in-memory registry that backs
//! the MCP server, and the deny-list decorator placed in front of it.

use crate::error::{Result, XError};
use crate::routing::DisabledTools;
use futures::future::BoxFuture;
use rmcp::model::{CallToolResult, JsonObject, Tool};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub type ToolHandler = Arc<dyn Fn(JsonObject) -> BoxFuture<'static, CallToolResult> + Send + Sync>;

/// What the host shows for a tool: its description and input schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub description: String,
    pub input_schema: Arc<JsonObject>,
}

/// Anything tools can be registered with.
pub trait ToolSink {
    fn register(&mut self, name: &str, descriptor: ToolDescriptor, handler: ToolHandler)
        -> Result<()>;
}

pub struct RegisteredTool {
    pub name: String,
    pub descriptor: ToolDescriptor,
    pub handler: ToolHandler,
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl RegisteredTool {
    pub fn to_mcp_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            title: None,
            description: Some(self.descriptor.description.clone().into()),
            input_schema: self.descriptor.input_schema.clone(),
            output_schema: None,
            annotations: None,
            icons: None,
            meta: None,
        }
    }
}

/// Registered tools in registration order, indexed by name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn tools(&self) -> &[RegisteredTool] {
        &self.tools
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(RegisteredTool::to_mcp_tool).collect()
    }
}

impl ToolSink for ToolRegistry {
    fn register(
        &mut self,
        name: &str,
        descriptor: ToolDescriptor,
        handler: ToolHandler,
    ) -> Result<()> {
        if self.index.contains_key(name) {
            return Err(XError::ToolAlreadyRegistered(name.to_string()));
        }

        debug!(tool = name, "Registering tool");
        self.index.insert(name.to_string(), self.tools.len());
        self.tools.push(RegisteredTool {
            name: name.to_string(),
            descriptor,
            handler,
        });
        Ok(())
    }
}

/// Drops registrations whose name is on the deny-list and forwards the rest.
pub struct DenyGuard<'a> {
    inner: &'a mut dyn ToolSink,
    disabled: &'a DisabledTools,
}

impl ToolSink for DenyGuard<'_> {
    fn register(
        &mut self,
        name: &str,
        descriptor: ToolDescriptor,
        handler: ToolHandler,
    ) -> Result<()> {
        if self.disabled.contains(name) {
            debug!(tool = name, "Tool disabled by deny-list, skipping");
            return Ok(());
        }
        self.inner.register(name, descriptor, handler)
    }
}

/// A sink as returned by [`install_deny_guard`].
pub enum GuardedSink<'a> {
    /// The caller's own sink, untouched.
    Passthrough(&'a mut dyn ToolSink),
    Deny(DenyGuard<'a>),
}

impl GuardedSink<'_> {
    pub fn is_passthrough(&self) -> bool {
        matches!(self, GuardedSink::Passthrough(_))
    }
}

impl ToolSink for GuardedSink<'_> {
    fn register(
        &mut self,
        name: &str,
        descriptor: ToolDescriptor,
        handler: ToolHandler,
    ) -> Result<()> {
        match self {
            GuardedSink::Passthrough(sink) => sink.register(name, descriptor, handler),
            GuardedSink::Deny(guard) => guard.register(name, descriptor, handler),
        }
    }
}

/// Wrap `sink` so denied tool names never reach it. With an empty deny-list
/// the sink comes back as is.
pub fn install_deny_guard<'a>(
    sink: &'a mut dyn ToolSink,
    disabled: &'a DisabledTools,
) -> GuardedSink<'a> {
    if disabled.is_empty() {
        GuardedSink::Passthrough(sink)
    } else {
        GuardedSink::Deny(DenyGuard {
            inner: sink,
            disabled,
        })
    }
}

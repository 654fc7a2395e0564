pub mod envelope;
pub mod registry;
pub mod server;

pub use envelope::{format_error, format_response};
pub use registry::{
    install_deny_guard, GuardedSink, ToolDescriptor, ToolHandler, ToolRegistry, ToolSink,
};
pub use server::{XServer, SERVER_NAME};

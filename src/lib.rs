pub mod api;
pub mod client;
pub mod config;
pub(crate) mod error;
pub mod mcp;
pub mod routing;
pub mod security;
pub mod tools;

pub use error::{Result, XError};

pub mod outbound;
pub mod sanitize;

pub use outbound::{validate_path, validate_url};
pub use sanitize::{sanitize, BLOCKED_KEYS};

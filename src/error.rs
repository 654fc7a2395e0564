use thiserror::Error;

#[derive(Error, Debug)]
pub enum XError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(
        "Missing Twitter API credentials. Set X_API_KEY, X_API_SECRET, X_ACCESS_TOKEN, X_ACCESS_TOKEN_SECRET environment variables."
    )]
    MissingCredentials,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Path traversal is not allowed")]
    PathTraversal,

    #[error("Only http and https URLs are allowed")]
    UnsupportedScheme,

    #[error("Access to internal/private network addresses is not allowed")]
    PrivateNetwork,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("X API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to fetch media from URL: {status} {reason}")]
    MediaFetch { status: u16, reason: String },

    #[error("Media exceeds the maximum size of {limit} bytes")]
    MediaTooLarge { limit: u64 },

    #[error("Media processing failed: {0}")]
    MediaProcessing(String),

    #[error("OAuth error: {0}")]
    OAuth(String),

    #[error("Tool already registered: {0}")]
    ToolAlreadyRegistered(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, XError>;

impl XError {
    pub(crate) fn invalid_arguments(details: impl Into<String>) -> Self {
        XError::InvalidArguments(details.into())
    }

    /// True for errors raised by local validation before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            XError::InvalidArguments(_)
                | XError::PathTraversal
                | XError::UnsupportedScheme
                | XError::PrivateNetwork
                | XError::InvalidUrl(_)
        )
    }
}

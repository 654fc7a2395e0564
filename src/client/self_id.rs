use super::XClient;
use crate::error::{Result, XError};
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

/// Memoised id of the authenticated account.
///
/// The first successful lookup is kept for the life of the process. A failed
/// lookup stores nothing, so the next caller tries again.
#[derive(Debug, Default)]
pub struct SelfUserId {
    cell: OnceCell<String>,
}

impl SelfUserId {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, client: &XClient) -> Result<String> {
        self.cell
            .get_or_try_init(|| async {
                let me = client.me().await?;
                let id = me
                    .pointer("/data/id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| XError::Internal("users/me response has no data.id".to_string()))?;
                debug!(user_id = %id, "Resolved authenticated user id");
                Ok::<_, XError>(id.to_string())
            })
            .await
            .cloned()
    }
}

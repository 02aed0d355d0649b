use async_trait::async_trait;
use thiserror::Error;

use smsledger_core::PatternDraft;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Pattern store responded with status {0}")]
    Status(u16),
    #[error("Invalid pattern id: '{0}'")]
    InvalidId(String),
    #[error("Invalid pattern store URL: {0}")]
    InvalidUrl(String),
}

/// Write side of the pattern store.
#[async_trait]
pub trait PatternStore: Send + Sync {
    /// Create the pattern, or update it when `draft.id` is set.
    async fn upsert(&self, draft: &PatternDraft) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

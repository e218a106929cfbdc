use async_trait::async_trait;
use thiserror::Error;

use super::entities::TokenRecord;

#[derive(Debug, Error)]
pub enum TokenDatabaseError {
    #[error("Token store I/O failed: {0}")]
    Io(String),

    #[error("Token store contents are corrupt: {0}")]
    Corrupt(String),

    #[error("Token store operation failed: {0}")]
    OperationFailed(String),
}

/// Durable mapping from push token to its registration record.
///
/// The whole collection is the unit of mutation: implementations must
/// serialize concurrent upserts so that none of them is lost.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenDatabase {
    /// Creates the record for `token`, or replaces its timestamp and user agent
    /// in place. The record is persisted before this returns.
    async fn upsert_token(
        &self,
        token: &str,
        user_agent: Option<String>,
    ) -> Result<TokenRecord, TokenDatabaseError>;

    /// All records in first-registration order.
    async fn list_tokens(&self) -> Result<Vec<TokenRecord>, TokenDatabaseError>;
}

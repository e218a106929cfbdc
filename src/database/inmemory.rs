use async_trait::async_trait;
use std::sync::Mutex;

use crate::tokens::{
    database::{TokenDatabase, TokenDatabaseError},
    entities::{TokenRecord, upsert_in_place},
};

/// Non-durable token store, for development and tests.
pub struct InMemoryDatabase {
    pub tokens: Mutex<Vec<TokenRecord>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        InMemoryDatabase {
            tokens: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenDatabase for InMemoryDatabase {
    async fn upsert_token(
        &self,
        token: &str,
        user_agent: Option<String>,
    ) -> Result<TokenRecord, TokenDatabaseError> {
        let mut tokens_lock = self
            .tokens
            .lock()
            .map_err(|_| TokenDatabaseError::OperationFailed("Lock poisoned".to_string()))?;

        let record = TokenRecord::new(token, user_agent);
        upsert_in_place(&mut tokens_lock, record.clone());
        Ok(record)
    }

    async fn list_tokens(&self) -> Result<Vec<TokenRecord>, TokenDatabaseError> {
        let tokens_lock = self
            .tokens
            .lock()
            .map_err(|_| TokenDatabaseError::OperationFailed("Lock poisoned".to_string()))?;
        Ok(tokens_lock.clone())
    }
}

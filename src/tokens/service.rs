use std::sync::Arc;
use tracing::{debug, instrument};

use super::{database::TokenDatabase, entities::TokenRecord, error::TokenError};

pub struct TokenService<D: TokenDatabase + ?Sized> {
    token_db: Arc<D>,
}

impl<D: TokenDatabase + ?Sized> TokenService<D> {
    pub fn new(token_db: Arc<D>) -> Self {
        Self { token_db }
    }

    /// Registers a device token, or refreshes its timestamp and user agent if
    /// it is already known. The token itself is stored exactly as given.
    #[instrument(skip_all)]
    pub async fn register_token(
        &self,
        token: &str,
        user_agent: Option<String>,
    ) -> Result<TokenRecord, TokenError> {
        if token.is_empty() {
            return Err(TokenError::InvalidInput("Token is required".to_string()));
        }

        let user_agent = user_agent.filter(|ua| !ua.is_empty());
        let record = self.token_db.upsert_token(token, user_agent).await?;
        debug!(registered_at = %record.timestamp, "Token registered");
        Ok(record)
    }

    pub async fn list_tokens(&self) -> Result<Vec<TokenRecord>, TokenError> {
        Ok(self.token_db.list_tokens().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::inmemory::InMemoryDatabase;
    use crate::tokens::database::{MockTokenDatabase, TokenDatabaseError};
    use mockall::predicate::{always, eq};

    fn in_memory_service() -> TokenService<InMemoryDatabase> {
        TokenService::new(Arc::new(InMemoryDatabase::new()))
    }

    #[tokio::test]
    async fn test_register_empty_token_is_rejected_without_store_call() {
        let mut mock_db = MockTokenDatabase::new();
        mock_db.expect_upsert_token().never();

        let service = TokenService::new(Arc::new(mock_db));
        let result = service.register_token("", Some("deviceX".to_string())).await;

        assert!(matches!(result, Err(TokenError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_register_passes_token_through_unchanged() {
        let token = "  fQ3x9v:APA91b/+= ";

        let mut mock_db = MockTokenDatabase::new();
        mock_db
            .expect_upsert_token()
            .once()
            .with(eq(token), eq(Some("deviceX".to_string())))
            .returning(|token, user_agent| Ok(TokenRecord::new(token, user_agent)));

        let service = TokenService::new(Arc::new(mock_db));
        let record = service
            .register_token(token, Some("deviceX".to_string()))
            .await
            .unwrap();

        assert_eq!(record.token, token);
    }

    #[tokio::test]
    async fn test_register_treats_empty_user_agent_as_absent() {
        let mut mock_db = MockTokenDatabase::new();
        mock_db
            .expect_upsert_token()
            .once()
            .with(always(), eq(None::<String>))
            .returning(|token, user_agent| Ok(TokenRecord::new(token, user_agent)));

        let service = TokenService::new(Arc::new(mock_db));
        let record = service
            .register_token("tok-A", Some(String::new()))
            .await
            .unwrap();

        assert_eq!(record.user_agent, None);
    }

    #[tokio::test]
    async fn test_register_propagates_store_error() {
        let mut mock_db = MockTokenDatabase::new();
        mock_db
            .expect_upsert_token()
            .once()
            .returning(|_, _| Err(TokenDatabaseError::Io("permission denied".to_string())));

        let service = TokenService::new(Arc::new(mock_db));
        let result = service.register_token("tok-A", None).await;

        assert!(matches!(
            result,
            Err(TokenError::Store(TokenDatabaseError::Io(_)))
        ));
    }

    #[tokio::test]
    async fn test_list_propagates_store_error() {
        let mut mock_db = MockTokenDatabase::new();
        mock_db
            .expect_list_tokens()
            .once()
            .returning(|| Err(TokenDatabaseError::Corrupt("expected value".to_string())));

        let service = TokenService::new(Arc::new(mock_db));
        let result = service.list_tokens().await;

        assert!(matches!(result, Err(TokenError::Store(_))));
    }

    #[tokio::test]
    async fn test_reregistration_replaces_record() {
        let service = in_memory_service();

        let first = service
            .register_token("tok-A", Some("deviceX".to_string()))
            .await
            .unwrap();
        let second = service
            .register_token("tok-A", Some("deviceY".to_string()))
            .await
            .unwrap();

        let tokens = service.list_tokens().await.unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token, "tok-A");
        assert_eq!(tokens[0].user_agent.as_deref(), Some("deviceY"));
        assert_eq!(tokens[0].timestamp, second.timestamp);
        assert!(second.timestamp >= first.timestamp);
    }

    #[tokio::test]
    async fn test_reregistration_without_user_agent_clears_it() {
        let service = in_memory_service();

        service
            .register_token("tok-A", Some("deviceX".to_string()))
            .await
            .unwrap();
        service.register_token("tok-A", None).await.unwrap();

        let tokens = service.list_tokens().await.unwrap();
        assert_eq!(tokens[0].user_agent, None);
    }

    #[tokio::test]
    async fn test_list_counts_distinct_tokens() {
        let service = in_memory_service();

        for token in ["a", "b", "a", "c", "b", "a"] {
            service.register_token(token, None).await.unwrap();
        }

        let tokens = service.list_tokens().await.unwrap();
        assert_eq!(tokens.len(), 3);
    }

    #[tokio::test]
    async fn test_dedup_ignores_user_agent() {
        let service = in_memory_service();

        service
            .register_token("a", Some("same".to_string()))
            .await
            .unwrap();
        service
            .register_token("b", Some("same".to_string()))
            .await
            .unwrap();

        assert_eq!(service.list_tokens().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_empty_registry() {
        let service = in_memory_service();
        assert!(service.list_tokens().await.unwrap().is_empty());
    }
}

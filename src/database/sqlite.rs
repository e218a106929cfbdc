use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::tokens::{
    database::{TokenDatabase, TokenDatabaseError},
    entities::TokenRecord,
};

pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the necessary tables if they don't exist
    pub async fn init(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tokens (
                token TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                user_agent TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl From<sqlx::Error> for TokenDatabaseError {
    fn from(err: sqlx::Error) -> Self {
        TokenDatabaseError::OperationFailed(err.to_string())
    }
}

#[async_trait]
impl TokenDatabase for SqliteDatabase {
    async fn upsert_token(
        &self,
        token: &str,
        user_agent: Option<String>,
    ) -> Result<TokenRecord, TokenDatabaseError> {
        let record = TokenRecord::new(token, user_agent);

        // ON CONFLICT keeps the row's rowid, so listing order is first-seen order.
        sqlx::query(
            r#"
            INSERT INTO tokens (token, timestamp, user_agent)
            VALUES (?, ?, ?)
            ON CONFLICT(token) DO UPDATE SET
                timestamp = excluded.timestamp,
                user_agent = excluded.user_agent
            "#,
        )
        .bind(&record.token)
        .bind(record.timestamp.to_rfc3339())
        .bind(record.user_agent.as_deref())
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_tokens(&self) -> Result<Vec<TokenRecord>, TokenDatabaseError> {
        let rows = sqlx::query(
            r#"
            SELECT token, timestamp, user_agent
            FROM tokens
            ORDER BY rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<TokenRecord, TokenDatabaseError> {
                let timestamp: String = row.try_get("timestamp")?;
                let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                    .map_err(|err| TokenDatabaseError::Corrupt(err.to_string()))?
                    .with_timezone(&Utc);

                Ok(TokenRecord {
                    token: row.try_get("token")?,
                    timestamp,
                    user_agent: row.try_get("user_agent")?,
                })
            })
            .collect()
    }
}

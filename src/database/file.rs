use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, info};
use uuid::Uuid;

use crate::tokens::{
    database::{TokenDatabase, TokenDatabaseError},
    entities::{TokenRecord, upsert_in_place},
};

/// Token store persisted as a single JSON array document.
///
/// The document is loaded once when opened and rewritten as a whole on every
/// upsert. The mutex is held across the entire read-modify-write-flush cycle,
/// so concurrent upserts never overwrite each other's records.
pub struct JsonFileDatabase {
    document: Arc<TokenDocument>,
}

struct TokenDocument {
    path: PathBuf,
    tokens: Mutex<Vec<TokenRecord>>,
}

impl JsonFileDatabase {
    /// Opens the store at `path`. A missing file is an empty store; a file that
    /// is not a JSON array of token records is an error.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, TokenDatabaseError> {
        let path = path.as_ref().to_path_buf();
        let tokens = read_document(&path).await?;
        info!(path = %path.display(), count = tokens.len(), "Opened token store");

        Ok(Self::with_tokens(path, tokens))
    }

    fn with_tokens(path: PathBuf, tokens: Vec<TokenRecord>) -> Self {
        Self {
            document: Arc::new(TokenDocument {
                path,
                tokens: Mutex::new(tokens),
            }),
        }
    }
}

impl TokenDocument {
    async fn upsert(&self, record: TokenRecord) -> Result<(), TokenDatabaseError> {
        let mut tokens_lock = self.tokens.lock().await;

        let mut updated = tokens_lock.clone();
        upsert_in_place(&mut updated, record);

        // Memory only changes once the new document is on disk.
        self.persist(&updated).await?;
        *tokens_lock = updated;
        Ok(())
    }

    async fn persist(&self, tokens: &[TokenRecord]) -> Result<(), TokenDatabaseError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(io_error)?;
            }
        }

        let payload = serde_json::to_vec_pretty(tokens)
            .map_err(|err| TokenDatabaseError::OperationFailed(err.to_string()))?;

        let temp_path = self
            .path
            .with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        if let Err(err) = write_synced(&temp_path, &payload).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(err));
        }

        if let Err(err) = fs::rename(&temp_path, &self.path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(io_error(err));
        }

        debug!(path = %self.path.display(), count = tokens.len(), "Persisted token store");
        Ok(())
    }
}

async fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(payload).await?;
    file.sync_all().await
}

async fn read_document(path: &Path) -> Result<Vec<TokenRecord>, TokenDatabaseError> {
    let raw = match fs::read(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(io_error(err)),
    };

    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    serde_json::from_slice(&raw).map_err(|err| TokenDatabaseError::Corrupt(err.to_string()))
}

fn io_error(err: std::io::Error) -> TokenDatabaseError {
    TokenDatabaseError::Io(err.to_string())
}

#[async_trait]
impl TokenDatabase for JsonFileDatabase {
    async fn upsert_token(
        &self,
        token: &str,
        user_agent: Option<String>,
    ) -> Result<TokenRecord, TokenDatabaseError> {
        let record = TokenRecord::new(token, user_agent);

        // The write runs on its own task so that a caller which stops waiting
        // cannot abandon the cycle between the rename and the memory commit.
        let document = self.document.clone();
        let pending = record.clone();
        tokio::spawn(async move { document.upsert(pending).await })
            .await
            .map_err(|err| TokenDatabaseError::OperationFailed(err.to_string()))??;

        Ok(record)
    }

    async fn list_tokens(&self) -> Result<Vec<TokenRecord>, TokenDatabaseError> {
        Ok(self.document.tokens.lock().await.clone())
    }
}

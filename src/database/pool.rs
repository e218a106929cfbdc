use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::{fs::create_dir_all, path::Path};

/// Opens a connection pool on the SQLite file at `path`, creating the file and
/// its parent directories if necessary.
pub async fn create_sqlite_pool(path: &str) -> Result<SqlitePool, sqlx::Error> {
    let path = path.trim_start_matches("sqlite:");
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new().connect_with(options).await
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use log::debug;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".spa-booking-calendar";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "booking.sqlite";

/// Ensure the database file exists inside `data_dir`, run lazy migrations,
/// and return a live connection.
pub fn ensure_schema(data_dir: &Path) -> Result<Connection> {
    fs::create_dir_all(data_dir).context("failed to create data directory")?;

    let db_path = data_dir.join(DB_FILE_NAME);
    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open SQLite database at {}", db_path.display()))?;
    debug!("opened booking store at {}", db_path.display());

    init_schema(&conn)?;
    Ok(conn)
}

/// Create the tables on an already open connection. Split out so tests can
/// run against an in-memory database.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create preferences table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS booking_requests (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            reference TEXT NOT NULL UNIQUE,
            tier TEXT NOT NULL,
            payload TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create booking_requests table")?;

    Ok(())
}

/// Resolve the default data directory inside the user's home.
pub fn default_data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_creates_the_database_file() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let data_dir = temp.path().join("nested").join("data");

        let conn = ensure_schema(&data_dir)?;
        assert!(data_dir.join(DB_FILE_NAME).exists());

        let tables: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('preferences', 'booking_requests')",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(tables, 2);
        Ok(())
    }

    #[test]
    fn init_schema_is_idempotent() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        init_schema(&conn)?;
        Ok(())
    }
}

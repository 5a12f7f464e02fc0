//! Schema management for the Treemarks SQLite database.
//!
//! Uses a `schema_version` table to track which schema the data tables were
//! created with. There is no incremental migration: whenever the recorded
//! version differs from [`CURRENT_SCHEMA_VERSION`], the `bookmarks`,
//! `preferences` and `history` tables are dropped and recreated empty.

use log::info;
use rusqlite::Connection;

/// Current schema version. Bump this when the table layout changes.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Data tables owned by the schema, in creation order.
pub const DATA_TABLES: [&str; 3] = ["bookmarks", "preferences", "history"];

/// Returns the current schema version from the database (0 if none recorded).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Brings the database to [`CURRENT_SCHEMA_VERSION`].
///
/// Safe to call on every startup: when the recorded version already matches,
/// nothing is touched.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);
    if current == CURRENT_SCHEMA_VERSION {
        return Ok(());
    }

    if current != 0 {
        info!(
            "schema version {} does not match {}, recreating data tables",
            current, CURRENT_SCHEMA_VERSION
        );
    }
    rebuild_tables(conn)?;
    record_version(
        conn,
        CURRENT_SCHEMA_VERSION,
        "Bookmarks with parent index, preferences, bounded history",
    )
}

/// Drops and recreates every data table in one transaction.
fn rebuild_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    let tx = conn.unchecked_transaction()?;
    for table in DATA_TABLES {
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", table))?;
    }
    tx.execute_batch(
        "
        CREATE TABLE bookmarks (
            id TEXT PRIMARY KEY,
            parent_id TEXT,
            sort_order INTEGER NOT NULL DEFAULT 0,
            title TEXT NOT NULL,
            url TEXT,
            description TEXT,
            icon TEXT
        );

        CREATE INDEX idx_bookmarks_parent_id ON bookmarks(parent_id);

        CREATE TABLE preferences (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE history (
            timestamp INTEGER PRIMARY KEY,
            action TEXT NOT NULL,
            data TEXT NOT NULL
        );
        ",
    )?;
    tx.commit()
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

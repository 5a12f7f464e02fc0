use log::debug;
use rusqlite::Connection;
use std::path::Path;
use std::time::Duration;

use super::migrations;

/// How long a writer waits on a locked `treemarks.db` before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The bookmark database: one SQLite connection whose schema is brought to
/// the current version before it is handed out.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens `treemarks.db` (or any other file) and migrates it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        debug!("opening bookmark database {}", path.as_ref().display());
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::migrated(conn)
    }

    /// A throwaway database, gone once dropped.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::migrated(Connection::open_in_memory()?)
    }

    fn migrated(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    /// Borrowed by the stores, the log and the preference manager.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

//! Storage for Treemarks: one SQLite file holding the `bookmarks`,
//! `preferences` and `history` tables.
//!
//! ```no_run
//! use treemarks::database::Database;
//! use treemarks::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
//!
//! let db = Database::open("treemarks.db")?;
//! let tree = BookmarkStore::new(db.connection()).load_all()?;
//! println!("{} top-level bookmarks", tree.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;

use rusqlite::ErrorCode;

/// Returns true when `e` means the database or one of its tables cannot be
/// used at all, as opposed to a single statement failing.
pub fn is_storage_unavailable(e: &rusqlite::Error) -> bool {
    match e {
        rusqlite::Error::SqliteFailure(err, msg) => match err.code {
            ErrorCode::CannotOpen
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::PermissionDenied
            | ErrorCode::SystemIoFailure => true,
            _ => msg
                .as_deref()
                .map(|m| m.starts_with("no such table"))
                .unwrap_or(false),
        },
        rusqlite::Error::InvalidPath(_) => true,
        _ => false,
    }
}

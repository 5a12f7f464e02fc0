//! App Core for Treemarks.
//!
//! The coordinator consumed by the UI layer: owns the database, the runtime
//! configuration and the single undo cursor.

use log::info;
use rusqlite::Connection;
use std::fs;

use crate::config::StoreConfig;
use crate::database::connection::Database;
use crate::managers::undo_manager::UndoManager;
use crate::types::errors::BookmarkError;

/// Central application struct.
///
/// Store, log and preference managers borrow the connection with a lifetime
/// parameter, so they are created on demand via `app.connection()`. The
/// `UndoManager` holds no borrow and lives here so every caller shares one
/// cursor.
pub struct App {
    pub db: Database,
    pub config: StoreConfig,
    pub undo_manager: UndoManager,
}

impl App {
    /// Opens (creating if needed) the database under `config.data_dir`.
    ///
    /// # Errors
    /// Returns `BookmarkError::StorageUnavailable` if the directory or the
    /// database cannot be created or opened.
    pub fn new(config: StoreConfig) -> Result<Self, BookmarkError> {
        fs::create_dir_all(&config.data_dir).map_err(|e| {
            BookmarkError::StorageUnavailable(format!("{}: {}", config.data_dir.display(), e))
        })?;

        let path = config.db_path();
        let db = Database::open(&path).map_err(|e| {
            BookmarkError::StorageUnavailable(format!("{}: {}", path.display(), e))
        })?;
        info!("bookmark database ready at {}", path.display());

        let undo_manager = UndoManager::new(config.history_capacity);
        Ok(Self {
            db,
            config,
            undo_manager,
        })
    }

    /// An app backed by an in-memory database, for tests and demos.
    pub fn in_memory() -> Result<Self, BookmarkError> {
        let db = Database::open_in_memory()
            .map_err(|e| BookmarkError::StorageUnavailable(e.to_string()))?;
        let config = StoreConfig::default();
        let undo_manager = UndoManager::new(config.history_capacity);
        Ok(Self {
            db,
            config,
            undo_manager,
        })
    }

    pub fn connection(&self) -> &Connection {
        self.db.connection()
    }
}

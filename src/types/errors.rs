use std::fmt;

use crate::database::is_storage_unavailable;

// === BookmarkError ===

/// Errors related to the ordered bookmark store.
#[derive(Debug)]
pub enum BookmarkError {
    /// The bookmarks table could not be opened or initialized.
    StorageUnavailable(String),
    /// Bookmark with the given ID was not found.
    NotFound(String),
    /// The target parent folder was not found.
    ParentNotFound(String),
    /// The requested move would make a node its own ancestor.
    InvalidMove(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::StorageUnavailable(msg) => {
                write!(f, "Bookmark storage unavailable: {}", msg)
            }
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::ParentNotFound(id) => write!(f, "Parent bookmark not found: {}", id),
            BookmarkError::InvalidMove(msg) => write!(f, "Invalid bookmark move: {}", msg),
            BookmarkError::DatabaseError(msg) => {
                write!(f, "Bookmark database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<rusqlite::Error> for BookmarkError {
    fn from(e: rusqlite::Error) -> Self {
        if is_storage_unavailable(&e) {
            BookmarkError::StorageUnavailable(e.to_string())
        } else {
            BookmarkError::DatabaseError(e.to_string())
        }
    }
}

// === HistoryError ===

/// Errors related to the transaction history log.
#[derive(Debug)]
pub enum HistoryError {
    /// The history table could not be opened or initialized.
    StorageUnavailable(String),
    /// Database operation failed.
    DatabaseError(String),
    /// A record's payload could not be encoded or decoded.
    SerializationError(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::StorageUnavailable(msg) => {
                write!(f, "History storage unavailable: {}", msg)
            }
            HistoryError::DatabaseError(msg) => write!(f, "History database error: {}", msg),
            HistoryError::SerializationError(msg) => {
                write!(f, "History serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<rusqlite::Error> for HistoryError {
    fn from(e: rusqlite::Error) -> Self {
        if is_storage_unavailable(&e) {
            HistoryError::StorageUnavailable(e.to_string())
        } else {
            HistoryError::DatabaseError(e.to_string())
        }
    }
}

impl From<serde_json::Error> for HistoryError {
    fn from(e: serde_json::Error) -> Self {
        HistoryError::SerializationError(e.to_string())
    }
}

// === PreferenceError ===

/// Errors related to the preferences table.
#[derive(Debug)]
pub enum PreferenceError {
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for PreferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceError::DatabaseError(msg) => {
                write!(f, "Preference database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for PreferenceError {}

impl From<rusqlite::Error> for PreferenceError {
    fn from(e: rusqlite::Error) -> Self {
        PreferenceError::DatabaseError(e.to_string())
    }
}

// === UndoError ===

/// Errors surfaced while recording, undoing or redoing a mutation.
#[derive(Debug)]
pub enum UndoError {
    /// The store rejected the replayed mutation.
    Bookmark(BookmarkError),
    /// The history log could not be read or appended.
    History(HistoryError),
}

impl fmt::Display for UndoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndoError::Bookmark(e) => write!(f, "Undo failed: {}", e),
            UndoError::History(e) => write!(f, "Undo failed: {}", e),
        }
    }
}

impl std::error::Error for UndoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UndoError::Bookmark(e) => Some(e),
            UndoError::History(e) => Some(e),
        }
    }
}

impl From<BookmarkError> for UndoError {
    fn from(e: BookmarkError) -> Self {
        UndoError::Bookmark(e)
    }
}

impl From<HistoryError> for UndoError {
    fn from(e: HistoryError) -> Self {
        UndoError::History(e)
    }
}

// === ExportError ===

/// Errors related to importing or exporting the bookmark document.
#[derive(Debug)]
pub enum ExportError {
    /// The document could not be encoded or parsed.
    SerializationError(String),
    /// Reading or replacing the bookmark tree failed.
    Bookmark(BookmarkError),
    /// Reading or writing the theme preference failed.
    Preference(PreferenceError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::SerializationError(msg) => {
                write!(f, "Export serialization error: {}", msg)
            }
            ExportError::Bookmark(e) => write!(f, "Export failed: {}", e),
            ExportError::Preference(e) => write!(f, "Export failed: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::SerializationError(_) => None,
            ExportError::Bookmark(e) => Some(e),
            ExportError::Preference(e) => Some(e),
        }
    }
}

impl From<BookmarkError> for ExportError {
    fn from(e: BookmarkError) -> Self {
        ExportError::Bookmark(e)
    }
}

impl From<PreferenceError> for ExportError {
    fn from(e: PreferenceError) -> Self {
        ExportError::Preference(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::SerializationError(e.to_string())
    }
}

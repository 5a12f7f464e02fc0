//! Undo Manager for Treemarks.
//!
//! Owns the undo cursor over the transaction log and replays logged deltas
//! through the bookmark store.
//!
//! # Cursor convention
//! The log is read newest-first. `cursor` counts how many of the newest
//! entries are currently undone:
//! - undo reverse-applies `entries[cursor]` and increments the cursor;
//! - redo forward-applies `entries[cursor - 1]` and decrements it;
//! - recording a new mutation drops the undone entries from the log and
//!   resets the cursor to 0, so an abandoned branch is never replayed.
//!
//! A record whose bookmark (or target parent) no longer exists is skipped
//! with a warning, the same way unknown actions are.

use log::warn;
use rusqlite::Connection;

use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::transaction_log::{TransactionLog, TransactionLogTrait, HISTORY_CAPACITY};
use crate::types::bookmark::FlatRecord;
use crate::types::errors::{BookmarkError, HistoryError, UndoError};
use crate::types::transaction::{MoveData, ReorderData, TransactionAction, TransactionRecord};

/// Which way a logged delta is replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Replay {
    /// Restore the `old*` position (undo).
    Reverse,
    /// Re-apply the `new*` position (redo).
    Forward,
}

/// Linear undo/redo over the bounded transaction log.
#[derive(Debug, Clone)]
pub struct UndoManager {
    cursor: usize,
    capacity: usize,
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY)
    }
}

impl UndoManager {
    /// Creates an undo manager over a log of `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            cursor: 0,
            capacity: capacity.max(1),
        }
    }

    /// Number of newest log entries that are currently undone.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn log<'c>(&self, conn: &'c Connection) -> TransactionLog<'c> {
        TransactionLog::with_capacity(conn, self.capacity)
    }

    /// Returns the log, newest first, as seen by this manager.
    pub fn history(&self, conn: &Connection, limit: usize) -> Result<Vec<TransactionRecord>, UndoError> {
        Ok(self.log(conn).list(limit.min(self.capacity))?)
    }

    pub fn can_undo(&self, conn: &Connection) -> Result<bool, UndoError> {
        Ok(self.cursor < self.log(conn).len()?)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor > 0
    }

    /// Reorders `id` within its group and logs a `reorderBookmark` record.
    pub fn record_reorder(
        &mut self,
        conn: &Connection,
        id: &str,
        new_index: usize,
        parent_id: Option<&str>,
    ) -> Result<TransactionRecord, UndoError> {
        let mut store = BookmarkStore::new(conn);
        let before = require(&store, id)?;
        store.reorder(id, new_index, parent_id)?;
        let after = require(&store, id)?;

        let data = ReorderData {
            bookmark_id: id.to_string(),
            parent_id: after.parent_id,
            old_index: before.order as usize,
            new_index: after.order as usize,
        };
        let data = serde_json::to_value(data).map_err(HistoryError::from)?;
        self.append(conn, TransactionAction::ReorderBookmark, data)
    }

    /// Moves `id` to a new parent and logs a `moveBookmark` record.
    pub fn record_move(
        &mut self,
        conn: &Connection,
        id: &str,
        new_parent_id: Option<&str>,
        new_index: Option<usize>,
    ) -> Result<TransactionRecord, UndoError> {
        let mut store = BookmarkStore::new(conn);
        let before = require(&store, id)?;
        store.move_to_parent(id, new_parent_id, new_index)?;
        let after = require(&store, id)?;

        let data = MoveData {
            bookmark_id: id.to_string(),
            old_parent_id: before.parent_id,
            new_parent_id: after.parent_id,
            old_index: before.order as usize,
            new_index: after.order as usize,
        };
        let data = serde_json::to_value(data).map_err(HistoryError::from)?;
        self.append(conn, TransactionAction::MoveBookmark, data)
    }

    fn append(
        &mut self,
        conn: &Connection,
        action: TransactionAction,
        data: serde_json::Value,
    ) -> Result<TransactionRecord, UndoError> {
        let record = self.log(conn).append_superseding(action, data, self.cursor)?;
        self.cursor = 0;
        Ok(record)
    }

    /// Empties the log and resets the cursor. Used when the whole tree is
    /// replaced, since older deltas no longer describe it.
    pub fn clear_history(&mut self, conn: &Connection) -> Result<(), UndoError> {
        self.log(conn).clear()?;
        self.cursor = 0;
        Ok(())
    }

    /// Reverts the next not-yet-undone entry. Returns `None` when there is
    /// nothing left to undo.
    ///
    /// On a storage error the cursor is left where it was.
    pub fn undo(&mut self, conn: &Connection) -> Result<Option<TransactionRecord>, UndoError> {
        let entries = self.log(conn).list(self.capacity)?;
        self.cursor = self.cursor.min(entries.len());

        let Some(entry) = entries.get(self.cursor) else {
            return Ok(None);
        };
        replay_or_skip(conn, entry, Replay::Reverse)?;
        self.cursor += 1;
        Ok(Some(entry.clone()))
    }

    /// Re-applies the most recently undone entry. Returns `None` when there
    /// is nothing to redo.
    pub fn redo(&mut self, conn: &Connection) -> Result<Option<TransactionRecord>, UndoError> {
        let entries = self.log(conn).list(self.capacity)?;
        self.cursor = self.cursor.min(entries.len());

        if self.cursor == 0 {
            return Ok(None);
        }
        let entry = &entries[self.cursor - 1];
        replay_or_skip(conn, entry, Replay::Forward)?;
        self.cursor -= 1;
        Ok(Some(entry.clone()))
    }
}

fn require(store: &BookmarkStore, id: &str) -> Result<FlatRecord, BookmarkError> {
    store.get(id)?.ok_or_else(|| BookmarkError::NotFound(id.to_string()))
}

/// Like [`replay`], but a record that no longer fits the stored tree is
/// logged and treated as applied.
fn replay_or_skip(conn: &Connection, entry: &TransactionRecord, direction: Replay) -> Result<(), BookmarkError> {
    match replay(conn, entry, direction) {
        Err(
            e @ (BookmarkError::NotFound(_)
            | BookmarkError::ParentNotFound(_)
            | BookmarkError::InvalidMove(_)),
        ) => {
            warn!("skipping stale history record {}: {}", entry.timestamp, e);
            Ok(())
        }
        other => other,
    }
}

/// Applies one logged delta to the store.
///
/// Unknown tags and undecodable payloads are logged and skipped; they never
/// fail the replay.
pub fn replay(conn: &Connection, entry: &TransactionRecord, direction: Replay) -> Result<(), BookmarkError> {
    let mut store = BookmarkStore::new(conn);
    match &entry.action {
        TransactionAction::ReorderBookmark => {
            let data: ReorderData = match serde_json::from_value(entry.data.clone()) {
                Ok(d) => d,
                Err(e) => {
                    warn!("skipping reorder record {}: {}", entry.timestamp, e);
                    return Ok(());
                }
            };
            let index = match direction {
                Replay::Reverse => data.old_index,
                Replay::Forward => data.new_index,
            };
            store.reorder(&data.bookmark_id, index, data.parent_id.as_deref())
        }
        TransactionAction::MoveBookmark => {
            let data: MoveData = match serde_json::from_value(entry.data.clone()) {
                Ok(d) => d,
                Err(e) => {
                    warn!("skipping move record {}: {}", entry.timestamp, e);
                    return Ok(());
                }
            };
            let (parent, index) = match direction {
                Replay::Reverse => (data.old_parent_id, data.old_index),
                Replay::Forward => (data.new_parent_id, data.new_index),
            };
            store.move_to_parent(&data.bookmark_id, parent.as_deref(), Some(index))
        }
        TransactionAction::Other(tag) => {
            warn!("unknown history action {:?} at {}, ignoring", tag, entry.timestamp);
            Ok(())
        }
    }
}

//! Transaction Log for Treemarks.
//!
//! Implements `TransactionLogTrait`: an append-only, bounded history of
//! reorder/move deltas stored in the `history` table, used to drive undo/redo.

use log::debug;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::errors::HistoryError;
use crate::types::transaction::{TransactionAction, TransactionRecord};

/// Number of records kept in the log; older ones are evicted on append.
pub const HISTORY_CAPACITY: usize = 50;

/// Trait defining transaction log operations.
pub trait TransactionLogTrait {
    fn append(&mut self, action: TransactionAction, data: Value) -> Result<TransactionRecord, HistoryError> {
        self.append_superseding(action, data, 0)
    }
    fn append_superseding(
        &mut self,
        action: TransactionAction,
        data: Value,
        superseded: usize,
    ) -> Result<TransactionRecord, HistoryError>;
    fn clear(&mut self) -> Result<usize, HistoryError>;
    fn list(&self, limit: usize) -> Result<Vec<TransactionRecord>, HistoryError>;
    fn len(&self) -> Result<usize, HistoryError>;
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> Result<bool, HistoryError> {
        Ok(self.len()? == 0)
    }
}

/// Transaction log backed by a SQLite connection.
pub struct TransactionLog<'a> {
    conn: &'a Connection,
    capacity: usize,
}

impl<'a> TransactionLog<'a> {
    /// Creates a log holding at most [`HISTORY_CAPACITY`] records.
    pub fn new(conn: &'a Connection) -> Self {
        Self::with_capacity(conn, HISTORY_CAPACITY)
    }

    /// Creates a log holding at most `capacity` records (minimum 1).
    pub fn with_capacity(conn: &'a Connection, capacity: usize) -> Self {
        Self {
            conn,
            capacity: capacity.max(1),
        }
    }

    /// Returns the current UNIX timestamp in milliseconds.
    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}

impl<'a> TransactionLogTrait for TransactionLog<'a> {
    /// Drops the `superseded` newest records, appends one stamped with the
    /// current time and trims the log to capacity, all in one transaction.
    ///
    /// Timestamps are made strictly increasing: if the clock has not advanced
    /// past the newest record, the new one gets `newest + 1`.
    fn append_superseding(
        &mut self,
        action: TransactionAction,
        data: Value,
        superseded: usize,
    ) -> Result<TransactionRecord, HistoryError> {
        let payload = serde_json::to_string(&data)?;

        let tx = self.conn.unchecked_transaction()?;
        if superseded > 0 {
            let dropped = tx.execute(
                "DELETE FROM history WHERE timestamp IN \
                 (SELECT timestamp FROM history ORDER BY timestamp DESC LIMIT ?1)",
                params![i64::try_from(superseded).unwrap_or(i64::MAX)],
            )?;
            debug!("dropped {} undone history record(s)", dropped);
        }
        let newest: Option<i64> = tx.query_row("SELECT MAX(timestamp) FROM history", [], |row| row.get(0))?;
        let timestamp = match newest {
            Some(n) => Self::now_millis().max(n + 1),
            None => Self::now_millis(),
        };

        tx.execute(
            "INSERT INTO history (timestamp, action, data) VALUES (?1, ?2, ?3)",
            params![timestamp, action.as_str(), payload],
        )?;
        let evicted = tx.execute(
            "DELETE FROM history WHERE timestamp NOT IN \
             (SELECT timestamp FROM history ORDER BY timestamp DESC LIMIT ?1)",
            params![self.capacity as i64],
        )?;
        tx.commit()?;

        if evicted > 0 {
            debug!("history trimmed by {} record(s)", evicted);
        }
        Ok(TransactionRecord {
            timestamp,
            action,
            data,
        })
    }

    /// Returns up to `limit` of the most recent records, newest first.
    fn list(&self, limit: usize) -> Result<Vec<TransactionRecord>, HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, action, data FROM history ORDER BY timestamp DESC LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (timestamp, action, data) = row?;
            results.push(TransactionRecord {
                timestamp,
                action: TransactionAction::from(action),
                data: serde_json::from_str(&data)?,
            });
        }
        Ok(results)
    }

    fn clear(&mut self) -> Result<usize, HistoryError> {
        let removed = self.conn.execute("DELETE FROM history", [])?;
        debug!("cleared {} history record(s)", removed);
        Ok(removed)
    }

    fn len(&self) -> Result<usize, HistoryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

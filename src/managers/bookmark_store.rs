//! Bookmark Store for Treemarks.
//!
//! Implements `BookmarkStoreTrait`: the ordered-sibling store that keeps the
//! bookmark tree as flat `(id, parent_id, sort_order)` rows in SQLite via
//! `rusqlite`.
//!
//! # Invariants
//! - Every mutation runs in a single SQLite transaction; on error nothing is
//!   committed.
//! - After any mutation, each touched sibling group is numbered `0..n` with no
//!   gaps or duplicates.
//! - `move_to_parent` never leaves a non-null `parent_id` pointing at a
//!   missing record.

use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::services::tree_codec;
use crate::types::bookmark::{BookmarkFields, BookmarkNode, FlatRecord};
use crate::types::errors::BookmarkError;

const SELECT_COLUMNS: &str = "SELECT id, parent_id, sort_order, title, url, description, icon FROM bookmarks";

/// Trait defining the ordered-sibling store operations.
pub trait BookmarkStoreTrait {
    fn save_all(&mut self, tree: &[BookmarkNode]) -> Result<(), BookmarkError>;
    fn load_all(&self) -> Result<Vec<BookmarkNode>, BookmarkError>;
    fn reorder(&mut self, id: &str, new_index: usize, parent_id: Option<&str>) -> Result<(), BookmarkError>;
    fn move_to_parent(&mut self, id: &str, new_parent_id: Option<&str>, new_index: Option<usize>) -> Result<(), BookmarkError>;
    fn delete_subtree(&mut self, id: &str) -> Result<(), BookmarkError>;
    fn delete_all(&mut self) -> Result<(), BookmarkError>;
    fn add_bookmark(&mut self, parent_id: Option<&str>, fields: &BookmarkFields) -> Result<String, BookmarkError>;
    fn update_bookmark(&mut self, id: &str, fields: &BookmarkFields) -> Result<(), BookmarkError>;
    fn get(&self, id: &str) -> Result<Option<FlatRecord>, BookmarkError>;
    fn list_children(&self, parent_id: Option<&str>) -> Result<Vec<FlatRecord>, BookmarkError>;
    fn count(&self) -> Result<usize, BookmarkError>;
    fn load_records(&self) -> Result<Vec<FlatRecord>, BookmarkError>;
}

/// Ordered-sibling store backed by a SQLite connection.
pub struct BookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkStore<'a> {
    /// Creates a new `BookmarkStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Reads a single `FlatRecord` row into a struct.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<FlatRecord> {
        Ok(FlatRecord {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            order: row.get(2)?,
            title: row.get(3)?,
            url: row.get(4)?,
            description: row.get(5)?,
            icon: row.get(6)?,
        })
    }
}

fn fetch_record(conn: &Connection, id: &str) -> Result<Option<FlatRecord>, BookmarkError> {
    let record = conn
        .query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            BookmarkStore::row_to_record,
        )
        .optional()?;
    Ok(record)
}

/// Sibling group of `parent_id` in stored order. `IS` matches NULL for the root group.
fn fetch_siblings(conn: &Connection, parent_id: Option<&str>) -> Result<Vec<FlatRecord>, BookmarkError> {
    let mut stmt = conn.prepare_cached(&format!(
        "{} WHERE parent_id IS ?1 ORDER BY sort_order, id",
        SELECT_COLUMNS
    ))?;
    let rows = stmt.query_map(params![parent_id], BookmarkStore::row_to_record)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Returns `id` followed by every transitive descendant of it.
fn subtree_ids(conn: &Connection, id: &str) -> Result<Vec<String>, BookmarkError> {
    let mut stmt = conn.prepare_cached(
        "WITH RECURSIVE subtree(id) AS ( \
             SELECT ?1 \
             UNION \
             SELECT b.id FROM bookmarks b JOIN subtree s ON b.parent_id = s.id \
         ) SELECT id FROM subtree",
    )?;
    let rows = stmt.query_map(params![id], |row| row.get::<_, String>(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

/// Rewrites the group so that `ids[i]` has `parent_id` and `sort_order = i`.
fn write_group(conn: &Connection, ids: &[String], parent_id: Option<&str>) -> Result<(), BookmarkError> {
    let mut stmt =
        conn.prepare_cached("UPDATE bookmarks SET parent_id = ?1, sort_order = ?2 WHERE id = ?3")?;
    for (index, id) in ids.iter().enumerate() {
        stmt.execute(params![parent_id, index as u32, id])?;
    }
    Ok(())
}

fn group_ids(records: Vec<FlatRecord>, excluding: &str) -> Vec<String> {
    records
        .into_iter()
        .map(|r| r.id)
        .filter(|id| id != excluding)
        .collect()
}

impl<'a> BookmarkStoreTrait for BookmarkStore<'a> {
    /// Replaces the whole table with the flattened `tree`.
    fn save_all(&mut self, tree: &[BookmarkNode]) -> Result<(), BookmarkError> {
        let records = tree_codec::flatten(tree, None);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM bookmarks", [])?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO bookmarks (id, parent_id, sort_order, title, url, description, icon) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for r in &records {
                stmt.execute(params![r.id, r.parent_id, r.order, r.title, r.url, r.description, r.icon])?;
            }
        }
        tx.commit()?;
        debug!("saved {} bookmark records", records.len());
        Ok(())
    }

    /// Loads every record and rebuilds the tree. Orphans are skipped.
    fn load_all(&self) -> Result<Vec<BookmarkNode>, BookmarkError> {
        let records = self.load_records()?;
        Ok(tree_codec::reconstruct(&records))
    }

    /// Moves `id` to `new_index` within its sibling group and renumbers the group.
    ///
    /// If `id` exists but is not a child of `parent_id`, the reorder is applied
    /// to the group it actually belongs to.
    fn reorder(&mut self, id: &str, new_index: usize, parent_id: Option<&str>) -> Result<(), BookmarkError> {
        let tx = self.conn.unchecked_transaction()?;
        let record = fetch_record(&tx, id)?.ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;

        let mut siblings = fetch_siblings(&tx, parent_id)?;
        let mut group_parent = parent_id;
        if !siblings.iter().any(|r| r.id == id) {
            warn!(
                "reorder of {} named parent {:?} but it belongs to {:?}; using its stored group",
                id, parent_id, record.parent_id
            );
            group_parent = record.parent_id.as_deref();
            siblings = fetch_siblings(&tx, group_parent)?;
        }

        let mut ids = group_ids(siblings, id);
        let index = new_index.min(ids.len());
        ids.insert(index, id.to_string());
        write_group(&tx, &ids, group_parent)?;
        tx.commit()?;

        debug!("reordered {} to index {} under {:?}", id, index, group_parent);
        Ok(())
    }

    /// Moves `id` under `new_parent_id` at `new_index` (appended when `None` or
    /// past the end), renumbering both the destination and the source group.
    fn move_to_parent(
        &mut self,
        id: &str,
        new_parent_id: Option<&str>,
        new_index: Option<usize>,
    ) -> Result<(), BookmarkError> {
        let tx = self.conn.unchecked_transaction()?;
        let record = fetch_record(&tx, id)?.ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;

        if let Some(target) = new_parent_id {
            if fetch_record(&tx, target)?.is_none() {
                return Err(BookmarkError::ParentNotFound(target.to_string()));
            }
            if subtree_ids(&tx, id)?.iter().any(|d| d == target) {
                return Err(BookmarkError::InvalidMove(format!(
                    "{} cannot be moved into its own subtree ({})",
                    id, target
                )));
            }
        }

        let old_parent_id = record.parent_id;

        let mut ids = group_ids(fetch_siblings(&tx, new_parent_id)?, id);
        let index = new_index.filter(|&i| i <= ids.len()).unwrap_or(ids.len());
        ids.insert(index, id.to_string());
        write_group(&tx, &ids, new_parent_id)?;

        if old_parent_id.as_deref() != new_parent_id {
            let old_ids = group_ids(fetch_siblings(&tx, old_parent_id.as_deref())?, id);
            write_group(&tx, &old_ids, old_parent_id.as_deref())?;
        }
        tx.commit()?;

        debug!(
            "moved {} from {:?} to {:?} at index {}",
            id, old_parent_id, new_parent_id, index
        );
        Ok(())
    }

    /// Deletes `id` and all of its descendants, closing the gap left among
    /// its former siblings. Deleting a missing id is a no-op.
    fn delete_subtree(&mut self, id: &str) -> Result<(), BookmarkError> {
        let tx = self.conn.unchecked_transaction()?;
        let Some(record) = fetch_record(&tx, id)? else {
            debug!("delete of missing bookmark {} ignored", id);
            return Ok(());
        };

        let doomed = subtree_ids(&tx, id)?;
        {
            let mut stmt = tx.prepare_cached("DELETE FROM bookmarks WHERE id = ?1")?;
            for d in &doomed {
                stmt.execute(params![d])?;
            }
        }

        let parent_id = record.parent_id.as_deref();
        let survivors = group_ids(fetch_siblings(&tx, parent_id)?, id);
        write_group(&tx, &survivors, parent_id)?;
        tx.commit()?;

        debug!("deleted {} and {} descendant(s)", id, doomed.len() - 1);
        Ok(())
    }

    /// Removes every bookmark.
    fn delete_all(&mut self) -> Result<(), BookmarkError> {
        let removed = self.conn.execute("DELETE FROM bookmarks", [])?;
        debug!("deleted all {} bookmark records", removed);
        Ok(())
    }

    /// Adds a new node at the end of `parent_id`'s group. Returns the generated ID.
    fn add_bookmark(&mut self, parent_id: Option<&str>, fields: &BookmarkFields) -> Result<String, BookmarkError> {
        let tx = self.conn.unchecked_transaction()?;
        if let Some(pid) = parent_id {
            if fetch_record(&tx, pid)?.is_none() {
                return Err(BookmarkError::ParentNotFound(pid.to_string()));
            }
        }

        let position: u32 = tx.query_row(
            "SELECT COALESCE(MAX(sort_order), -1) + 1 FROM bookmarks WHERE parent_id IS ?1",
            params![parent_id],
            |row| row.get(0),
        )?;

        let id = Uuid::new_v4().to_string();
        tx.execute(
            "INSERT INTO bookmarks (id, parent_id, sort_order, title, url, description, icon) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![id, parent_id, position, fields.title, fields.url, fields.description, fields.icon],
        )?;
        tx.commit()?;

        debug!("added bookmark {} under {:?} at {}", id, parent_id, position);
        Ok(id)
    }

    /// Replaces the editable fields of an existing node.
    fn update_bookmark(&mut self, id: &str, fields: &BookmarkFields) -> Result<(), BookmarkError> {
        let affected = self.conn.execute(
            "UPDATE bookmarks SET title = ?1, url = ?2, description = ?3, icon = ?4 WHERE id = ?5",
            params![fields.title, fields.url, fields.description, fields.icon, id],
        )?;

        if affected == 0 {
            return Err(BookmarkError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<FlatRecord>, BookmarkError> {
        fetch_record(self.conn, id)
    }

    /// Lists the children of `parent_id` (root when `None`) in order.
    fn list_children(&self, parent_id: Option<&str>) -> Result<Vec<FlatRecord>, BookmarkError> {
        fetch_siblings(self.conn, parent_id)
    }

    fn count(&self) -> Result<usize, BookmarkError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Returns every stored record, grouped by parent and ordered within each group.
    fn load_records(&self) -> Result<Vec<FlatRecord>, BookmarkError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY parent_id, sort_order, id", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], Self::row_to_record)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

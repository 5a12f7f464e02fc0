//! Preference Manager for Treemarks.
//!
//! Thin key-value wrapper over the `preferences` table. The only key the
//! application uses is the UI theme.

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::errors::PreferenceError;
use crate::types::preferences::{Preference, THEME_KEY};

/// Trait defining preference operations.
pub trait PreferenceManagerTrait {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
    fn list(&self) -> Result<Vec<Preference>, PreferenceError>;

    fn get_theme(&self) -> Result<Option<String>, PreferenceError> {
        self.get(THEME_KEY)
    }

    fn set_theme(&mut self, theme: &str) -> Result<(), PreferenceError> {
        self.set(THEME_KEY, theme)
    }
}

/// Preference manager backed by a SQLite connection.
pub struct PreferenceManager<'a> {
    conn: &'a Connection,
}

impl<'a> PreferenceManager<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl<'a> PreferenceManagerTrait for PreferenceManager<'a> {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Inserts or replaces the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Preference>, PreferenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM preferences ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok(Preference {
                key: row.get(0)?,
                value: row.get(1)?,
            })
        })?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

//! Export Service: serializes the bookmark tree and theme preference into a
//! portable JSON document and restores it again.
//!
//! Document shape:
//! `{ "bookmarks": [ ...tree... ], "preferences": { "theme": "dark" } }`

use log::info;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::preference_manager::{PreferenceManager, PreferenceManagerTrait};
use crate::types::bookmark::BookmarkNode;
use crate::types::errors::ExportError;
use crate::types::preferences::ExportedPreferences;

/// The on-disk export format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(default)]
    pub bookmarks: Option<Vec<BookmarkNode>>,
    #[serde(default)]
    pub preferences: ExportedPreferences,
}

/// What an import changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Number of nodes written, counting every level of the tree.
    pub bookmarks_imported: usize,
    pub theme_applied: bool,
}

/// Trait defining import/export operations.
pub trait ExportServiceTrait {
    fn export_document(&self) -> Result<ExportDocument, ExportError>;
    fn export_json(&self) -> Result<String, ExportError>;
    fn import_document(&mut self, doc: &ExportDocument) -> Result<ImportSummary, ExportError>;
    fn import_json(&mut self, json: &str) -> Result<ImportSummary, ExportError>;
}

pub struct ExportService<'a> {
    conn: &'a Connection,
}

impl<'a> ExportService<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn count_nodes(nodes: &[BookmarkNode]) -> usize {
    nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}

impl<'a> ExportServiceTrait for ExportService<'a> {
    fn export_document(&self) -> Result<ExportDocument, ExportError> {
        let bookmarks = BookmarkStore::new(self.conn).load_all()?;
        let theme = PreferenceManager::new(self.conn).get_theme()?;
        Ok(ExportDocument {
            bookmarks: Some(bookmarks),
            preferences: ExportedPreferences { theme },
        })
    }

    /// Pretty-printed JSON of [`Self::export_document`].
    fn export_json(&self) -> Result<String, ExportError> {
        let doc = self.export_document()?;
        Ok(serde_json::to_string_pretty(&doc)?)
    }

    /// Replaces the whole tree when the document has a `bookmarks` list and
    /// stores the theme when one is given. Missing sections are left alone.
    fn import_document(&mut self, doc: &ExportDocument) -> Result<ImportSummary, ExportError> {
        let mut summary = ImportSummary {
            bookmarks_imported: 0,
            theme_applied: false,
        };

        if let Some(bookmarks) = &doc.bookmarks {
            BookmarkStore::new(self.conn).save_all(bookmarks)?;
            summary.bookmarks_imported = count_nodes(bookmarks);
        }
        if let Some(theme) = &doc.preferences.theme {
            PreferenceManager::new(self.conn).set_theme(theme)?;
            summary.theme_applied = true;
        }

        info!(
            "imported {} bookmark(s), theme applied: {}",
            summary.bookmarks_imported, summary.theme_applied
        );
        Ok(summary)
    }

    fn import_json(&mut self, json: &str) -> Result<ImportSummary, ExportError> {
        let doc: ExportDocument = serde_json::from_str(json)?;
        self.import_document(&doc)
    }
}

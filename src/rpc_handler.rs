//! RPC method handler for the Treemarks JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! store, history and preference managers via the `App` struct.

use std::sync::Mutex;

use crate::app::App;
use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::preference_manager::{PreferenceManager, PreferenceManagerTrait};
use crate::managers::transaction_log::HISTORY_CAPACITY;
use crate::services::export_service::{ExportDocument, ExportService, ExportServiceTrait};
use crate::types::bookmark::{BookmarkFields, BookmarkNode};
use crate::types::transaction::TransactionRecord;

use serde_json::{json, Value};

fn str_param<'p>(params: &'p Value, key: &str) -> Result<&'p str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

/// Missing and `null` both mean "root" / "not given".
fn opt_str_param<'p>(params: &'p Value, key: &str) -> Result<Option<&'p str>, String> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(format!("invalid {}: expected string or null", key)),
    }
}

fn opt_index_param(params: &Value, key: &str) -> Result<Option<usize>, String> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| format!("invalid {}: expected non-negative integer", key)),
    }
}

fn fields_param(params: &Value) -> Result<BookmarkFields, String> {
    let title = str_param(params, "title")?;
    if title.trim().is_empty() {
        return Err("invalid title: must not be empty".to_string());
    }
    Ok(BookmarkFields {
        title: title.to_string(),
        url: opt_str_param(params, "url")?.map(str::to_string),
        description: opt_str_param(params, "description")?.map(str::to_string),
        icon: opt_str_param(params, "icon")?.map(str::to_string),
    })
}

fn load_tree(app: &App) -> Result<Vec<BookmarkNode>, String> {
    BookmarkStore::new(app.connection())
        .load_all()
        .map_err(|e| e.to_string())
}

/// Result of an undo/redo: the replayed record plus the reloaded tree.
fn replay_result(app: &App, applied: Option<TransactionRecord>) -> Result<Value, String> {
    let bookmarks = load_tree(app)?;
    Ok(json!({
        "applied": applied,
        "cursor": app.undo_manager.cursor(),
        "bookmarks": bookmarks,
    }))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Bookmarks ───
        "bookmarks.load" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            Ok(json!(load_tree(&a)?))
        }
        "bookmarks.save" => {
            let raw = params.get("bookmarks").cloned().ok_or("missing bookmarks")?;
            let tree: Vec<BookmarkNode> =
                serde_json::from_value(raw).map_err(|e| format!("invalid bookmarks: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let App { db, undo_manager, .. } = &mut *a;
            BookmarkStore::new(db.connection())
                .save_all(&tree)
                .map_err(|e| e.to_string())?;
            undo_manager.clear_history(db.connection()).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmarks.add" => {
            let parent = opt_str_param(params, "parent_id")?;
            let fields = fields_param(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut store = BookmarkStore::new(a.connection());
            let id = store.add_bookmark(parent, &fields).map_err(|e| e.to_string())?;
            Ok(json!({"id": id, "title": fields.title, "parent_id": parent}))
        }
        "bookmarks.update" => {
            let id = str_param(params, "id")?;
            let fields = fields_param(params)?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut store = BookmarkStore::new(a.connection());
            store.update_bookmark(id, &fields).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmarks.reorder" => {
            let id = str_param(params, "id")?;
            let new_index = opt_index_param(params, "new_index")?.ok_or("missing new_index")?;
            let parent = opt_str_param(params, "parent_id")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let App { db, undo_manager, .. } = &mut *a;
            let record = undo_manager
                .record_reorder(db.connection(), id, new_index, parent)
                .map_err(|e| e.to_string())?;
            Ok(json!({"transaction": record}))
        }
        "bookmarks.move" => {
            let id = str_param(params, "id")?;
            let new_parent = opt_str_param(params, "new_parent_id")?;
            let new_index = opt_index_param(params, "new_index")?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let App { db, undo_manager, .. } = &mut *a;
            let record = undo_manager
                .record_move(db.connection(), id, new_parent, new_index)
                .map_err(|e| e.to_string())?;
            Ok(json!({"transaction": record}))
        }
        "bookmarks.delete" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let mut store = BookmarkStore::new(a.connection());
            store.delete_subtree(id).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "bookmarks.delete_all" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let App { db, undo_manager, .. } = &mut *a;
            BookmarkStore::new(db.connection())
                .delete_all()
                .map_err(|e| e.to_string())?;
            undo_manager.clear_history(db.connection()).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── History ───
        "history.list" => {
            let limit = opt_index_param(params, "limit")?.unwrap_or(HISTORY_CAPACITY);
            let a = app.lock().map_err(|e| e.to_string())?;
            let conn = a.connection();
            let items = a.undo_manager.history(conn, limit).map_err(|e| e.to_string())?;
            let can_undo = a.undo_manager.can_undo(conn).map_err(|e| e.to_string())?;
            Ok(json!({
                "items": items,
                "cursor": a.undo_manager.cursor(),
                "can_undo": can_undo,
                "can_redo": a.undo_manager.can_redo(),
            }))
        }
        "history.undo" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let applied = {
                let App { db, undo_manager, .. } = &mut *a;
                undo_manager.undo(db.connection()).map_err(|e| e.to_string())?
            };
            replay_result(&a, applied)
        }
        "history.redo" => {
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let applied = {
                let App { db, undo_manager, .. } = &mut *a;
                undo_manager.redo(db.connection()).map_err(|e| e.to_string())?
            };
            replay_result(&a, applied)
        }

        // ─── Preferences ───
        "preferences.get_theme" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let theme = PreferenceManager::new(a.connection())
                .get_theme()
                .map_err(|e| e.to_string())?;
            Ok(json!({"theme": theme}))
        }
        "preferences.set_theme" => {
            let theme = str_param(params, "theme")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            PreferenceManager::new(a.connection())
                .set_theme(theme)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Import / export ───
        "export" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let doc = ExportService::new(a.connection())
                .export_document()
                .map_err(|e| e.to_string())?;
            serde_json::to_value(doc).map_err(|e| e.to_string())
        }
        "import" => {
            let raw = params.get("document").cloned().ok_or("missing document")?;
            let doc: ExportDocument =
                serde_json::from_value(raw).map_err(|e| format!("invalid document: {}", e))?;
            let mut a = app.lock().map_err(|e| e.to_string())?;
            let App { db, undo_manager, .. } = &mut *a;
            let summary = ExportService::new(db.connection())
                .import_document(&doc)
                .map_err(|e| e.to_string())?;
            if doc.bookmarks.is_some() {
                undo_manager.clear_history(db.connection()).map_err(|e| e.to_string())?;
            }
            serde_json::to_value(summary).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

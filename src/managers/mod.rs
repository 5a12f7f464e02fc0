// Treemarks state managers
// Managers own the persisted state: the bookmark tree, preferences, the history log and the undo cursor.

pub mod bookmark_store;
pub mod preference_manager;
pub mod transaction_log;
pub mod undo_manager;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag identifying what kind of mutation a history record describes.
///
/// Tags written by other versions of the application are kept verbatim in
/// [`TransactionAction::Other`] so they survive a round trip through the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionAction {
    ReorderBookmark,
    MoveBookmark,
    Other(String),
}

impl TransactionAction {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionAction::ReorderBookmark => "reorderBookmark",
            TransactionAction::MoveBookmark => "moveBookmark",
            TransactionAction::Other(tag) => tag,
        }
    }
}

impl From<String> for TransactionAction {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "reorderBookmark" => TransactionAction::ReorderBookmark,
            "moveBookmark" => TransactionAction::MoveBookmark,
            _ => TransactionAction::Other(tag),
        }
    }
}

impl From<TransactionAction> for String {
    fn from(action: TransactionAction) -> Self {
        action.as_str().to_string()
    }
}

/// One entry of the undo/redo history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Milliseconds since the UNIX epoch; unique and strictly increasing.
    pub timestamp: i64,
    pub action: TransactionAction,
    pub data: Value,
}

/// Payload of a `reorderBookmark` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderData {
    pub bookmark_id: String,
    pub parent_id: Option<String>,
    pub old_index: usize,
    pub new_index: usize,
}

/// Payload of a `moveBookmark` record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveData {
    pub bookmark_id: String,
    pub old_parent_id: Option<String>,
    pub new_parent_id: Option<String>,
    pub old_index: usize,
    pub new_index: usize,
}

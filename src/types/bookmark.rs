use serde::{Deserialize, Serialize};

/// A bookmark or folder in tree form, as held by the caller.
///
/// A node without a `url` is a folder. `children` is always present; leaves
/// simply carry an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

impl BookmarkNode {
    /// Creates a folder node with no children.
    pub fn folder(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            description: None,
            icon: None,
            children: Vec::new(),
        }
    }

    /// Creates a leaf bookmark pointing at `url`.
    pub fn link(id: &str, title: &str, url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::folder(id, title)
        }
    }

    /// Builder-style helper that replaces the children list.
    pub fn with_children(mut self, children: Vec<BookmarkNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }

    /// Editable fields of this node, without identity or structure.
    pub fn fields(&self) -> BookmarkFields {
        BookmarkFields {
            title: self.title.clone(),
            url: self.url.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// A bookmark as stored in the `bookmarks` table: parent pointer plus order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub id: String,
    pub parent_id: Option<String>,
    pub order: u32,
    pub title: String,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// User-editable bookmark fields, as submitted by the edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFields {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl BookmarkFields {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

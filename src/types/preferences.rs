use serde::{Deserialize, Serialize};

/// Key under which the UI theme is stored in the `preferences` table.
pub const THEME_KEY: &str = "theme";

/// A single row of the `preferences` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub key: String,
    pub value: String,
}

/// Preferences section of an export document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedPreferences {
    #[serde(default)]
    pub theme: Option<String>,
}

// Treemarks platform paths for Windows
// Data: %APPDATA%/Treemarks

use std::env;
use std::path::PathBuf;

/// Returns the data directory for Treemarks on Windows.
/// `%APPDATA%/Treemarks`
pub fn get_data_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("Treemarks")
}

// Treemarks platform abstraction
// Provides the per-OS location of the bookmark database.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Returns the platform-specific data directory for Treemarks.
///
/// - **Linux**: `~/.local/share/treemarks` (or `$XDG_DATA_HOME/treemarks`)
/// - **macOS**: `~/Library/Application Support/Treemarks`
/// - **Windows**: `%APPDATA%/Treemarks`
/// - anything else: `./treemarks`
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        PathBuf::from("treemarks")
    }
}

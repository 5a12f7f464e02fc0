// Treemarks shared type definitions
// Each submodule defines types used across the store, history and RPC layers.

pub mod bookmark;
pub mod errors;
pub mod preferences;
pub mod transaction;

//! Treemarks: persistence core for a hierarchical bookmark organizer.
//!
//! Stores a bookmark tree as ordered flat records in SQLite, keeps a bounded
//! log of reorder/move operations for undo/redo, and persists preferences.
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod config;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;

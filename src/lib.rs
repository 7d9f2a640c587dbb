//! Core library surface for the CD Inventory Manager TUI application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the tests can reuse the same pieces.

pub mod models;
pub mod store;
pub mod ui;

/// Convenience re-exports for the persistence layer, typically used by
/// `main.rs` to resolve the data file and hydrate the store.
pub use store::{inventory_file_path, Inventory};

/// The primary domain type the other layers manipulate.
pub use models::Cd;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};

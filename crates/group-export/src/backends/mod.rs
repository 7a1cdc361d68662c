//! Storage backend implementations.
//!
//! - [`InMemoryBackend`] - Process-local map, always available
//! - [`sqlite::SqliteBackend`] - SQLite via `rusqlite` (feature `sqlite`)

mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryBackend;

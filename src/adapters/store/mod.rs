//! Vector store adapters.

pub mod sqlite;

pub use sqlite::SqliteVectorStore;

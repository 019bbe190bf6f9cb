//! Infrastructure adapters for the run registry and result sink.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRunStore;
pub use sqlite::SqliteRunRepository;

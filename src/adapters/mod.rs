// Adapters layer: concrete data stores and fixture loading.

pub mod memory_store;
pub mod seed;
pub mod sqlite_store;

pub use memory_store::InMemoryStore;
pub use seed::SeedData;
pub use sqlite_store::SqliteStore;

//! Document store implementations

mod in_memory;
mod qdrant;

pub use in_memory::InMemoryDocumentStore;
pub use qdrant::{QdrantConfig, QdrantDocumentStore};

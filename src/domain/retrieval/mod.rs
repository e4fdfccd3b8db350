//! Passages and the document store seam

mod passage;
mod store;

pub use passage::{format_passages, Passage, PassageSource};
pub use store::{rank_chunks, DocumentStore, RetrievedChunk};

#[cfg(test)]
pub use store::MockDocumentStore;

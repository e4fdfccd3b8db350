//! Query embedding domain trait

mod provider;

pub use provider::QueryEmbedder;

#[cfg(test)]
pub use provider::mock::MockQueryEmbedder;

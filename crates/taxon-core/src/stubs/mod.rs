//! In-memory stub implementations of the collaborator traits.
//!
//! Exact, small, and deterministic; meant for tests and for host pipelines
//! that want to exercise the core before wiring real backends. Not gated
//! behind `cfg(test)` so downstream crates can use them in their own tests.

mod embedding_stub;
mod naming_stub;
mod record_stub;
mod vector_stub;

pub use embedding_stub::DeterministicEmbedder;
pub use naming_stub::StaticNamer;
pub use record_stub::InMemoryRecordStore;
pub use vector_stub::InMemoryVectorStore;

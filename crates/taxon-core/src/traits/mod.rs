//! External collaborator interfaces.
//!
//! The core owns no storage, no index, and no language model; it consumes
//! all four concerns through these traits so that classification and
//! emergence logic stays unit-testable against the in-memory doubles in
//! [`crate::stubs`].

mod embedder;
mod naming;
mod record_store;
mod vector_store;

pub use embedder::SeedEmbedder;
pub use naming::ClusterNamer;
pub use record_store::RecordStore;
pub use vector_store::{SearchHit, VectorStore};

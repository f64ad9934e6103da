//! # taxon-core
//!
//! Embedding-space type classification and relationship discovery: given an
//! entity's embedding, decide *what kind of thing* it is and *what it might
//! be related to*, using only geometric relationships between vectors. No
//! fixed taxonomy, no hand-written classifier, no text inspection.
//!
//! Three components, invoked by a host ingestion pipeline:
//!
//! - [`classifier::TypeClassifier`] — nearest-centroid assignment with a
//!   confidence score and an ambiguity flag, plus incremental centroid
//!   refinement on commit. Runs inline on the ingestion hot path.
//! - [`discovery::RelationshipDiscoverer`] — finds members of *other*
//!   categories that are closer to a query node than to their own
//!   category's centroid. Inline or deferred, best-effort.
//! - [`emergence::TypeEmergenceDetector`] — batch reflection pass that
//!   splits an overly diffuse category in two when genuine sub-structure
//!   appears.
//!
//! Storage, nearest-neighbor indexing, and naming are external
//! collaborators behind the traits in [`traits`]; in-memory doubles live in
//! [`stubs`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use taxon_core::classifier::TypeClassifier;
//! use taxon_core::config::ClassifierConfig;
//! use taxon_core::stubs::{InMemoryRecordStore, InMemoryVectorStore};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let vectors = Arc::new(InMemoryVectorStore::new());
//! let records = Arc::new(InMemoryRecordStore::new());
//! let classifier =
//!     TypeClassifier::new(vectors, records, ClassifierConfig::for_dimension(4)).unwrap();
//!
//! // With no categories seeded yet, classification falls back rather than
//! // failing.
//! let assignment = classifier.classify(&[0.1, 0.2, 0.3, 0.4]).await.unwrap();
//! assert_eq!(assignment.category_name, "entity");
//! assert!(assignment.needs_reclassification);
//! # });
//! ```

pub mod classifier;
pub mod config;
pub mod discovery;
pub mod emergence;
pub mod error;
pub mod math;
pub mod seeding;
pub mod stubs;
pub mod traits;
pub mod types;

pub use classifier::TypeClassifier;
pub use config::{ClassifierConfig, DiscoveryConfig, EmergenceConfig, TaxonConfig};
pub use discovery::RelationshipDiscoverer;
pub use emergence::TypeEmergenceDetector;
pub use error::{TaxonError, TaxonResult};
pub use seeding::{seed_categories, CategorySeed};
pub use types::{
    Category, CategoryId, Node, NodeId, RelationshipCandidate, SplitCandidate, SubCluster,
    TypeAssignment,
};

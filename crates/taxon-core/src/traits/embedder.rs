//! Seeding embedder trait.

use async_trait::async_trait;

use crate::error::TaxonResult;

/// Embedding function consumed once at startup to bootstrap category
/// centroids from human-written descriptions. The ingestion pipeline's own
/// text embedding model implements this in production.
#[async_trait]
pub trait SeedEmbedder: Send + Sync {
    /// Embed one description into the system's shared vector space.
    async fn embed(&self, text: &str) -> TaxonResult<Vec<f32>>;
}

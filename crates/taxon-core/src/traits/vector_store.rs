//! Vector store trait: named collections with nearest-neighbor search.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TaxonResult;

/// One nearest-neighbor result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Id of the stored vector.
    pub id: Uuid,
    /// Euclidean distance from the query.
    pub distance: f32,
}

/// Opaque nearest-neighbor oracle over named vector collections.
///
/// One collection per category (see [`crate::types::Category::collection`])
/// plus the shared [`crate::config::CENTROID_COLLECTION`]. Whether the
/// backend is a flat scan, HNSW, or IVF is irrelevant to this contract;
/// distances are Euclidean and `search` returns hits in ascending distance
/// order.
///
/// Unreachable backends surface as [`crate::TaxonError::StoreUnavailable`];
/// implementations must not silently retry inside a call, since the caller
/// owns backoff policy.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace a vector in a collection. Creates the collection
    /// on first use.
    async fn upsert(&self, collection: &str, id: Uuid, vector: Vec<f32>) -> TaxonResult<()>;

    /// The `top_k` nearest vectors to `query`, ascending by distance.
    /// An unknown collection is an empty result, not an error.
    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        top_k: usize,
    ) -> TaxonResult<Vec<SearchHit>>;

    /// Fetch a single stored vector.
    async fn fetch(&self, collection: &str, id: Uuid) -> TaxonResult<Option<Vec<f32>>>;

    /// Fetch an entire collection. Used by emergence passes only; never on
    /// the ingestion hot path.
    async fn fetch_collection(&self, collection: &str) -> TaxonResult<Vec<(Uuid, Vec<f32>)>>;

    /// Remove a vector if present.
    async fn remove(&self, collection: &str, id: Uuid) -> TaxonResult<()>;
}

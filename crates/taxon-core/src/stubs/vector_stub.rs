//! In-memory exact-scan implementation of VectorStore.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::TaxonResult;
use crate::math;
use crate::traits::{SearchHit, VectorStore};

type Collections = HashMap<String, HashMap<Uuid, Vec<f32>>>;

/// Flat-scan vector store over nested HashMaps behind an `RwLock`.
///
/// Search is exact brute-force Euclidean, which doubles as the reference
/// behavior an approximate production backend is measured against.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVectorStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vectors currently in a collection. Test helper.
    pub async fn collection_len(&self, collection: &str) -> usize {
        let collections = self.collections.read().await;
        collections.get(collection).map_or(0, |c| c.len())
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, collection: &str, id: Uuid, vector: Vec<f32>) -> TaxonResult<()> {
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, vector);
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        top_k: usize,
    ) -> TaxonResult<Vec<SearchHit>> {
        let collections = self.collections.read().await;
        let Some(vectors) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        let mut hits: Vec<SearchHit> = vectors
            .iter()
            .filter(|(_, v)| v.len() == query.len())
            .map(|(id, v)| SearchHit {
                id: *id,
                distance: math::euclidean(query, v),
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn fetch(&self, collection: &str, id: Uuid) -> TaxonResult<Option<Vec<f32>>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|c| c.get(&id))
            .cloned())
    }

    async fn fetch_collection(&self, collection: &str) -> TaxonResult<Vec<(Uuid, Vec<f32>)>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|c| c.iter().map(|(id, v)| (*id, v.clone())).collect())
            .unwrap_or_default())
    }

    async fn remove(&self, collection: &str, id: Uuid) -> TaxonResult<()> {
        let mut collections = self.collections.write().await;
        if let Some(c) = collections.get_mut(collection) {
            c.remove(&id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_orders_ascending_and_truncates() {
        let store = InMemoryVectorStore::new();
        let near = Uuid::new_v4();
        let mid = Uuid::new_v4();
        let far = Uuid::new_v4();
        store.upsert("c", far, vec![5.0, 0.0]).await.unwrap();
        store.upsert("c", near, vec![0.1, 0.0]).await.unwrap();
        store.upsert("c", mid, vec![1.0, 0.0]).await.unwrap();

        let hits = store.search("c", &[0.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, near);
        assert_eq!(hits[1].id, mid);
    }

    #[tokio::test]
    async fn unknown_collection_is_empty_not_error() {
        let store = InMemoryVectorStore::new();
        assert!(store.search("nope", &[0.0], 3).await.unwrap().is_empty());
        assert!(store.fetch_collection("nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_existing() {
        let store = InMemoryVectorStore::new();
        let id = Uuid::new_v4();
        store.upsert("c", id, vec![1.0]).await.unwrap();
        store.upsert("c", id, vec![2.0]).await.unwrap();
        assert_eq!(store.fetch("c", id).await.unwrap(), Some(vec![2.0]));
        assert_eq!(store.collection_len("c").await, 1);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = InMemoryVectorStore::new();
        let id = Uuid::new_v4();
        store.upsert("c", id, vec![1.0]).await.unwrap();
        store.remove("c", id).await.unwrap();
        store.remove("c", id).await.unwrap();
        assert_eq!(store.fetch("c", id).await.unwrap(), None);
    }
}

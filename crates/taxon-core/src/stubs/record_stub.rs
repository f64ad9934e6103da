//! In-memory implementation of RecordStore.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TaxonResult;
use crate::traits::RecordStore;
use crate::types::{Category, CategoryId, Node, NodeId};

/// HashMap-backed record store behind `RwLock`s.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRecordStore {
    categories: Arc<RwLock<HashMap<CategoryId, Category>>>,
    nodes: Arc<RwLock<HashMap<NodeId, Node>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes. Test helper.
    pub async fn node_count(&self) -> usize {
        self.nodes.read().await.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_category(&self, id: CategoryId) -> TaxonResult<Option<Category>> {
        Ok(self.categories.read().await.get(&id).cloned())
    }

    async fn put_category(&self, category: Category) -> TaxonResult<()> {
        self.categories
            .write()
            .await
            .insert(category.id, category);
        Ok(())
    }

    async fn list_categories(&self) -> TaxonResult<Vec<Category>> {
        Ok(self.categories.read().await.values().cloned().collect())
    }

    async fn get_node(&self, id: NodeId) -> TaxonResult<Option<Node>> {
        Ok(self.nodes.read().await.get(&id).cloned())
    }

    async fn put_node(&self, node: Node) -> TaxonResult<()> {
        self.nodes.write().await.insert(node.id, node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_category_is_upsert() {
        let store = InMemoryRecordStore::new();
        let mut cat = Category::new("tool", vec![0.0; 2]);
        store.put_category(cat.clone()).await.unwrap();
        cat.member_count = 5;
        store.put_category(cat.clone()).await.unwrap();

        let fetched = store.get_category(cat.id).await.unwrap().unwrap();
        assert_eq!(fetched.member_count, 5);
        assert_eq!(store.list_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_records_are_none() {
        let store = InMemoryRecordStore::new();
        assert!(store
            .get_category(uuid::Uuid::new_v4())
            .await
            .unwrap()
            .is_none());
        assert!(store.get_node(uuid::Uuid::new_v4()).await.unwrap().is_none());
    }
}

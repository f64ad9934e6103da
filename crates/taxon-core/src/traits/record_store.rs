//! Graph/record store trait: persistence for Category and Node records.

use async_trait::async_trait;

use crate::error::TaxonResult;
use crate::types::{Category, CategoryId, Node, NodeId};

/// Persistent store for Category and Node records.
///
/// The core issues reads and whole-record writes; schema and migration are
/// the backend's concern. `put_*` is an upsert.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_category(&self, id: CategoryId) -> TaxonResult<Option<Category>>;

    async fn put_category(&self, category: Category) -> TaxonResult<()>;

    /// All known categories, including split ancestors.
    async fn list_categories(&self) -> TaxonResult<Vec<Category>>;

    async fn get_node(&self, id: NodeId) -> TaxonResult<Option<Node>>;

    async fn put_node(&self, node: Node) -> TaxonResult<()>;
}

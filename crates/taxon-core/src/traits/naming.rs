//! Naming collaborator trait.

use async_trait::async_trait;

use crate::error::TaxonResult;
use crate::types::NodeId;

/// Black-box label generator, LLM-backed in production.
///
/// Failures map to [`crate::TaxonError::NamingUnavailable`] and degrade
/// gracefully at the call sites: an emergence split proceeds with
/// placeholder names rather than aborting, since category structure is more
/// valuable than its label.
#[async_trait]
pub trait ClusterNamer: Send + Sync {
    /// Produce a short human-readable name for a cluster, given
    /// representative member identifiers.
    async fn name_cluster(&self, member_ids: &[NodeId]) -> TaxonResult<String>;

    /// Produce a short label for the relationship between two entities.
    async fn name_relationship(&self, source: NodeId, target: NodeId) -> TaxonResult<String>;
}

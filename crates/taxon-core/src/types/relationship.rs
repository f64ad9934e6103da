//! Cross-category relationship candidates.

use serde::{Deserialize, Serialize};

use super::{CategoryId, NodeId};

/// A node in another category that is geometrically closer to the query
/// node than to its own category's centroid.
///
/// Ephemeral: produced by the discoverer, handed to an external labeling
/// step, never persisted by this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipCandidate {
    /// The node the discovery ran for.
    pub source_node_id: NodeId,

    /// The foreign node found near it.
    pub target_node_id: NodeId,

    /// Category the target belongs to.
    pub target_category_id: CategoryId,

    /// Distance from the query embedding to the target.
    pub distance: f32,
}

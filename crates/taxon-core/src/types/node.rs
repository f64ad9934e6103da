//! Node record: one classified entity in the graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CategoryId;

/// Identifier for a node.
pub type NodeId = Uuid;

/// A classified entity. Belongs to exactly one category at a time;
/// membership changes only through explicit reclassification or an
/// emergence-split reassignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Stable identifier (UUID v4).
    pub id: NodeId,

    /// Dense embedding, fixed dimension shared across the system.
    pub embedding: Vec<f32>,

    /// Current category assignment.
    pub category_id: CategoryId,

    /// Confidence of the current assignment, in [0, 1].
    pub category_confidence: f32,

    /// Self-healing flag: set on ambiguous or low-confidence assignments
    /// and on nodes caught mid-split; cleared when a later pass assigns
    /// them with acceptable confidence.
    pub needs_reclassification: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Node {
    /// Create a node from a classifier assignment.
    pub fn new(
        embedding: Vec<f32>,
        category_id: CategoryId,
        category_confidence: f32,
        needs_reclassification: bool,
    ) -> Self {
        Self::with_id(
            Uuid::new_v4(),
            embedding,
            category_id,
            category_confidence,
            needs_reclassification,
        )
    }

    /// Create a node with a caller-chosen id (ingestion pipelines usually
    /// mint ids upstream).
    pub fn with_id(
        id: NodeId,
        embedding: Vec<f32>,
        category_id: CategoryId,
        category_confidence: f32,
        needs_reclassification: bool,
    ) -> Self {
        Self {
            id,
            embedding,
            category_id,
            category_confidence,
            needs_reclassification,
            created_at: Utc::now(),
        }
    }
}

//! Split candidates produced by the emergence detector.

use serde::{Deserialize, Serialize};

use super::{CategoryId, NodeId};

/// One half of a proposed two-way split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCluster {
    /// Mean embedding of this half's members.
    pub centroid: Vec<f32>,

    /// Members assigned to this half.
    pub member_ids: Vec<NodeId>,

    /// Mean squared distance of this half's members from its centroid.
    pub internal_dispersion: f32,
}

impl SubCluster {
    /// Number of members in this half.
    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

/// Proposal to split one diffuse category into two.
///
/// Created by `check_type`, consumed and discarded by `execute_split`.
/// `should_split` is only true when both halves are materially tighter than
/// the parent; callers must not execute a candidate with it false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitCandidate {
    /// The category under inspection.
    pub category_id: CategoryId,

    /// The parent's dispersion at inspection time.
    pub parent_dispersion: f32,

    /// The two proposed halves.
    pub sub_clusters: [SubCluster; 2],

    /// Whether the split passed the tightening acceptance test.
    pub should_split: bool,
}

//! Classifier output.

use serde::{Deserialize, Serialize};

use super::CategoryId;

/// Result of classifying one embedding against the known categories.
///
/// Always present, even when no categories exist yet (the classifier falls
/// back to the `"entity"` category rather than failing). Ambiguity and low
/// confidence both surface through `needs_reclassification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAssignment {
    /// The winning category.
    pub category_id: CategoryId,

    /// Name of the winning category at classification time.
    pub category_name: String,

    /// Confidence in [0, 1], derived from nearest-centroid distance and
    /// halved when the runner-up is too close.
    pub confidence: f32,

    /// Set on ambiguous or low-confidence assignments.
    pub needs_reclassification: bool,

    /// True when this assignment used the zero-category fallback.
    pub fallback: bool,

    /// Runner-up category and its distance, when one was considered.
    /// Diagnostic only.
    pub runner_up: Option<(CategoryId, f32)>,
}

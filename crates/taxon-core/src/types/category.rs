//! Category record: a dynamically discovered type with a centroid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TaxonError, TaxonResult};

/// Identifier for a category.
pub type CategoryId = Uuid;

/// A category (type) in the emergent taxonomy.
///
/// Categories are data records with stable IDs, not a closed enum: new ones
/// are created at runtime by seeding and by emergence splits.
///
/// # Invariants
///
/// - `centroid` is the arithmetic mean of all currently assigned member
///   embeddings (zero vector while `member_count == 0`).
/// - `member_count` and `centroid` are always updated together, under the
///   classifier's per-category writer lock.
/// - `dispersion` is the mean squared distance of members from the centroid,
///   refreshed by emergence passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Stable identifier (UUID v4).
    pub id: CategoryId,

    /// Human-readable name, produced by seeding or the naming collaborator.
    pub name: String,

    /// Mean embedding of all members.
    pub centroid: Vec<f32>,

    /// Number of member nodes currently assigned.
    pub member_count: u64,

    /// Mean squared distance of members from the centroid.
    pub dispersion: f32,

    /// Set when this category was created by splitting its parent.
    pub parent_id: Option<CategoryId>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a fresh root category with the given name and centroid.
    pub fn new(name: impl Into<String>, centroid: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            centroid,
            member_count: 0,
            dispersion: 0.0,
            parent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a child category produced by an emergence split.
    pub fn child_of(
        parent: CategoryId,
        name: impl Into<String>,
        centroid: Vec<f32>,
        member_count: u64,
        dispersion: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            centroid,
            member_count,
            dispersion,
            parent_id: Some(parent),
            created_at: Utc::now(),
        }
    }

    /// Name of the vector collection holding this category's member vectors.
    pub fn collection(&self) -> String {
        Self::collection_for(self.id)
    }

    /// Collection name for an arbitrary category id.
    pub fn collection_for(id: CategoryId) -> String {
        format!("cat_{id}")
    }

    /// Check record invariants against the configured embedding dimension.
    pub fn validate(&self, expected_dimension: usize) -> TaxonResult<()> {
        if self.centroid.len() != expected_dimension {
            return Err(TaxonError::MalformedCategory {
                id: self.id,
                reason: format!(
                    "centroid dimension {} != configured {}",
                    self.centroid.len(),
                    expected_dimension
                ),
            });
        }
        if self.centroid.iter().any(|c| !c.is_finite()) {
            return Err(TaxonError::MalformedCategory {
                id: self.id,
                reason: "centroid contains non-finite components".into(),
            });
        }
        if self.dispersion < 0.0 || !self.dispersion.is_finite() {
            return Err(TaxonError::MalformedCategory {
                id: self.id,
                reason: format!("dispersion {} out of range", self.dispersion),
            });
        }
        Ok(())
    }
}

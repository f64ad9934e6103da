//! Error types for taxon-core.
//!
//! This module defines the central error type [`TaxonError`] used throughout
//! the crate, along with the [`TaxonResult<T>`] type alias.
//!
//! Ambiguous classification is deliberately *not* an error: it is a normal,
//! flagged outcome carried on [`crate::types::TypeAssignment`].

use thiserror::Error;
use uuid::Uuid;

/// Top-level error type for taxon-core operations.
///
/// # Examples
///
/// ```rust
/// use taxon_core::TaxonError;
///
/// let error = TaxonError::DimensionMismatch { expected: 1536, actual: 768 };
/// assert!(error.to_string().contains("1536"));
/// ```
#[derive(Debug, Error)]
pub enum TaxonError {
    /// Embedding vector dimension does not match the configured dimension.
    ///
    /// A caller contract violation (mixing embeddings from different models,
    /// corrupted vector data), never retried.
    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the system was configured with
        expected: usize,
        /// Dimension actually provided
        actual: usize,
    },

    /// A category record violates its own invariants.
    ///
    /// Occurs when a stored category has an empty or wrong-dimension
    /// centroid, or a dispersion/member_count combination that cannot be
    /// valid. Configuration-class error: fail the calling operation.
    #[error("Malformed category {id}: {reason}")]
    MalformedCategory {
        /// The offending category
        id: Uuid,
        /// What was wrong with it
        reason: String,
    },

    /// A referenced category does not exist in the record store.
    #[error("Category not found: {id}")]
    CategoryNotFound {
        /// The UUID that was looked up
        id: Uuid,
    },

    /// A referenced node does not exist in the record store.
    #[error("Node not found: {id}")]
    NodeNotFound {
        /// The UUID that was looked up
        id: Uuid,
    },

    /// An emergence pass found a category with no member vectors despite a
    /// positive member count.
    #[error("Category {id} has no member vectors in collection '{collection}'")]
    EmptyCategory {
        /// The category being inspected
        id: Uuid,
        /// The vector collection that came back empty
        collection: String,
    },

    /// `execute_split` was handed a candidate the acceptance test rejected.
    ///
    /// Split candidates with `should_split == false` exist for inspection
    /// and logging only; executing one would fragment a genuinely unified
    /// category.
    #[error("Split candidate for category {id} was not accepted")]
    SplitRejected {
        /// The category the candidate belongs to
        id: Uuid,
    },

    /// The vector or record store is unreachable or timed out.
    ///
    /// Infrastructure-class: the caller may retry with backoff. The core
    /// never fabricates a centroid match to paper over this.
    #[error("Store unavailable during {operation}: {detail}")]
    StoreUnavailable {
        /// Operation that was being attempted
        operation: String,
        /// Backend-provided detail
        detail: String,
    },

    /// The naming collaborator failed or timed out.
    ///
    /// Emergence splits degrade to placeholder names on this error rather
    /// than aborting; it only propagates from the namer itself.
    #[error("Naming collaborator unavailable: {detail}")]
    NamingUnavailable {
        /// Backend-provided detail
        detail: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which field and why
        reason: String,
    },
}

/// Result alias used throughout taxon-core.
pub type TaxonResult<T> = Result<T, TaxonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_carries_context() {
        let err = TaxonError::DimensionMismatch {
            expected: 384,
            actual: 512,
        };
        assert_eq!(
            err.to_string(),
            "Invalid embedding dimension: expected 384, got 512"
        );

        let id = Uuid::new_v4();
        let err = TaxonError::CategoryNotFound { id };
        assert!(err.to_string().contains(&id.to_string()));
    }

    #[test]
    fn store_unavailable_names_the_operation() {
        let err = TaxonError::StoreUnavailable {
            operation: "centroid search".into(),
            detail: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("centroid search"));
        assert!(msg.contains("connection refused"));
    }
}

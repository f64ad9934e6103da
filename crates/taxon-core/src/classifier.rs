//! Nearest-centroid type classification.
//!
//! [`TypeClassifier`] answers "what kind of thing is this embedding" by
//! searching the centroid collection, and refines the winning category's
//! centroid once the node is durably committed. Classification runs inline
//! on the ingestion hot path, so the read path takes no locks; only
//! committers contend, and only within one category.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::{ClassifierConfig, CENTROID_COLLECTION, FALLBACK_CATEGORY_NAME};
use crate::error::{TaxonError, TaxonResult};
use crate::math;
use crate::traits::{RecordStore, SearchHit, VectorStore};
use crate::types::{Category, CategoryId, Node, NodeId, TypeAssignment};

/// Nearest-centroid classifier with incremental centroid refinement.
///
/// Holds no domain state of its own: categories and nodes live in the
/// injected stores. The only resident structure is a per-category lock map
/// that serializes same-category centroid updates while letting different
/// categories commit in parallel.
pub struct TypeClassifier<V, R> {
    vectors: Arc<V>,
    records: Arc<R>,
    config: ClassifierConfig,
    category_locks: DashMap<CategoryId, Arc<Mutex<()>>>,
    fallback_lock: Mutex<()>,
}

/// Linear confidence curve over nearest-centroid distance: 1.0 at or below
/// zero distance, 0.0 at or beyond `max_distance`.
pub fn confidence_for_distance(distance: f32, max_distance: f32) -> f32 {
    if distance <= 0.0 {
        1.0
    } else if distance >= max_distance {
        0.0
    } else {
        1.0 - distance / max_distance
    }
}

impl<V: VectorStore, R: RecordStore> TypeClassifier<V, R> {
    /// Create a classifier over the given stores. Fails on invalid config.
    pub fn new(vectors: Arc<V>, records: Arc<R>, config: ClassifierConfig) -> TaxonResult<Self> {
        config.validate()?;
        Ok(Self {
            vectors,
            records,
            config,
            category_locks: DashMap::new(),
            fallback_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify an embedding against the known category centroids.
    ///
    /// Never fails for lack of categories: with an empty taxonomy it
    /// returns (and lazily creates) the `"entity"` fallback category with
    /// confidence 0.0 and the reclassification flag set. A wrong-dimension
    /// embedding is a caller contract violation and propagates as
    /// [`TaxonError::DimensionMismatch`].
    pub async fn classify(&self, embedding: &[f32]) -> TaxonResult<TypeAssignment> {
        self.check_dimension(embedding)?;

        let hits = self
            .vectors
            .search(CENTROID_COLLECTION, embedding, self.config.top_k)
            .await?;

        let Some(nearest) = hits.first() else {
            return self.fallback_assignment().await;
        };

        let runner_up = hits.get(1);
        let (confidence, needs_reclassification) = self.score(nearest, runner_up);

        let category = self
            .records
            .get_category(nearest.id)
            .await?
            .ok_or(TaxonError::CategoryNotFound { id: nearest.id })?;

        debug!(
            category = %category.name,
            distance = nearest.distance,
            confidence,
            flagged = needs_reclassification,
            "classified embedding"
        );

        Ok(TypeAssignment {
            category_id: category.id,
            category_name: category.name,
            confidence,
            needs_reclassification,
            fallback: false,
            runner_up: runner_up.map(|h| (h.id, h.distance)),
        })
    }

    /// Map a nearest distance (and optional runner-up) to a confidence and
    /// the reclassification flag.
    ///
    /// Two independent rules feed one flag: close competition between the
    /// top two categories halves the confidence, and any confidence below
    /// the configured floor flags the node regardless of competition.
    fn score(&self, nearest: &SearchHit, runner_up: Option<&SearchHit>) -> (f32, bool) {
        let d0 = nearest.distance;
        let mut confidence = confidence_for_distance(d0, self.config.max_distance);

        let mut ambiguous = false;
        if let Some(second) = runner_up {
            if second.distance - d0 < self.config.ambiguity_ratio * d0 {
                confidence /= 2.0;
                ambiguous = true;
            }
        }

        let flagged = ambiguous || confidence < self.config.min_confidence;
        (confidence, flagged)
    }

    /// Pure incremental mean update for one new member.
    ///
    /// Must only be applied after the node is durably committed, under the
    /// category's writer lock; [`Self::commit_assignment`] does both.
    pub fn update_centroid_for_assignment(
        current_centroid: &[f32],
        member_count: u64,
        new_embedding: &[f32],
    ) -> Vec<f32> {
        math::incremental_mean(current_centroid, member_count, new_embedding)
    }

    /// Durably commit a classified node to its category.
    ///
    /// Under the category's writer lock: persists the node record, folds
    /// the embedding into the centroid, bumps `member_count` (the two
    /// always move together), and refreshes both the member collection and
    /// the centroid collection. Returns the updated category.
    pub async fn commit_assignment(
        &self,
        node_id: NodeId,
        embedding: &[f32],
        assignment: &TypeAssignment,
    ) -> TaxonResult<Category> {
        self.check_dimension(embedding)?;

        let lock = self
            .category_locks
            .entry(assignment.category_id)
            .or_default()
            .clone();
        let _guard = lock.lock().await;

        let mut category = self
            .records
            .get_category(assignment.category_id)
            .await?
            .ok_or(TaxonError::CategoryNotFound {
                id: assignment.category_id,
            })?;
        category.validate(self.config.embedding_dimension)?;

        category.centroid = Self::update_centroid_for_assignment(
            &category.centroid,
            category.member_count,
            embedding,
        );
        category.member_count += 1;

        self.records.put_category(category.clone()).await?;
        self.vectors
            .upsert(&category.collection(), node_id, embedding.to_vec())
            .await?;
        self.vectors
            .upsert(CENTROID_COLLECTION, category.id, category.centroid.clone())
            .await?;

        let node = Node::with_id(
            node_id,
            embedding.to_vec(),
            category.id,
            assignment.confidence,
            assignment.needs_reclassification,
        );
        self.records.put_node(node).await?;

        debug!(
            node = %node_id,
            category = %category.name,
            member_count = category.member_count,
            "committed assignment"
        );
        Ok(category)
    }

    fn check_dimension(&self, embedding: &[f32]) -> TaxonResult<()> {
        if embedding.len() != self.config.embedding_dimension {
            return Err(TaxonError::DimensionMismatch {
                expected: self.config.embedding_dimension,
                actual: embedding.len(),
            });
        }
        Ok(())
    }

    /// Zero-category fallback: find or create the `"entity"` category.
    async fn fallback_assignment(&self) -> TaxonResult<TypeAssignment> {
        let _guard = self.fallback_lock.lock().await;

        let existing = self
            .records
            .list_categories()
            .await?
            .into_iter()
            .find(|c| c.name == FALLBACK_CATEGORY_NAME);

        let category = match existing {
            Some(c) => c,
            None => {
                let fallback = Category::new(
                    FALLBACK_CATEGORY_NAME,
                    vec![0.0; self.config.embedding_dimension],
                );
                info!(id = %fallback.id, "created fallback category");
                self.records.put_category(fallback.clone()).await?;
                fallback
            }
        };

        Ok(TypeAssignment {
            category_id: category.id,
            category_name: category.name,
            confidence: 0.0,
            needs_reclassification: true,
            fallback: true,
            runner_up: None,
        })
    }
}

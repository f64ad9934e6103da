//! Type emergence: splitting diffuse categories when sub-structure appears.
//!
//! [`TypeEmergenceDetector`] runs strictly out-of-band (a reflection pass),
//! never on the ingestion hot path. Each pass is conservative: a category is
//! only split when k-means with k=2 produces two halves that are *both*
//! materially tighter than the parent, and every pass produces at most two
//! children. Deeper structure emerges across successive passes, keeping each
//! pass's blast radius small and auditable.
//!
//! Concurrency: no freeze lock is taken. A node committed into the parent
//! mid-split may briefly reference the stale category; it self-heals through
//! `needs_reclassification` on its next classification.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classifier::confidence_for_distance;
use crate::config::{ClassifierConfig, EmergenceConfig, CENTROID_COLLECTION};
use crate::error::{TaxonError, TaxonResult};
use crate::math;
use crate::traits::{ClusterNamer, RecordStore, VectorStore};
use crate::types::{Category, SplitCandidate, SubCluster};

/// Maximum member ids handed to the naming collaborator per cluster.
const NAMING_SAMPLE: usize = 10;

/// Watches category cohesion and promotes genuine two-way splits.
pub struct TypeEmergenceDetector<V, R, N> {
    vectors: Arc<V>,
    records: Arc<R>,
    namer: Arc<N>,
    config: EmergenceConfig,
    classifier_config: ClassifierConfig,
}

impl<V: VectorStore, R: RecordStore, N: ClusterNamer> TypeEmergenceDetector<V, R, N> {
    pub fn new(
        vectors: Arc<V>,
        records: Arc<R>,
        namer: Arc<N>,
        config: EmergenceConfig,
        classifier_config: ClassifierConfig,
    ) -> TaxonResult<Self> {
        config.validate()?;
        classifier_config.validate()?;
        Ok(Self {
            vectors,
            records,
            namer,
            config,
            classifier_config,
        })
    }

    /// Inspect one category for sub-structure.
    ///
    /// Returns `None` for cohesive categories (stored dispersion under the
    /// variance threshold) and for categories too small to split. Otherwise
    /// fetches all member vectors, re-clusters them two ways, and returns a
    /// [`SplitCandidate`] whose `should_split` records whether both halves
    /// passed the tightening acceptance test.
    pub async fn check_type(&self, category: &Category) -> TaxonResult<Option<SplitCandidate>> {
        category.validate(self.classifier_config.embedding_dimension)?;

        if category.dispersion < self.config.variance_threshold {
            debug!(
                category = %category.name,
                dispersion = category.dispersion,
                "cohesive, no emergence check needed"
            );
            return Ok(None);
        }

        let members = self.vectors.fetch_collection(&category.collection()).await?;
        if members.is_empty() && category.member_count > 0 {
            return Err(TaxonError::EmptyCategory {
                id: category.id,
                collection: category.collection(),
            });
        }
        if members.len() < 2 * self.config.min_split_size {
            debug!(
                category = %category.name,
                members = members.len(),
                "too small to split"
            );
            return Ok(None);
        }

        let embeddings: Vec<Vec<f32>> = members.iter().map(|(_, v)| v.clone()).collect();
        let Some(clustering) = math::kmeans2(&embeddings, self.config.max_iterations, self.config.seed)
        else {
            return Ok(None);
        };

        // The stored dispersion may lag behind the current membership;
        // the acceptance test uses the freshly computed value.
        let parent_dispersion = math::dispersion(&embeddings, &category.centroid);

        let mut halves: [(Vec<_>, Vec<Vec<f32>>); 2] = [(Vec::new(), Vec::new()), (Vec::new(), Vec::new())];
        for ((id, vector), &cluster) in members.iter().zip(clustering.assignments.iter()) {
            halves[cluster].0.push(*id);
            halves[cluster].1.push(vector.clone());
        }

        let sub_clusters = [0usize, 1].map(|i| {
            let (member_ids, vectors) = (halves[i].0.clone(), &halves[i].1);
            SubCluster {
                internal_dispersion: math::dispersion(vectors, &clustering.centroids[i]),
                centroid: clustering.centroids[i].clone(),
                member_ids,
            }
        });

        let tight_enough = self.config.tighten_fraction * parent_dispersion;
        let should_split = sub_clusters
            .iter()
            .all(|sc| sc.len() >= self.config.min_split_size && sc.internal_dispersion < tight_enough);

        if should_split {
            info!(
                category = %category.name,
                parent_dispersion,
                left = sub_clusters[0].len(),
                right = sub_clusters[1].len(),
                "split candidate accepted"
            );
        } else {
            debug!(
                category = %category.name,
                parent_dispersion,
                left_dispersion = sub_clusters[0].internal_dispersion,
                right_dispersion = sub_clusters[1].internal_dispersion,
                "split candidate rejected"
            );
        }

        Ok(Some(SplitCandidate {
            category_id: category.id,
            parent_dispersion,
            sub_clusters,
            should_split,
        }))
    }

    /// Promote an accepted split candidate into two child categories.
    ///
    /// Creates both children with `parent_id` set to the original category,
    /// moves member vectors into the children's collections, reassigns each
    /// member node, and retires the parent's centroid from the centroid
    /// collection so classification only targets leaves. The parent record
    /// itself is retained as an ancestor; the hierarchy stays traversable.
    ///
    /// Naming failures degrade to `<parent>-a` / `<parent>-b` placeholders;
    /// category structure is more valuable than its label.
    pub async fn execute_split(&self, candidate: SplitCandidate) -> TaxonResult<(Category, Category)> {
        if !candidate.should_split {
            return Err(TaxonError::SplitRejected {
                id: candidate.category_id,
            });
        }

        let parent = self
            .records
            .get_category(candidate.category_id)
            .await?
            .ok_or(TaxonError::CategoryNotFound {
                id: candidate.category_id,
            })?;

        let left = self
            .build_child(&parent, &candidate.sub_clusters[0], 'a')
            .await?;
        let right = self
            .build_child(&parent, &candidate.sub_clusters[1], 'b')
            .await?;

        // Leaf-only classification: the parent stops receiving new members.
        self.vectors.remove(CENTROID_COLLECTION, parent.id).await?;

        self.reassign_members(&parent, &left, &candidate.sub_clusters[0])
            .await?;
        self.reassign_members(&parent, &right, &candidate.sub_clusters[1])
            .await?;

        // The parent survives as an ancestor record with no live members.
        let mut retired = parent.clone();
        retired.member_count = 0;
        retired.dispersion = 0.0;
        self.records.put_category(retired).await?;

        info!(
            parent = %parent.name,
            left = %left.name,
            right = %right.name,
            "executed split"
        );
        Ok((left, right))
    }

    /// Recompute a category's dispersion from its current members and
    /// persist it.
    ///
    /// Ingestion-time commits move the centroid but deliberately do not
    /// recompute dispersion (that would mean fetching the whole membership
    /// on the hot path), so stored dispersion lags until a reflection pass
    /// calls this. A category with an empty collection is returned
    /// unchanged.
    pub async fn refresh_dispersion(&self, category: &Category) -> TaxonResult<Category> {
        let members = self.vectors.fetch_collection(&category.collection()).await?;
        if members.is_empty() {
            return Ok(category.clone());
        }
        let embeddings: Vec<Vec<f32>> = members.into_iter().map(|(_, v)| v).collect();
        let mut updated = category.clone();
        updated.dispersion = math::dispersion(&embeddings, &updated.centroid);
        self.records.put_category(updated.clone()).await?;
        Ok(updated)
    }

    /// Reflection-pass driver: refresh each category's dispersion, check it
    /// for sub-structure, and collect the accepted candidates. Rejected and
    /// skipped categories are logged, not returned.
    pub async fn scan(&self, categories: &[Category]) -> TaxonResult<Vec<SplitCandidate>> {
        let mut accepted = Vec::new();
        for category in categories {
            let category = self.refresh_dispersion(category).await?;
            if let Some(candidate) = self.check_type(&category).await? {
                if candidate.should_split {
                    accepted.push(candidate);
                }
            }
        }
        Ok(accepted)
    }

    /// Create one child category, named by the collaborator when it is
    /// available and by a `<parent>-<tag>` placeholder when it is not.
    async fn build_child(
        &self,
        parent: &Category,
        sub: &SubCluster,
        tag: char,
    ) -> TaxonResult<Category> {
        let sample = &sub.member_ids[..sub.member_ids.len().min(NAMING_SAMPLE)];
        let name = match self.namer.name_cluster(sample).await {
            Ok(name) => name,
            Err(err) => {
                let placeholder = format!("{}-{tag}", parent.name);
                warn!(%err, %placeholder, "naming degraded for split child");
                placeholder
            }
        };

        let child = Category::child_of(
            parent.id,
            name,
            sub.centroid.clone(),
            sub.member_ids.len() as u64,
            sub.internal_dispersion,
        );
        self.records.put_category(child.clone()).await?;
        self.vectors
            .upsert(CENTROID_COLLECTION, child.id, child.centroid.clone())
            .await?;
        Ok(child)
    }

    async fn reassign_members(
        &self,
        parent: &Category,
        child: &Category,
        sub: &SubCluster,
    ) -> TaxonResult<()> {
        for &member_id in &sub.member_ids {
            let Some(vector) = self.vectors.fetch(&parent.collection(), member_id).await? else {
                warn!(member = %member_id, "member vector vanished mid-split");
                continue;
            };
            self.vectors
                .upsert(&child.collection(), member_id, vector.clone())
                .await?;
            self.vectors.remove(&parent.collection(), member_id).await?;

            let Some(mut node) = self.records.get_node(member_id).await? else {
                warn!(member = %member_id, "member has a vector but no node record");
                continue;
            };
            let distance = math::euclidean(&vector, &child.centroid);
            node.category_id = child.id;
            node.category_confidence =
                confidence_for_distance(distance, self.classifier_config.max_distance);
            node.needs_reclassification =
                node.category_confidence < self.classifier_config.min_confidence;
            self.records.put_node(node).await?;
        }
        Ok(())
    }
}

//! Cross-category relationship discovery.
//!
//! For a freshly committed node, [`RelationshipDiscoverer`] scans every
//! *other* category for members that are geometrically closer to the node
//! than to their own category's centroid. That boundary filter is the whole
//! point: a node that merely sits near its cluster's edge is close to many
//! things and tells us nothing, while a node specifically closer to this
//! query than to its own "average member" is a genuine candidate for a
//! cross-category link.

use std::sync::Arc;

use tracing::debug;

use crate::config::DiscoveryConfig;
use crate::error::{TaxonError, TaxonResult};
use crate::math;
use crate::traits::{RecordStore, VectorStore};
use crate::types::{Category, CategoryId, NodeId, RelationshipCandidate};

/// Finds candidate cross-category relationships for one node at a time.
///
/// Output is ephemeral: candidates go to an external labeling/edge-creation
/// step, nothing is persisted here.
pub struct RelationshipDiscoverer<V, R> {
    vectors: Arc<V>,
    records: Arc<R>,
    config: DiscoveryConfig,
}

impl<V: VectorStore, R: RecordStore> RelationshipDiscoverer<V, R> {
    pub fn new(vectors: Arc<V>, records: Arc<R>, config: DiscoveryConfig) -> TaxonResult<Self> {
        config.validate()?;
        Ok(Self {
            vectors,
            records,
            config,
        })
    }

    /// Search every category other than `own_category` for members closer
    /// to `embedding` than to their own centroid.
    ///
    /// Results are ascending by distance and capped at
    /// `config.max_candidates`. The source node itself is excluded in case
    /// a stale copy of it lingers in another category's collection.
    pub async fn find_candidates(
        &self,
        source_node_id: NodeId,
        embedding: &[f32],
        own_category: CategoryId,
    ) -> TaxonResult<Vec<RelationshipCandidate>> {
        let categories = self.records.list_categories().await?;
        let mut candidates = Vec::new();
        let mut rejected = 0usize;

        for category in categories {
            if category.id == own_category || category.member_count == 0 {
                continue;
            }
            if category.centroid.len() != embedding.len() {
                return Err(TaxonError::MalformedCategory {
                    id: category.id,
                    reason: format!(
                        "centroid dimension {} != query dimension {}",
                        category.centroid.len(),
                        embedding.len()
                    ),
                });
            }

            let hits = self
                .vectors
                .search(
                    &category.collection(),
                    embedding,
                    self.config.top_k_per_category,
                )
                .await?;

            for hit in hits {
                if hit.id == source_node_id {
                    continue;
                }
                let Some(member) = self.vectors.fetch(&category.collection(), hit.id).await? else {
                    // Collection changed under us; skip the stale hit.
                    continue;
                };
                let to_own_centroid = math::euclidean(&member, &category.centroid);
                if hit.distance < to_own_centroid {
                    candidates.push(RelationshipCandidate {
                        source_node_id,
                        target_node_id: hit.id,
                        target_category_id: category.id,
                        distance: hit.distance,
                    });
                } else {
                    rejected += 1;
                }
            }
        }

        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        candidates.truncate(self.config.max_candidates);

        debug!(
            source = %source_node_id,
            kept = candidates.len(),
            rejected,
            "relationship discovery pass"
        );
        Ok(candidates)
    }
}

/// Convenience used by tests and hosts that already hold category records.
pub fn closer_to_query_than_home(member: &[f32], query: &[f32], home: &Category) -> bool {
    math::euclidean(member, query) < math::euclidean(member, &home.centroid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CENTROID_COLLECTION;
    use crate::stubs::{InMemoryRecordStore, InMemoryVectorStore};
    use uuid::Uuid;

    struct Fixture {
        discoverer: RelationshipDiscoverer<InMemoryVectorStore, InMemoryRecordStore>,
        vectors: Arc<InMemoryVectorStore>,
        records: Arc<InMemoryRecordStore>,
    }

    async fn fixture() -> Fixture {
        let vectors = Arc::new(InMemoryVectorStore::new());
        let records = Arc::new(InMemoryRecordStore::new());
        let discoverer = RelationshipDiscoverer::new(
            Arc::clone(&vectors),
            Arc::clone(&records),
            DiscoveryConfig::default(),
        )
        .unwrap();
        Fixture {
            discoverer,
            vectors,
            records,
        }
    }

    async fn add_category(f: &Fixture, name: &str, centroid: Vec<f32>, members: &[Vec<f32>]) -> (CategoryId, Vec<Uuid>) {
        let mut cat = Category::new(name, centroid.clone());
        cat.member_count = members.len() as u64;
        let mut ids = Vec::new();
        for member in members {
            let id = Uuid::new_v4();
            f.vectors
                .upsert(&cat.collection(), id, member.clone())
                .await
                .unwrap();
            ids.push(id);
        }
        f.vectors
            .upsert(CENTROID_COLLECTION, cat.id, centroid)
            .await
            .unwrap();
        f.records.put_category(cat.clone()).await.unwrap();
        (cat.id, ids)
    }

    #[tokio::test]
    async fn keeps_members_closer_to_query_than_home() {
        let f = fixture().await;
        let (own, _) = add_category(&f, "own", vec![0.0, 0.0], &[vec![0.0, 0.0]]).await;
        // Foreign category centered far away, with one member pulled toward
        // the query at the origin and one sitting on the centroid.
        let (foreign, member_ids) = add_category(
            &f,
            "foreign",
            vec![10.0, 0.0],
            &[vec![1.0, 0.0], vec![10.0, 0.0]],
        )
        .await;

        let source = Uuid::new_v4();
        let candidates = f
            .discoverer
            .find_candidates(source, &[0.0, 0.0], own)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].target_node_id, member_ids[0]);
        assert_eq!(candidates[0].target_category_id, foreign);
        assert_eq!(candidates[0].source_node_id, source);
    }

    #[tokio::test]
    async fn rejects_boundary_members() {
        let f = fixture().await;
        let (own, _) = add_category(&f, "own", vec![0.0, 0.0], &[vec![0.0, 0.0]]).await;
        // Member at [4, 0]: distance 4 to the query, distance 1 to its own
        // centroid at [5, 0]. Near the boundary but still home-loyal.
        add_category(&f, "foreign", vec![5.0, 0.0], &[vec![4.0, 0.0]]).await;

        let candidates = f
            .discoverer
            .find_candidates(Uuid::new_v4(), &[0.0, 0.0], own)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn own_category_is_never_searched() {
        let f = fixture().await;
        // The query's own category contains a member sitting exactly on the
        // query; it must not be surfaced.
        let (own, _) = add_category(&f, "own", vec![1.0, 1.0], &[vec![0.0, 0.0]]).await;

        let candidates = f
            .discoverer
            .find_candidates(Uuid::new_v4(), &[0.0, 0.0], own)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn results_sorted_ascending_and_capped() {
        let f = fixture().await;
        let (own, _) = add_category(&f, "own", vec![0.0, 0.0], &[vec![0.0, 0.0]]).await;
        // All members closer to the origin query than to their distant
        // centroid.
        add_category(
            &f,
            "foreign",
            vec![100.0, 0.0],
            &[vec![3.0, 0.0], vec![1.0, 0.0], vec![2.0, 0.0]],
        )
        .await;

        let candidates = f
            .discoverer
            .find_candidates(Uuid::new_v4(), &[0.0, 0.0], own)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 3);
        assert!(candidates[0].distance <= candidates[1].distance);
        assert!(candidates[1].distance <= candidates[2].distance);
    }

    #[test]
    fn boundary_predicate_matches_rule() {
        let home = Category::new("h", vec![5.0, 0.0]);
        assert!(closer_to_query_than_home(
            &[1.0, 0.0],
            &[0.0, 0.0],
            &home
        ));
        assert!(!closer_to_query_than_home(
            &[4.9, 0.0],
            &[0.0, 0.0],
            &home
        ));
    }

    #[tokio::test]
    async fn empty_categories_are_skipped() {
        let f = fixture().await;
        let (own, _) = add_category(&f, "own", vec![0.0, 0.0], &[vec![0.0, 0.0]]).await;
        add_category(&f, "empty", vec![1.0, 0.0], &[]).await;

        let candidates = f
            .discoverer
            .find_candidates(Uuid::new_v4(), &[0.0, 0.0], own)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }
}

//! Startup seeding of initial category centroids.
//!
//! The taxonomy is dynamic, but it does not start from nothing: the host
//! pipeline supplies a handful of human-written category descriptions once
//! at startup, and each description's embedding becomes that category's
//! starting centroid. From then on the centroids drift with their members.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{ClassifierConfig, CENTROID_COLLECTION};
use crate::error::{TaxonError, TaxonResult};
use crate::traits::{RecordStore, SeedEmbedder, VectorStore};
use crate::types::Category;

/// One seed: a category name plus the description to embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySeed {
    pub name: String,
    pub description: String,
}

impl CategorySeed {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Bootstrap categories from described seeds.
///
/// Each created category starts with `member_count` 0 and its centroid set
/// to the embedded description; the centroid is upserted into the shared
/// centroid collection so classification can see it immediately. An
/// embedder returning the wrong dimension is a configuration error.
pub async fn seed_categories<E, V, R>(
    seeds: &[CategorySeed],
    embedder: &E,
    vectors: &V,
    records: &R,
    config: &ClassifierConfig,
) -> TaxonResult<Vec<Category>>
where
    E: SeedEmbedder,
    V: VectorStore,
    R: RecordStore,
{
    config.validate()?;
    let mut created = Vec::with_capacity(seeds.len());
    for seed in seeds {
        let centroid = embedder.embed(&seed.description).await?;
        if centroid.len() != config.embedding_dimension {
            return Err(TaxonError::DimensionMismatch {
                expected: config.embedding_dimension,
                actual: centroid.len(),
            });
        }

        let category = Category::new(seed.name.clone(), centroid.clone());
        records.put_category(category.clone()).await?;
        vectors
            .upsert(CENTROID_COLLECTION, category.id, centroid)
            .await?;
        created.push(category);
    }
    info!(count = created.len(), "seeded initial categories");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TypeClassifier;
    use crate::stubs::{DeterministicEmbedder, InMemoryRecordStore, InMemoryVectorStore};
    use std::sync::Arc;

    const DIM: usize = 16;

    #[tokio::test]
    async fn seeds_become_searchable_categories() {
        let vectors = Arc::new(InMemoryVectorStore::new());
        let records = Arc::new(InMemoryRecordStore::new());
        let embedder = DeterministicEmbedder::new(DIM);
        let config = ClassifierConfig::for_dimension(DIM);

        let seeds = vec![
            CategorySeed::new("person", "a human being"),
            CategorySeed::new("place", "a physical location"),
        ];
        let created = seed_categories(&seeds, &embedder, &*vectors, &*records, &config)
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert!(created.iter().all(|c| c.member_count == 0));
        assert_eq!(records.list_categories().await.unwrap().len(), 2);
        assert_eq!(vectors.collection_len(CENTROID_COLLECTION).await, 2);
    }

    #[tokio::test]
    async fn seed_description_classifies_to_its_own_category() {
        let vectors = Arc::new(InMemoryVectorStore::new());
        let records = Arc::new(InMemoryRecordStore::new());
        let embedder = DeterministicEmbedder::new(DIM);
        let config = ClassifierConfig::for_dimension(DIM);

        let seeds = vec![
            CategorySeed::new("person", "a human being"),
            CategorySeed::new("place", "a physical location"),
        ];
        let created = seed_categories(&seeds, &embedder, &*vectors, &*records, &config)
            .await
            .unwrap();

        let classifier =
            TypeClassifier::new(Arc::clone(&vectors), Arc::clone(&records), config).unwrap();
        let embedding = embedder.embed("a human being").await.unwrap();
        let assignment = classifier.classify(&embedding).await.unwrap();

        assert_eq!(assignment.category_id, created[0].id);
        assert_eq!(assignment.confidence, 1.0);
    }

    #[tokio::test]
    async fn wrong_dimension_embedder_is_rejected() {
        let vectors = InMemoryVectorStore::new();
        let records = InMemoryRecordStore::new();
        let embedder = DeterministicEmbedder::new(DIM + 1);
        let config = ClassifierConfig::for_dimension(DIM);

        let err = seed_categories(
            &[CategorySeed::new("person", "a human being")],
            &embedder,
            &vectors,
            &records,
            &config,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TaxonError::DimensionMismatch { .. }));
    }
}

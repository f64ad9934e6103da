//! Configuration for classification, discovery, and emergence.
//!
//! All tunables live here rather than as hard-coded constants; the right
//! values depend on the statistics of the embedding space in use and are
//! expected to be calibrated empirically by the host pipeline. Every struct
//! is serde-compatible so the host can deserialize it from whatever config
//! surface it owns.

use serde::{Deserialize, Serialize};

use crate::error::{TaxonError, TaxonResult};

/// Name of the vector collection holding one centroid per live category.
pub const CENTROID_COLLECTION: &str = "type_centroids";

/// Name given to the fallback category created when classification runs
/// before any category has been seeded.
pub const FALLBACK_CATEGORY_NAME: &str = "entity";

/// Tunables for [`crate::classifier::TypeClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Embedding dimension shared across the whole system.
    pub embedding_dimension: usize,

    /// How many nearest centroids to retrieve per classification.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Distance at or beyond which confidence bottoms out at 0.0.
    /// 2.0 is the diameter of the unit sphere, suitable for normalized
    /// embeddings under Euclidean distance.
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,

    /// If the runner-up centroid is within `ambiguity_ratio * d0` of the
    /// winner's distance `d0`, the assignment is ambiguous: confidence is
    /// halved and the node is flagged for reclassification.
    #[serde(default = "default_ambiguity_ratio")]
    pub ambiguity_ratio: f32,

    /// Assignments below this confidence are flagged for reclassification.
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

fn default_top_k() -> usize {
    3
}
fn default_max_distance() -> f32 {
    2.0
}
fn default_ambiguity_ratio() -> f32 {
    0.2
}
fn default_min_confidence() -> f32 {
    0.5
}

impl ClassifierConfig {
    /// Config for a given embedding dimension with default tunables.
    pub fn for_dimension(embedding_dimension: usize) -> Self {
        Self {
            embedding_dimension,
            top_k: default_top_k(),
            max_distance: default_max_distance(),
            ambiguity_ratio: default_ambiguity_ratio(),
            min_confidence: default_min_confidence(),
        }
    }

    /// Validate invariants. Returns [`TaxonError::InvalidConfig`] on the
    /// first violation found.
    pub fn validate(&self) -> TaxonResult<()> {
        if self.embedding_dimension == 0 {
            return Err(TaxonError::InvalidConfig {
                reason: "embedding_dimension must be > 0".into(),
            });
        }
        if self.top_k == 0 {
            return Err(TaxonError::InvalidConfig {
                reason: "top_k must be > 0".into(),
            });
        }
        if self.max_distance <= 0.0 || !self.max_distance.is_finite() {
            return Err(TaxonError::InvalidConfig {
                reason: format!("max_distance must be positive, got {}", self.max_distance),
            });
        }
        if !(0.0..1.0).contains(&self.ambiguity_ratio) || self.ambiguity_ratio == 0.0 {
            return Err(TaxonError::InvalidConfig {
                reason: format!(
                    "ambiguity_ratio must be in (0, 1), got {}",
                    self.ambiguity_ratio
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(TaxonError::InvalidConfig {
                reason: format!(
                    "min_confidence must be in [0, 1], got {}",
                    self.min_confidence
                ),
            });
        }
        Ok(())
    }
}

/// Tunables for [`crate::discovery::RelationshipDiscoverer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Neighbors to retrieve from each foreign category's collection.
    #[serde(default = "default_discovery_top_k")]
    pub top_k_per_category: usize,

    /// Cap on the total number of candidates returned from one query.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

fn default_discovery_top_k() -> usize {
    5
}
fn default_max_candidates() -> usize {
    20
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            top_k_per_category: default_discovery_top_k(),
            max_candidates: default_max_candidates(),
        }
    }
}

impl DiscoveryConfig {
    pub fn validate(&self) -> TaxonResult<()> {
        if self.top_k_per_category == 0 || self.max_candidates == 0 {
            return Err(TaxonError::InvalidConfig {
                reason: "discovery top_k_per_category and max_candidates must be > 0".into(),
            });
        }
        Ok(())
    }
}

/// Tunables for [`crate::emergence::TypeEmergenceDetector`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergenceConfig {
    /// Dispersion (mean squared distance from centroid) above which a
    /// category is considered diffuse enough to inspect for sub-structure.
    #[serde(default = "default_variance_threshold")]
    pub variance_threshold: f32,

    /// A split is accepted only if *both* sub-clusters' internal dispersion
    /// falls below this fraction of the parent's dispersion.
    #[serde(default = "default_tighten_fraction")]
    pub tighten_fraction: f32,

    /// Minimum members each sub-cluster must have for a split to be genuine.
    #[serde(default = "default_min_split_size")]
    pub min_split_size: usize,

    /// Iteration cap for Lloyd's algorithm.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// RNG seed for k-means initialization. Fixed so emergence passes are
    /// reproducible and testable.
    #[serde(default)]
    pub seed: u64,
}

fn default_variance_threshold() -> f32 {
    0.35
}
fn default_tighten_fraction() -> f32 {
    0.75
}
fn default_min_split_size() -> usize {
    2
}
fn default_max_iterations() -> usize {
    50
}

impl Default for EmergenceConfig {
    fn default() -> Self {
        Self {
            variance_threshold: default_variance_threshold(),
            tighten_fraction: default_tighten_fraction(),
            min_split_size: default_min_split_size(),
            max_iterations: default_max_iterations(),
            seed: 0,
        }
    }
}

impl EmergenceConfig {
    pub fn validate(&self) -> TaxonResult<()> {
        if self.variance_threshold <= 0.0 || !self.variance_threshold.is_finite() {
            return Err(TaxonError::InvalidConfig {
                reason: format!(
                    "variance_threshold must be positive, got {}",
                    self.variance_threshold
                ),
            });
        }
        if !(0.0..1.0).contains(&self.tighten_fraction) || self.tighten_fraction == 0.0 {
            return Err(TaxonError::InvalidConfig {
                reason: format!(
                    "tighten_fraction must be in (0, 1), got {}",
                    self.tighten_fraction
                ),
            });
        }
        if self.min_split_size == 0 {
            return Err(TaxonError::InvalidConfig {
                reason: "min_split_size must be > 0".into(),
            });
        }
        if self.max_iterations == 0 {
            return Err(TaxonError::InvalidConfig {
                reason: "max_iterations must be > 0".into(),
            });
        }
        Ok(())
    }
}

/// Aggregate configuration for the whole core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonConfig {
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub emergence: EmergenceConfig,
}

impl TaxonConfig {
    /// Default tunables for a given embedding dimension.
    pub fn for_dimension(embedding_dimension: usize) -> Self {
        Self {
            classifier: ClassifierConfig::for_dimension(embedding_dimension),
            discovery: DiscoveryConfig::default(),
            emergence: EmergenceConfig::default(),
        }
    }

    pub fn validate(&self) -> TaxonResult<()> {
        self.classifier.validate()?;
        self.discovery.validate()?;
        self.emergence.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(TaxonConfig::for_dimension(384).validate().is_ok());
    }

    #[test]
    fn zero_dimension_rejected() {
        let cfg = ClassifierConfig::for_dimension(0);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn max_distance_must_be_positive() {
        let mut cfg = ClassifierConfig::for_dimension(8);
        cfg.max_distance = 0.0;
        assert!(cfg.validate().is_err());
        cfg.max_distance = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn ambiguity_ratio_bounds() {
        let mut cfg = ClassifierConfig::for_dimension(8);
        cfg.ambiguity_ratio = 0.0;
        assert!(cfg.validate().is_err());
        cfg.ambiguity_ratio = 1.0;
        assert!(cfg.validate().is_err());
        cfg.ambiguity_ratio = 0.2;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn emergence_tighten_fraction_bounds() {
        let mut cfg = EmergenceConfig::default();
        cfg.tighten_fraction = 1.0;
        assert!(cfg.validate().is_err());
        cfg.tighten_fraction = 0.75;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_serde() {
        let cfg = TaxonConfig::for_dimension(1536);
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TaxonConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}

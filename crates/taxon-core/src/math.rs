//! Vector math shared by the classifier, discoverer, and emergence detector.
//!
//! Everything here is pure and synchronous: no store I/O belongs in these
//! routines, so the async boundaries stay at the component edges.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Euclidean distance between two equal-length vectors.
pub fn euclidean(a: &[f32], b: &[f32]) -> f32 {
    squared_euclidean(a, b).sqrt()
}

/// Squared Euclidean distance. Cheaper when only ordering matters.
pub fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Arithmetic mean of a set of vectors. Returns `None` for an empty set.
pub fn mean(vectors: &[Vec<f32>]) -> Option<Vec<f32>> {
    let first = vectors.first()?;
    let dim = first.len();
    let mut acc = vec![0.0f32; dim];
    for v in vectors {
        for (a, x) in acc.iter_mut().zip(v.iter()) {
            *a += x;
        }
    }
    let n = vectors.len() as f32;
    for a in acc.iter_mut() {
        *a /= n;
    }
    Some(acc)
}

/// Mean squared distance of a set of vectors from a center point.
///
/// This is the dispersion measure used to gate emergence: 0.0 for an empty
/// or single-point set centered on itself.
pub fn dispersion(vectors: &[Vec<f32>], center: &[f32]) -> f32 {
    if vectors.is_empty() {
        return 0.0;
    }
    let total: f32 = vectors.iter().map(|v| squared_euclidean(v, center)).sum();
    total / vectors.len() as f32
}

/// Incremental mean update: fold one new vector into a running centroid.
///
/// `new[i] = (centroid[i] * count + embedding[i]) / (count + 1)`
///
/// The caller is responsible for serializing concurrent updates to the same
/// centroid; this function is pure.
pub fn incremental_mean(centroid: &[f32], count: u64, embedding: &[f32]) -> Vec<f32> {
    debug_assert_eq!(centroid.len(), embedding.len());
    let n = count as f32;
    centroid
        .iter()
        .zip(embedding.iter())
        .map(|(c, e)| (c * n + e) / (n + 1.0))
        .collect()
}

/// Outcome of a two-way k-means pass.
#[derive(Debug, Clone)]
pub struct TwoMeans {
    /// The two cluster centers.
    pub centroids: [Vec<f32>; 2],
    /// Cluster index (0 or 1) per input vector, in input order.
    pub assignments: Vec<usize>,
}

/// Lloyd's algorithm with k fixed at 2.
///
/// Initialization picks a seeded random point and then the point farthest
/// from it, which for two clusters behaves like k-means++ without the
/// sampling machinery and stays deterministic under a fixed `seed`.
///
/// Returns `None` when fewer than two vectors are supplied.
pub fn kmeans2(data: &[Vec<f32>], max_iterations: usize, seed: u64) -> Option<TwoMeans> {
    if data.len() < 2 {
        return None;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let first = rng.gen_range(0..data.len());
    let second = data
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| {
            let da = squared_euclidean(a, &data[first]);
            let db = squared_euclidean(b, &data[first]);
            da.total_cmp(&db)
        })
        .map(|(i, _)| i)?;

    let mut centroids = [data[first].clone(), data[second].clone()];
    let mut assignments = vec![0usize; data.len()];

    for _ in 0..max_iterations {
        let mut changed = 0usize;
        for (idx, vector) in data.iter().enumerate() {
            let d0 = squared_euclidean(vector, &centroids[0]);
            let d1 = squared_euclidean(vector, &centroids[1]);
            let best = usize::from(d1 < d0);
            if assignments[idx] != best {
                assignments[idx] = best;
                changed += 1;
            }
        }
        if changed == 0 {
            break;
        }
        recompute_two_centroids(data, &assignments, &mut centroids);
    }

    Some(TwoMeans {
        centroids,
        assignments,
    })
}

fn recompute_two_centroids(
    data: &[Vec<f32>],
    assignments: &[usize],
    centroids: &mut [Vec<f32>; 2],
) {
    let dim = centroids[0].len();
    let mut sums = [vec![0.0f32; dim], vec![0.0f32; dim]];
    let mut counts = [0usize; 2];
    for (vector, &cluster) in data.iter().zip(assignments.iter()) {
        counts[cluster] += 1;
        for (a, x) in sums[cluster].iter_mut().zip(vector.iter()) {
            *a += x;
        }
    }
    for cluster in 0..2 {
        // A starved cluster keeps its previous center instead of collapsing
        // onto NaN.
        if counts[cluster] == 0 {
            continue;
        }
        let n = counts[cluster] as f32;
        for a in sums[cluster].iter_mut() {
            *a /= n;
        }
        centroids[cluster] = std::mem::take(&mut sums[cluster]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_matches_hand_computation() {
        let a = vec![0.0, 0.0];
        let b = vec![3.0, 4.0];
        assert!((euclidean(&a, &b) - 5.0).abs() < 1e-6);
        assert!((squared_euclidean(&a, &b) - 25.0).abs() < 1e-6);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn mean_averages_componentwise() {
        let m = mean(&[vec![1.0, 0.0], vec![3.0, 2.0]]).unwrap();
        assert_eq!(m, vec![2.0, 1.0]);
    }

    #[test]
    fn dispersion_zero_for_coincident_points() {
        let vs = vec![vec![0.5, 0.5]; 4];
        assert_eq!(dispersion(&vs, &[0.5, 0.5]), 0.0);
    }

    #[test]
    fn incremental_mean_folds_one_vector_into_ten() {
        let centroid = vec![0.0; 16];
        let embedding = vec![1.0; 16];
        let updated = incremental_mean(&centroid, 10, &embedding);
        for c in updated {
            assert!((c - 1.0 / 11.0).abs() < 1e-6);
        }
    }

    #[test]
    fn incremental_mean_from_empty_category_is_the_embedding() {
        let updated = incremental_mean(&[0.0, 0.0], 0, &[0.3, -0.7]);
        assert_eq!(updated, vec![0.3, -0.7]);
    }

    #[test]
    fn kmeans2_needs_two_points() {
        assert!(kmeans2(&[vec![1.0]], 10, 0).is_none());
        assert!(kmeans2(&[], 10, 0).is_none());
    }

    #[test]
    fn kmeans2_separates_two_blobs() {
        let mut data = Vec::new();
        for i in 0..10 {
            let jitter = i as f32 * 0.001;
            data.push(vec![0.0 + jitter, 0.0]);
            data.push(vec![10.0 + jitter, 10.0]);
        }
        let result = kmeans2(&data, 50, 42).unwrap();
        // Even indices were the low blob, odd the high one; all members of
        // one blob must share an assignment distinct from the other blob's.
        let low = result.assignments[0];
        let high = result.assignments[1];
        assert_ne!(low, high);
        for (i, &a) in result.assignments.iter().enumerate() {
            assert_eq!(a, if i % 2 == 0 { low } else { high });
        }
    }

    #[test]
    fn kmeans2_is_deterministic_for_fixed_seed() {
        let data: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32, (i * i) as f32]).collect();
        let a = kmeans2(&data, 25, 7).unwrap();
        let b = kmeans2(&data, 25, 7).unwrap();
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.centroids[0], b.centroids[0]);
        assert_eq!(a.centroids[1], b.centroids[1]);
    }
}

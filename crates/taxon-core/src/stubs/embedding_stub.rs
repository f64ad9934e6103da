//! Deterministic embedder stub for seeding tests.

use async_trait::async_trait;

use crate::error::TaxonResult;
use crate::traits::SeedEmbedder;

/// Maps text to a unit vector derived from an FNV-1a fold of its bytes.
///
/// Not semantically meaningful; it only guarantees that equal inputs embed
/// identically and distinct inputs almost always land apart, which is all
/// seeding tests need.
#[derive(Debug, Clone)]
pub struct DeterministicEmbedder {
    dimension: usize,
}

impl DeterministicEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

#[async_trait]
impl SeedEmbedder for DeterministicEmbedder {
    async fn embed(&self, text: &str) -> TaxonResult<Vec<f32>> {
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        let mut out = Vec::with_capacity(self.dimension);
        let bytes = text.as_bytes();
        for i in 0..self.dimension {
            for &b in bytes {
                state ^= u64::from(b).wrapping_add(i as u64);
                state = state.wrapping_mul(0x0000_0100_0000_01b3);
            }
            // Spread into [-1, 1).
            out.push(((state >> 11) as f32 / (1u64 << 53) as f32) * 2.0 - 1.0);
        }
        let norm: f32 = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in out.iter_mut() {
                *x /= norm;
            }
        }
        Ok(out)
    }
}

//! Deterministic test double for the naming collaborator.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{TaxonError, TaxonResult};
use crate::traits::ClusterNamer;
use crate::types::NodeId;

/// Returns canned labels, or a `NamingUnavailable` error when constructed
/// with [`StaticNamer::failing`]. Counts cluster-naming calls so tests can
/// assert the namer was (or was not) consulted.
#[derive(Debug, Default)]
pub struct StaticNamer {
    fail: bool,
    cluster_calls: AtomicUsize,
}

impl StaticNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A namer whose every call fails, for exercising degraded paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            cluster_calls: AtomicUsize::new(0),
        }
    }

    pub fn cluster_calls(&self) -> usize {
        self.cluster_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ClusterNamer for StaticNamer {
    async fn name_cluster(&self, member_ids: &[NodeId]) -> TaxonResult<String> {
        self.cluster_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(TaxonError::NamingUnavailable {
                detail: "stub configured to fail".into(),
            });
        }
        Ok(format!("cluster-of-{}", member_ids.len()))
    }

    async fn name_relationship(&self, _source: NodeId, _target: NodeId) -> TaxonResult<String> {
        if self.fail {
            return Err(TaxonError::NamingUnavailable {
                detail: "stub configured to fail".into(),
            });
        }
        Ok("related-to".to_string())
    }
}

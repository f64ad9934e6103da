//! Domain types for the typing core.
//!
//! Category and Node records are owned by the external record store; the
//! value types ([`TypeAssignment`], [`RelationshipCandidate`],
//! [`SplitCandidate`]) are ephemeral outputs of a single pass.

mod assignment;
mod category;
mod node;
mod relationship;
mod split;

pub use assignment::TypeAssignment;
pub use category::{Category, CategoryId};
pub use node::{Node, NodeId};
pub use relationship::RelationshipCandidate;
pub use split::{SplitCandidate, SubCluster};

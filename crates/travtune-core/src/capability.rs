//! Capability oracle: which traversals a container can run.

use std::collections::HashSet;

use crate::configuration::{Container, TraversalKind};

/// Maps a container to the set of traversals it is physically able to run.
///
/// Queried only during search-space construction; a host may supply its own
/// implementation to describe a custom container/traversal pairing.
pub trait CapabilityOracle {
    /// Returns the traversals compatible with `container`.
    fn compatible_traversals(&self, container: Container) -> HashSet<TraversalKind>;
}

/// The built-in capability table covering the traversal families in this
/// crate's enumerations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCapabilityOracle;

impl CapabilityOracle for DefaultCapabilityOracle {
    fn compatible_traversals(&self, container: Container) -> HashSet<TraversalKind> {
        use Container::*;
        use TraversalKind::*;

        match container {
            DirectSum => [DirectSumTraversal].into_iter().collect(),
            LinkedCells => [C01, C04, C08, C18, Sliced, SlicedC02].into_iter().collect(),
            VerletLists | VerletListsCells | PairwiseVerletLists => {
                [VerletTraversal].into_iter().collect()
            }
            VerletClusterLists => [VerletClusterCells].into_iter().collect(),
            Octree => [OctreeDfs].into_iter().collect(),
        }
    }
}

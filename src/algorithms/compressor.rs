//! Parallel-edge compression bookkeeping.
//!
//! A graph view can draw the parallel edges between a pair of vertices as a
//! single line. Which edges are currently compressed away is value-typed
//! state owned by the caller and threaded through each operation; after a
//! collapse or expand changes the topology the state is reset.

use crate::graphs::fold_graph::{EdgeId, FoldGraph, VertexId};
use crate::graphs::Graph;

use ahash::AHashSet;
use petgraph::EdgeType;

/// Set of edges currently excluded from parallel-edge fan-out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeExclusions {
    excluded: AHashSet<EdgeId>,
}

impl EdgeExclusions {
    /// No exclusions.
    pub fn new() -> EdgeExclusions {
        EdgeExclusions::default()
    }

    /// Compress the parallel edges shared by `a` and `b`: every edge
    /// currently running between the two vertices joins the exclusion set.
    pub fn compress_between<Ty: EdgeType>(
        mut self,
        graph: &FoldGraph<Ty>,
        a: VertexId,
        b: VertexId,
    ) -> EdgeExclusions {
        let shared = graph.edges_between(a, b);
        log::debug!("compressing {} edge(s) between {} and {}", shared.len(), a, b);
        self.excluded.extend(shared);
        self
    }

    /// Undo [`EdgeExclusions::compress_between`] for the pair.
    pub fn relax_between<Ty: EdgeType>(
        mut self,
        graph: &FoldGraph<Ty>,
        a: VertexId,
        b: VertexId,
    ) -> EdgeExclusions {
        for e in graph.edges_between(a, b) {
            self.excluded.remove(&e);
        }
        self
    }

    /// Whether the edge is currently compressed away.
    pub fn is_excluded(&self, edge: EdgeId) -> bool {
        self.excluded.contains(&edge)
    }

    /// Number of excluded edges.
    pub fn len(&self) -> usize {
        self.excluded.len()
    }

    /// Whether no edge is excluded.
    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty()
    }

    /// Drop all exclusions. Called whenever the graph value the exclusions
    /// were computed against is replaced.
    pub fn reset(self) -> EdgeExclusions {
        EdgeExclusions::new()
    }
}

use super::algorithms::collapser::Collapsable;
use fold_graph::{EdgeId, VertexId};
use std::io::Write;

/// Petgraph-based multigraph with plain and cluster vertices
pub mod fold_graph;

/// Graph's interface.
///
/// The queries the contraction engine and the drivers consume: enumeration,
/// incidence, endpoint lookup, and the cluster test that tells a caller
/// whether `expand` would do anything for a vertex.
pub trait Graph: Collapsable {
    /// Vertex identifier.
    type VertexIdentifier;
    /// Edge identifier.
    type EdgeIdentifier;
    /// Number of vertices currently in the graph.
    fn vertex_count(&self) -> usize;
    /// Number of edges currently in the graph, parallel edges counted
    /// individually.
    fn edge_count(&self) -> usize;
    /// Identities of all vertices.
    fn vertices(&self) -> Vec<VertexId>;
    /// Identities of all edges.
    fn edges(&self) -> Vec<EdgeId>;
    /// Edges touching the given vertex; a self-loop is reported once.
    fn incident_edges(&self, vertex: Self::VertexIdentifier) -> Vec<EdgeId>;
    /// Current endpoints of an edge, as (source, target).
    fn endpoints(&self, edge: Self::EdgeIdentifier) -> Option<(VertexId, VertexId)>;
    /// Number of edges touching the given vertex.
    fn degree(&self, vertex: Self::VertexIdentifier) -> usize;
    /// Whether this identity currently denotes a cluster vertex.
    fn is_cluster(&self, vertex: Self::VertexIdentifier) -> bool;
    /// The parallel edges running between the two given vertices, in either
    /// orientation.
    fn edges_between(&self, a: Self::VertexIdentifier, b: Self::VertexIdentifier) -> Vec<EdgeId>;
    /// Write everything to a graph in DOT format.
    fn write_to_dot<W: Write>(&self, f: &mut W);
    /// Get a String with the graph in DOT format.
    fn get_dot_string(&self) -> String;
}

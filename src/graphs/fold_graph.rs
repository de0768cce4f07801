use super::Graph;
use crate::algorithms::collapser::CollapseError;
use crate::labeller::{Labeller, NameLabeller};

use crate::Idx;

use core::fmt;
use std::io::Write;

use petgraph;
use petgraph::dot::{Config, Dot};
use petgraph::stable_graph::StableGraph;
use petgraph::{EdgeType, Undirected};

/// Type denoting index of edge.
pub type EdgeIndex = petgraph::stable_graph::EdgeIndex<Idx>;
/// Type denoting index of node.
pub type NodeIndex = petgraph::stable_graph::NodeIndex<Idx>;

/// Stable identity of a vertex.
///
/// Collapse and expand build new graph values, so the positional petgraph
/// indices are not preserved across them; these identities are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Stable identity of an edge. Survives rewiring: a boundary edge keeps its
/// identity when its endpoint is redirected to a cluster vertex and back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A vertex is either an original vertex of the input or a synthetic cluster
/// standing in for a contracted subset.
pub enum Vertex<Ty: EdgeType = Undirected> {
    /// Ordinary vertex.
    Plain {
        /// Stable identity.
        id: VertexId,
        /// Display label, as read from the input.
        label: String,
    },
    /// Synthetic vertex wrapping the induced subgraph of the vertices that
    /// were contracted into it. Expanding the cluster re-inserts the wrapped
    /// subgraph unchanged.
    Cluster {
        /// Stable identity, allocated by the collapse that created it.
        id: VertexId,
        /// The contracted induced subgraph, kept intact for expansion.
        subgraph: Box<FoldGraph<Ty>>,
    },
}

impl<Ty: EdgeType> Vertex<Ty> {
    /// Stable identity of this vertex.
    pub fn id(&self) -> VertexId {
        match self {
            Vertex::Plain { id, .. } | Vertex::Cluster { id, .. } => *id,
        }
    }

    /// Whether this vertex currently denotes a cluster.
    pub fn is_cluster(&self) -> bool {
        matches!(self, Vertex::Cluster { .. })
    }

    /// The wrapped subgraph, for cluster vertices.
    pub fn subgraph(&self) -> Option<&FoldGraph<Ty>> {
        match self {
            Vertex::Plain { .. } => None,
            Vertex::Cluster { subgraph, .. } => Some(subgraph),
        }
    }

    /// Identities of the direct members of a cluster; empty for plain
    /// vertices.
    pub fn member_ids(&self) -> Vec<VertexId> {
        match self {
            Vertex::Plain { .. } => vec![],
            Vertex::Cluster { subgraph, .. } => subgraph.vertices(),
        }
    }
}

impl<Ty: EdgeType> Clone for Vertex<Ty> {
    fn clone(&self) -> Self {
        match self {
            Vertex::Plain { id, label } => Vertex::Plain {
                id: *id,
                label: label.clone(),
            },
            Vertex::Cluster { id, subgraph } => Vertex::Cluster {
                id: *id,
                subgraph: subgraph.clone(),
            },
        }
    }
}

impl<Ty: EdgeType> PartialEq for Vertex<Ty> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Vertex::Plain { id: a, label: la }, Vertex::Plain { id: b, label: lb }) => {
                a == b && la == lb
            }
            (Vertex::Cluster { id: a, subgraph: sa }, Vertex::Cluster { id: b, subgraph: sb }) => {
                a == b && sa == sb
            }
            _ => false,
        }
    }
}

// manual impl: a derive would demand `Ty: Debug` and leak that bound into
// every generic user
impl<Ty: EdgeType> fmt::Debug for Vertex<Ty> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Plain { id, label } => f
                .debug_struct("Plain")
                .field("id", id)
                .field("label", label)
                .finish(),
            Vertex::Cluster { id, subgraph } => f
                .debug_struct("Cluster")
                .field("id", id)
                .field("subgraph", subgraph)
                .finish(),
        }
    }
}

impl<Ty: EdgeType> fmt::Display for Vertex<Ty> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vertex::Plain { label, .. } => write!(f, "{}", label),
            Vertex::Cluster { subgraph, .. } => {
                write!(f, "[{} vertices]", subgraph.graph.node_count())
            }
        }
    }
}

/// Metadata carried by every edge.
///
/// Identity and label never change. The restore stacks record, per endpoint,
/// which interior vertex the edge touched before a collapse redirected that
/// endpoint to a cluster vertex; `expand` pops the most recent entry, so
/// nested collapses are undone in reverse order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeAttr {
    /// Stable identity.
    pub id: EdgeId,
    /// Optional display label, as read from the input.
    pub label: Option<String>,
    /// Restore points for the source endpoint, most recent last.
    pub source_restore: Vec<VertexId>,
    /// Restore points for the target endpoint, most recent last.
    pub target_restore: Vec<VertexId>,
}

impl EdgeAttr {
    /// A fresh edge with no rewiring history.
    pub fn new(id: EdgeId, label: Option<&str>) -> EdgeAttr {
        EdgeAttr {
            id,
            label: label.map(|l| l.to_owned()),
            source_restore: vec![],
            target_restore: vec![],
        }
    }
}

impl fmt::Display for EdgeAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "{}", self.id),
        }
    }
}

/// Petgraph-based multigraph with stable identities and plain-or-cluster
/// vertices.
///
/// One value per graph state: the contraction operations return new values
/// instead of mutating in place, so callers can hold on to earlier states
/// (e.g. to restore the uncollapsed view). Parallel edges and self-loops are
/// allowed; `Ty` picks the directed or undirected interpretation.
pub struct FoldGraph<Ty: EdgeType = Undirected> {
    /// Petgraph stable-graph: foundations of the graph structure.
    pub graph: StableGraph<Vertex<Ty>, EdgeAttr, Ty, Idx>,

    /// Next unallocated vertex identity.
    pub(crate) next_vertex: u64,

    /// Next unallocated edge identity.
    pub(crate) next_edge: u64,
}

impl<Ty: EdgeType> Default for FoldGraph<Ty> {
    fn default() -> Self {
        FoldGraph {
            graph: StableGraph::default(),
            next_vertex: 0,
            next_edge: 0,
        }
    }
}

impl<Ty: EdgeType> Clone for FoldGraph<Ty> {
    fn clone(&self) -> Self {
        FoldGraph {
            graph: self.graph.clone(),
            next_vertex: self.next_vertex,
            next_edge: self.next_edge,
        }
    }
}

impl<Ty: EdgeType> fmt::Debug for FoldGraph<Ty> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoldGraph")
            .field("graph", &self.graph)
            .field("next_vertex", &self.next_vertex)
            .field("next_edge", &self.next_edge)
            .finish()
    }
}

impl<Ty: EdgeType> FoldGraph<Ty> {
    /// Empty graph.
    pub fn new() -> FoldGraph<Ty> {
        FoldGraph::default()
    }

    /// Empty graph with the same representation and identity allocators as
    /// this one. The contraction operations use this to build their result
    /// values, so identities they allocate never collide with existing ones.
    pub fn fresh_like(&self) -> FoldGraph<Ty> {
        FoldGraph {
            graph: StableGraph::with_capacity(self.graph.node_count(), self.graph.edge_count()),
            next_vertex: self.next_vertex,
            next_edge: self.next_edge,
        }
    }

    /// Whether edges are interpreted as directed.
    pub fn is_directed(&self) -> bool {
        Ty::is_directed()
    }

    /// Add a plain vertex with a fresh identity.
    pub fn add_vertex(&mut self, label: &str) -> VertexId {
        let id = VertexId(self.next_vertex);
        self.next_vertex += 1;
        self.graph.add_node(Vertex::Plain {
            id,
            label: label.to_owned(),
        });
        id
    }

    /// Add an edge between two existing vertices, with a fresh identity.
    /// Adding the same pair again creates a parallel edge.
    pub fn add_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        label: Option<&str>,
    ) -> Result<EdgeId, CollapseError> {
        let s = self
            .find_vertex(source)
            .ok_or(CollapseError::UnknownVertex(source))?;
        let t = self
            .find_vertex(target)
            .ok_or(CollapseError::UnknownVertex(target))?;
        let id = EdgeId(self.next_edge);
        self.next_edge += 1;
        self.graph.add_edge(s, t, EdgeAttr::new(id, label));
        Ok(id)
    }

    /// Re-insert an existing vertex value, keeping its identity.
    pub(crate) fn adopt_vertex(&mut self, vertex: Vertex<Ty>) -> NodeIndex {
        self.graph.add_node(vertex)
    }

    /// Petgraph index of the vertex with the given identity, if present.
    pub fn find_vertex(&self, id: VertexId) -> Option<NodeIndex> {
        self.graph.node_indices().find(|n| self.graph[*n].id() == id)
    }

    /// The vertex with the given identity, if present.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<Ty>> {
        self.find_vertex(id).map(|n| &self.graph[n])
    }

    /// Identity of the plain vertex carrying the given label. Cluster
    /// vertices have no label of their own and are never matched.
    pub fn find_by_label(&self, label: &str) -> Option<VertexId> {
        self.graph.node_indices().find_map(|n| match &self.graph[n] {
            Vertex::Plain { id, label: l } if l == label => Some(*id),
            _ => None,
        })
    }

    /// The subgraph wrapped by a cluster vertex, if the identity denotes one.
    pub fn cluster_subgraph(&self, id: VertexId) -> Option<&FoldGraph<Ty>> {
        self.vertex(id).and_then(|v| v.subgraph())
    }

    /// DOT rendering using the given labeller for vertex text.
    pub fn dot_string_with<L: Labeller<Ty>>(&self, labeller: &L) -> String {
        format!(
            "{:?}",
            Dot::with_attr_getters(
                &self.graph,
                &[Config::NodeNoLabel, Config::EdgeNoLabel],
                &|_, e| match &e.weight().label {
                    Some(label) => format!("label = \"{}\"", label),
                    None => String::new(),
                },
                &|_, n| format!("label = \"{}\"", labeller.label(n.1)),
            )
        )
    }
}

/// Structural equality: same vertex identities (with equal labels or, for
/// clusters, equal wrapped subgraphs), same edge identities with the same
/// endpoints and metadata. Identity allocators and petgraph index layout are
/// not compared.
impl<Ty: EdgeType> PartialEq for FoldGraph<Ty> {
    fn eq(&self, other: &Self) -> bool {
        if self.graph.node_count() != other.graph.node_count()
            || self.graph.edge_count() != other.graph.edge_count()
        {
            return false;
        }

        for n in self.graph.node_indices() {
            let mine = &self.graph[n];
            match other.vertex(mine.id()) {
                Some(theirs) if theirs == mine => {}
                _ => return false,
            }
        }

        for e in self.graph.edge_indices() {
            let (s, t) = self.graph.edge_endpoints(e).unwrap();
            let attr = &self.graph[e];
            let mine = (self.graph[s].id(), self.graph[t].id(), attr);
            if !other.graph.edge_indices().any(|oe| {
                let (os, ot) = other.graph.edge_endpoints(oe).unwrap();
                (other.graph[os].id(), other.graph[ot].id(), &other.graph[oe]) == mine
            }) {
                return false;
            }
        }

        true
    }
}

impl<Ty: EdgeType> Graph for FoldGraph<Ty> {
    type VertexIdentifier = VertexId;
    type EdgeIdentifier = EdgeId;

    #[inline]
    fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    fn vertices(&self) -> Vec<VertexId> {
        self.graph.node_indices().map(|n| self.graph[n].id()).collect()
    }

    #[inline]
    fn edges(&self) -> Vec<EdgeId> {
        self.graph.edge_indices().map(|e| self.graph[e].id).collect()
    }

    #[inline]
    fn incident_edges(&self, vertex: VertexId) -> Vec<EdgeId> {
        let node = match self.find_vertex(vertex) {
            Some(n) => n,
            None => return vec![],
        };
        self.graph
            .edge_indices()
            .filter(|e| {
                let (s, t) = self.graph.edge_endpoints(*e).unwrap();
                s == node || t == node
            })
            .map(|e| self.graph[e].id)
            .collect()
    }

    #[inline]
    fn endpoints(&self, edge: EdgeId) -> Option<(VertexId, VertexId)> {
        self.graph.edge_indices().find_map(|e| {
            if self.graph[e].id != edge {
                return None;
            }
            let (s, t) = self.graph.edge_endpoints(e).unwrap();
            Some((self.graph[s].id(), self.graph[t].id()))
        })
    }

    #[inline]
    fn degree(&self, vertex: VertexId) -> usize {
        self.incident_edges(vertex).len()
    }

    #[inline]
    fn is_cluster(&self, vertex: VertexId) -> bool {
        self.vertex(vertex).is_some_and(|v| v.is_cluster())
    }

    #[inline]
    fn edges_between(&self, a: VertexId, b: VertexId) -> Vec<EdgeId> {
        self.graph
            .edge_indices()
            .filter(|e| {
                let (s, t) = self.graph.edge_endpoints(*e).unwrap();
                let (sid, tid) = (self.graph[s].id(), self.graph[t].id());
                (sid == a && tid == b) || (sid == b && tid == a)
            })
            .map(|e| self.graph[e].id)
            .collect()
    }

    fn write_to_dot<W: Write>(&self, f: &mut W) {
        let _ = f.write(&self.get_dot_string().into_bytes()[..]);
    }

    fn get_dot_string(&self) -> String {
        self.dot_string_with(&NameLabeller)
    }
}

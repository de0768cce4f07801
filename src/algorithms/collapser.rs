//! Contract a picked vertex subset into a single cluster vertex, and invert it.

use crate::graphs::fold_graph::{EdgeId, FoldGraph, NodeIndex, Vertex, VertexId};

use ahash::{AHashMap, AHashSet};
use petgraph::EdgeType;
use thiserror::Error;

/// Failures of the contraction operations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CollapseError {
    /// Contraction of fewer than two vertices is meaningless.
    #[error("cannot contract a selection of {0} vertex(es), need at least 2")]
    InsufficientSelection(usize),
    /// A vertex identity was not found in the graph it was used against.
    #[error("vertex {0} is not part of this graph")]
    UnknownVertex(VertexId),
    /// An edge carries endpoint metadata the graph cannot resolve; the
    /// graph value violates its own invariants.
    #[error("edge {0} refers to an endpoint outside the graph")]
    InconsistentGraph(EdgeId),
}

/// Contraction of vertex subsets into cluster vertices, and its inverse.
///
/// All three operations leave `self` untouched and return new graph values,
/// so callers can keep earlier states around and restore them wholesale.
pub trait Collapsable: Sized {
    /// Vertex identifier.
    type VertexIdx;

    /// The induced subgraph over `picked`: exactly those vertices, and every
    /// edge whose both endpoints lie among them.
    fn cluster_graph(&self, picked: &[Self::VertexIdx]) -> Result<Self, CollapseError>;

    /// Replace the vertices of `cluster` with one cluster vertex wrapping
    /// it. Boundary edges are rewired to the cluster vertex, remembering the
    /// interior endpoint they leave behind; interior edges survive only
    /// inside the wrapped subgraph. Returns the new graph together with the
    /// identity of the cluster vertex.
    fn collapse(&self, cluster: &Self) -> Result<(Self, Self::VertexIdx), CollapseError>;

    /// Undo one level of collapse at `vertex`: remove the cluster vertex,
    /// re-insert its wrapped subgraph, and reattach every rewired edge to
    /// the interior endpoint recorded for it. For a plain or absent vertex
    /// the result simply equals `self`.
    fn expand(&self, vertex: Self::VertexIdx) -> Result<Self, CollapseError>;
}

impl<Ty: EdgeType> Collapsable for FoldGraph<Ty> {
    type VertexIdx = VertexId;

    fn cluster_graph(&self, picked: &[VertexId]) -> Result<FoldGraph<Ty>, CollapseError> {
        let wanted: AHashSet<VertexId> = picked.iter().copied().collect();
        if wanted.len() < 2 {
            return Err(CollapseError::InsufficientSelection(wanted.len()));
        }

        let mut sub = self.fresh_like();
        let mut index_of: AHashMap<VertexId, NodeIndex> = AHashMap::with_capacity(wanted.len());
        for n in self.graph.node_indices() {
            let vertex = &self.graph[n];
            if wanted.contains(&vertex.id()) {
                index_of.insert(vertex.id(), sub.adopt_vertex(vertex.clone()));
            }
        }
        for id in &wanted {
            if !index_of.contains_key(id) {
                return Err(CollapseError::UnknownVertex(*id));
            }
        }

        for e in self.graph.edge_indices() {
            let (s, t) = self.graph.edge_endpoints(e).unwrap();
            let sid = self.graph[s].id();
            let tid = self.graph[t].id();
            if wanted.contains(&sid) && wanted.contains(&tid) {
                sub.graph.add_edge(index_of[&sid], index_of[&tid], self.graph[e].clone());
            }
        }

        log::debug!(
            "induced subgraph over {} vertices has {} edge(s)",
            sub.graph.node_count(),
            sub.graph.edge_count()
        );
        Ok(sub)
    }

    fn collapse(&self, cluster: &FoldGraph<Ty>) -> Result<(FoldGraph<Ty>, VertexId), CollapseError> {
        let members: AHashSet<VertexId> =
            cluster.graph.node_indices().map(|n| cluster.graph[n].id()).collect();
        if members.len() < 2 {
            return Err(CollapseError::InsufficientSelection(members.len()));
        }
        for id in &members {
            if self.find_vertex(*id).is_none() {
                return Err(CollapseError::UnknownVertex(*id));
            }
        }

        let mut out = self.fresh_like();
        let mut index_of: AHashMap<VertexId, NodeIndex> =
            AHashMap::with_capacity(self.graph.node_count());
        for n in self.graph.node_indices() {
            let vertex = &self.graph[n];
            if members.contains(&vertex.id()) {
                continue;
            }
            index_of.insert(vertex.id(), out.adopt_vertex(vertex.clone()));
        }

        let cluster_id = VertexId(out.next_vertex);
        out.next_vertex += 1;
        let cluster_node = out.graph.add_node(Vertex::Cluster {
            id: cluster_id,
            subgraph: Box::new(cluster.clone()),
        });

        let mut boundary = 0usize;
        let mut interior = 0usize;
        for e in self.graph.edge_indices() {
            let (s, t) = self.graph.edge_endpoints(e).unwrap();
            let sid = self.graph[s].id();
            let tid = self.graph[t].id();
            let mut attr = self.graph[e].clone();
            match (members.contains(&sid), members.contains(&tid)) {
                // interior edges live on only inside the wrapped subgraph
                (true, true) => interior += 1,
                (false, false) => {
                    out.graph.add_edge(index_of[&sid], index_of[&tid], attr);
                }
                (true, false) => {
                    attr.source_restore.push(sid);
                    out.graph.add_edge(cluster_node, index_of[&tid], attr);
                    boundary += 1;
                }
                (false, true) => {
                    attr.target_restore.push(tid);
                    out.graph.add_edge(index_of[&sid], cluster_node, attr);
                    boundary += 1;
                }
            }
        }

        log::info!(
            "collapsed {} vertices into {}: {} boundary edge(s) rewired, {} interior edge(s) wrapped",
            members.len(),
            cluster_id,
            boundary,
            interior
        );
        Ok((out, cluster_id))
    }

    fn expand(&self, vertex: VertexId) -> Result<FoldGraph<Ty>, CollapseError> {
        let node = match self.find_vertex(vertex) {
            Some(n) => n,
            None => {
                log::debug!("expand: {} not present, graph unchanged", vertex);
                return Ok(self.clone());
            }
        };
        let sub = match &self.graph[node] {
            Vertex::Plain { .. } => {
                log::debug!("expand: {} is not a cluster, graph unchanged", vertex);
                return Ok(self.clone());
            }
            Vertex::Cluster { subgraph, .. } => subgraph.as_ref(),
        };

        let mut out = self.fresh_like();
        let mut index_of: AHashMap<VertexId, NodeIndex> =
            AHashMap::with_capacity(self.graph.node_count() + sub.graph.node_count());
        for n in self.graph.node_indices() {
            if n == node {
                continue;
            }
            let kept = &self.graph[n];
            index_of.insert(kept.id(), out.adopt_vertex(kept.clone()));
        }

        // the wrapped subgraph comes back verbatim: members first, then the
        // interior edges
        for n in sub.graph.node_indices() {
            let member = &sub.graph[n];
            index_of.insert(member.id(), out.adopt_vertex(member.clone()));
        }
        for e in sub.graph.edge_indices() {
            let (s, t) = sub.graph.edge_endpoints(e).unwrap();
            out.graph.add_edge(
                index_of[&sub.graph[s].id()],
                index_of[&sub.graph[t].id()],
                sub.graph[e].clone(),
            );
        }

        let mut rewired = 0usize;
        for e in self.graph.edge_indices() {
            let (s, t) = self.graph.edge_endpoints(e).unwrap();
            if s != node && t != node {
                out.graph.add_edge(
                    index_of[&self.graph[s].id()],
                    index_of[&self.graph[t].id()],
                    self.graph[e].clone(),
                );
                continue;
            }

            let mut attr = self.graph[e].clone();
            let source = if s == node {
                rewired += 1;
                let back = attr
                    .source_restore
                    .pop()
                    .ok_or(CollapseError::InconsistentGraph(attr.id))?;
                *index_of
                    .get(&back)
                    .ok_or(CollapseError::InconsistentGraph(attr.id))?
            } else {
                index_of[&self.graph[s].id()]
            };
            let target = if t == node {
                rewired += 1;
                let back = attr
                    .target_restore
                    .pop()
                    .ok_or(CollapseError::InconsistentGraph(attr.id))?;
                *index_of
                    .get(&back)
                    .ok_or(CollapseError::InconsistentGraph(attr.id))?
            } else {
                index_of[&self.graph[t].id()]
            };
            out.graph.add_edge(source, target, attr);
        }

        log::info!(
            "expanded {} back into {} vertices, {} edge(s) reattached",
            vertex,
            sub.graph.node_count(),
            rewired
        );
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::Graph;

    use pretty_assertions::assert_eq;

    /// The four-vertex ring a-b, b-c, c-d, a-d.
    fn ring() -> (FoldGraph, [VertexId; 4]) {
        let mut g = FoldGraph::new();
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        let c = g.add_vertex("c");
        let d = g.add_vertex("d");
        g.add_edge(a, b, None).unwrap();
        g.add_edge(b, c, None).unwrap();
        g.add_edge(c, d, None).unwrap();
        g.add_edge(a, d, None).unwrap();
        (g, [a, b, c, d])
    }

    #[test]
    fn test_cluster_graph_is_induced() {
        let (g, [a, b, _, _]) = ring();
        let sub = g.cluster_graph(&[a, b]).unwrap();
        assert_eq!(sub.vertex_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.endpoints(sub.edges()[0]), Some((a, b)));
    }

    #[test]
    fn test_selection_must_have_two_vertices() {
        let (g, [a, ..]) = ring();
        assert_eq!(
            g.cluster_graph(&[]),
            Err(CollapseError::InsufficientSelection(0))
        );
        assert_eq!(
            g.cluster_graph(&[a]),
            Err(CollapseError::InsufficientSelection(1))
        );
        // duplicates collapse to the underlying set
        assert_eq!(
            g.cluster_graph(&[a, a]),
            Err(CollapseError::InsufficientSelection(1))
        );
    }

    #[test]
    fn test_unknown_vertex_is_rejected() {
        let (g, [a, ..]) = ring();
        let stray = VertexId(999);
        assert_eq!(
            g.cluster_graph(&[a, stray]),
            Err(CollapseError::UnknownVertex(stray))
        );
    }

    #[test]
    fn test_collapse_ring_pair() {
        let (g, [a, b, c, d]) = ring();
        let sub = g.cluster_graph(&[a, b]).unwrap();
        let (folded, x) = g.collapse(&sub).unwrap();

        assert_eq!(folded.vertex_count(), 3);
        assert!(folded.is_cluster(x));
        assert!(!folded.is_cluster(c));
        // b-c and a-d became x-c and x-d; c-d is untouched; a-b is interior
        assert_eq!(folded.edge_count(), 3);
        assert_eq!(folded.edges_between(x, c).len(), 1);
        assert_eq!(folded.edges_between(x, d).len(), 1);
        assert_eq!(folded.edges_between(c, d).len(), 1);
        // the wrapped subgraph holds exactly the interior
        let wrapped = folded.cluster_subgraph(x).unwrap();
        assert_eq!(wrapped, &sub);
        // nothing duplicated, nothing lost
        assert_eq!(wrapped.edge_count() + folded.edge_count(), g.edge_count());
        // the input graph is untouched
        assert_eq!(g.vertex_count(), 4);
    }

    #[test]
    fn test_round_trip_restores_original() {
        let (g, [a, b, _, _]) = ring();
        let sub = g.cluster_graph(&[a, b]).unwrap();
        let (folded, x) = g.collapse(&sub).unwrap();
        let restored = folded.expand(x).unwrap();
        assert_eq!(restored, g);
    }

    #[test]
    fn test_parallel_boundary_edges_survive() {
        // u has three edges into {a, b}: two to a, one to b
        let mut g = FoldGraph::<petgraph::Undirected>::new();
        let u = g.add_vertex("u");
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        g.add_edge(a, b, None).unwrap();
        g.add_edge(u, a, None).unwrap();
        g.add_edge(u, a, None).unwrap();
        g.add_edge(u, b, None).unwrap();

        let sub = g.cluster_graph(&[a, b]).unwrap();
        let (folded, x) = g.collapse(&sub).unwrap();
        assert_eq!(folded.edges_between(u, x).len(), 3);
        assert_eq!(folded.degree(u), 3);

        let restored = folded.expand(x).unwrap();
        assert_eq!(restored, g);
    }

    #[test]
    fn test_expand_plain_vertex_is_noop() {
        let (g, [_, _, c, _]) = ring();
        let same = g.expand(c).unwrap();
        assert_eq!(same, g);
    }

    #[test]
    fn test_expand_absent_vertex_is_noop() {
        let (g, ..) = ring();
        let same = g.expand(VertexId(999)).unwrap();
        assert_eq!(same, g);
    }

    #[test]
    fn test_nested_collapse_unwinds_in_reverse() {
        let (g, [a, b, c, _]) = ring();
        let inner = g.cluster_graph(&[a, b]).unwrap();
        let (once, x) = g.collapse(&inner).unwrap();
        let outer = once.cluster_graph(&[x, c]).unwrap();
        let (twice, y) = once.collapse(&outer).unwrap();

        assert_eq!(twice.vertex_count(), 2);
        // x-d and c-d collapse to two parallel edges y-d
        assert_eq!(twice.edge_count(), 2);
        assert!(twice.is_cluster(y));
        // the wrapped subgraph still contains the inner cluster
        assert!(twice.cluster_subgraph(y).unwrap().is_cluster(x));

        let back_once = twice.expand(y).unwrap();
        assert_eq!(back_once, once);
        let back = back_once.expand(x).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_directed_orientation_is_preserved() {
        let mut g = FoldGraph::<petgraph::Directed>::new();
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        let c = g.add_vertex("c");
        let d = g.add_vertex("d");
        g.add_edge(a, b, None).unwrap();
        g.add_edge(b, c, None).unwrap();
        g.add_edge(d, b, None).unwrap();

        let sub = g.cluster_graph(&[a, b]).unwrap();
        let (folded, x) = g.collapse(&sub).unwrap();
        // b -> c keeps the cluster as its source, d -> b as its target
        let out = folded.edges_between(x, c);
        assert_eq!(folded.endpoints(out[0]), Some((x, c)));
        let inc = folded.edges_between(d, x);
        assert_eq!(folded.endpoints(inc[0]), Some((d, x)));

        let restored = folded.expand(x).unwrap();
        assert_eq!(restored, g);
    }

    #[test]
    fn test_member_self_loop_stays_interior() {
        let mut g = FoldGraph::<petgraph::Undirected>::new();
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        let c = g.add_vertex("c");
        g.add_edge(a, a, Some("loop")).unwrap();
        g.add_edge(a, b, None).unwrap();
        g.add_edge(b, c, None).unwrap();

        let sub = g.cluster_graph(&[a, b]).unwrap();
        assert_eq!(sub.edge_count(), 2);
        let (folded, x) = g.collapse(&sub).unwrap();
        // only b-c remains outside, rewired; the loop is wrapped
        assert_eq!(folded.edge_count(), 1);
        assert_eq!(folded.cluster_subgraph(x).unwrap().edge_count(), 2);

        let restored = folded.expand(x).unwrap();
        assert_eq!(restored, g);
    }

    #[test]
    fn test_edge_labels_ride_along() {
        let mut g = FoldGraph::<petgraph::Undirected>::new();
        let a = g.add_vertex("a");
        let b = g.add_vertex("b");
        let c = g.add_vertex("c");
        g.add_edge(a, b, Some("inner")).unwrap();
        let boundary = g.add_edge(b, c, Some("outer")).unwrap();

        let sub = g.cluster_graph(&[a, b]).unwrap();
        let (folded, x) = g.collapse(&sub).unwrap();
        let kept = folded.edges_between(x, c);
        assert_eq!(kept, vec![boundary]);
        let restored = folded.expand(x).unwrap();
        assert_eq!(restored, g);
    }
}

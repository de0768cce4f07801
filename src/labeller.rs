//! Vertex labelling for text output.

use crate::graphs::fold_graph::Vertex;

use petgraph::EdgeType;

/// Maps vertices to display text.
pub trait Labeller<Ty: EdgeType> {
    /// Label for one vertex.
    fn label(&self, vertex: &Vertex<Ty>) -> String;
}

/// Adapter turning a closure from vertex to text into a labeller.
pub struct FnLabeller<F>(pub F);

impl<Ty: EdgeType, F> Labeller<Ty> for FnLabeller<F>
where
    F: Fn(&Vertex<Ty>) -> String,
{
    fn label(&self, vertex: &Vertex<Ty>) -> String {
        (self.0)(vertex)
    }
}

/// Default labelling: plain vertices print their own label, cluster vertices
/// print the bracketed labels of their direct members.
#[derive(Clone, Copy, Debug, Default)]
pub struct NameLabeller;

impl<Ty: EdgeType> Labeller<Ty> for NameLabeller {
    fn label(&self, vertex: &Vertex<Ty>) -> String {
        match vertex {
            Vertex::Plain { label, .. } => label.clone(),
            Vertex::Cluster { subgraph, .. } => {
                let mut names: Vec<String> = subgraph
                    .graph
                    .node_indices()
                    .map(|n| self.label(&subgraph.graph[n]))
                    .collect();
                names.sort();
                format!("[{}]", names.join(" "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::collapser::Collapsable;
    use crate::graphs::fold_graph::FoldGraph;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_plain_vertex_prints_its_label() {
        let mut g = FoldGraph::<petgraph::Undirected>::new();
        let a = g.add_vertex("alpha");
        assert_eq!(NameLabeller.label(g.vertex(a).unwrap()), "alpha");
    }

    #[test]
    fn test_cluster_vertex_lists_members() {
        let mut g = FoldGraph::<petgraph::Undirected>::new();
        let a = g.add_vertex("b");
        let b = g.add_vertex("a");
        g.add_edge(a, b, None).unwrap();
        let sub = g.cluster_graph(&[a, b]).unwrap();
        let (folded, x) = g.collapse(&sub).unwrap();
        assert_eq!(NameLabeller.label(folded.vertex(x).unwrap()), "[a b]");
    }

    #[test]
    fn test_closures_can_label() {
        let mut g = FoldGraph::<petgraph::Undirected>::new();
        let a = g.add_vertex("a");
        let shout = FnLabeller(|v: &Vertex<petgraph::Undirected>| format!("<{}>", v.id()));
        assert_eq!(shout.label(g.vertex(a).unwrap()), "<v0>");
    }
}

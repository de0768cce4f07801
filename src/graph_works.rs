//! Build graphs from parsed input and drive collapse sessions.

use crate::algorithms::collapser::{Collapsable, CollapseError};
use crate::algorithms::compressor::EdgeExclusions;
use crate::graphs::fold_graph::{FoldGraph, VertexId};
use crate::graphs::Graph;
use crate::io_utils::EdgeListEntry;

use ahash::AHashMap;
use petgraph::EdgeType;
use regex::Regex;

/// Output from a collapse session.
#[derive(Default)]
pub struct FoldReport {
    /// DOT rendering of the input graph.
    pub dot_before: String,
    /// DOT rendering after the collapse.
    pub dot_after: String,
    /// DOT rendering of the wrapped cluster subgraph.
    pub dot_cluster: String,
    /// Number of vertices contracted away.
    pub collapsed: usize,
    /// Vertex count after the collapse.
    pub vertex_count: usize,
    /// Edge count after the collapse.
    pub edge_count: usize,
    /// Whether the optional expand-back pass restored the input exactly.
    pub restored: Option<bool>,
}

/// Build a graph from edge-list entries. Labels name vertices: a repeated
/// label refers to the vertex it first introduced, and a repeated pair adds
/// a parallel edge.
pub fn build_graph<Ty: EdgeType>(entries: &[EdgeListEntry]) -> Result<FoldGraph<Ty>, CollapseError> {
    let mut graph = FoldGraph::<Ty>::new();
    let mut by_label: AHashMap<String, VertexId> = AHashMap::with_capacity(entries.len());
    for (source, target, label) in entries {
        let s = *by_label
            .entry(source.clone())
            .or_insert_with(|| graph.add_vertex(source));
        if let Some(target) = target {
            let t = *by_label
                .entry(target.clone())
                .or_insert_with(|| graph.add_vertex(target));
            graph.add_edge(s, t, label.as_deref())?;
        }
    }
    Ok(graph)
}

/// Resolve a selection to vertex identities: either the explicitly named
/// labels, or every vertex whose label matches the pattern. Unknown labels
/// are skipped with a warning, mirroring how a picking UI simply cannot
/// select what is not there.
pub fn select_vertices<Ty: EdgeType>(
    graph: &FoldGraph<Ty>,
    names: &Option<Vec<String>>,
    pattern: &Option<String>,
) -> Vec<VertexId> {
    let mut picked = Vec::new();
    if let Some(names) = names {
        for name in names {
            match graph.find_by_label(name) {
                Some(id) => picked.push(id),
                None => log::warn!("no vertex labelled `{}` in the graph, skipping it", name),
            }
        }
    }
    if let Some(pattern) = pattern {
        let re = Regex::new(pattern).expect("selection pattern was not validated");
        for id in graph.vertices() {
            if let Some(crate::graphs::fold_graph::Vertex::Plain { label, .. }) = graph.vertex(id) {
                if re.is_match(label) {
                    picked.push(id);
                }
            }
        }
    }
    log::info!("selection resolved to {} vertex(es)", picked.len());
    picked
}

/// Public API for collapse drivers.
pub trait Fold {
    /// Build the graph described by `entries`, collapse the selection,
    /// optionally expand it back to verify restoration, and report on the
    /// session. The exclusion state is threaded through and reset, since
    /// the graph value it referred to has been replaced.
    fn fold<Ty: EdgeType>(
        entries: &[EdgeListEntry],
        names: &Option<Vec<String>>,
        pattern: &Option<String>,
        expand_back: bool,
        exclusions: EdgeExclusions,
    ) -> Result<(FoldReport, EdgeExclusions), CollapseError>;
}

/// Basic driver.
pub struct BasicFold {}

impl Fold for BasicFold {
    fn fold<Ty: EdgeType>(
        entries: &[EdgeListEntry],
        names: &Option<Vec<String>>,
        pattern: &Option<String>,
        expand_back: bool,
        exclusions: EdgeExclusions,
    ) -> Result<(FoldReport, EdgeExclusions), CollapseError> {
        let graph = build_graph::<Ty>(entries)?;
        log::info!(
            "built graph with {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );

        let picked = select_vertices(&graph, names, pattern);
        let cluster = graph.cluster_graph(&picked)?;
        let (folded, cluster_id) = graph.collapse(&cluster)?;

        let mut report = FoldReport {
            dot_before: graph.get_dot_string(),
            dot_after: folded.get_dot_string(),
            dot_cluster: cluster.get_dot_string(),
            collapsed: cluster.vertex_count(),
            vertex_count: folded.vertex_count(),
            edge_count: folded.edge_count(),
            restored: None,
        };

        if expand_back {
            let restored = folded.expand(cluster_id)?;
            report.restored = Some(restored == graph);
        }

        Ok((report, exclusions.reset()))
    }
}

/// Compress the parallel edges between a pair of named vertices and report
/// how many were affected, together with the graph's DOT rendering.
pub fn compress_pair<Ty: EdgeType>(
    entries: &[EdgeListEntry],
    names: &[String],
) -> Result<(usize, String), CollapseError> {
    let graph = build_graph::<Ty>(entries)?;
    let picked = select_vertices(&graph, &Some(names.to_vec()), &None);
    if picked.len() != 2 {
        return Err(CollapseError::InsufficientSelection(picked.len()));
    }
    let state = EdgeExclusions::new().compress_between(&graph, picked[0], picked[1]);
    Ok((state.len(), graph.get_dot_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn ring_entries() -> Vec<EdgeListEntry> {
        [("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")]
            .iter()
            .map(|(s, t)| (s.to_string(), Some(t.to_string()), None))
            .collect()
    }

    #[test]
    fn test_build_graph_reuses_labels() {
        let graph = build_graph::<petgraph::Undirected>(&ring_entries()).unwrap();
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn test_build_graph_parallel_and_isolated() {
        let entries = vec![
            ("a".to_string(), Some("b".to_string()), None),
            ("a".to_string(), Some("b".to_string()), None),
            ("lonely".to_string(), None, None),
        ];
        let graph = build_graph::<petgraph::Undirected>(&entries).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_select_by_pattern() {
        let graph = build_graph::<petgraph::Undirected>(&ring_entries()).unwrap();
        let picked = select_vertices(&graph, &None, &Some("^[ab]$".to_string()));
        assert_eq!(picked.len(), 2);
    }

    #[test]
    fn test_select_skips_unknown_names() {
        let graph = build_graph::<petgraph::Undirected>(&ring_entries()).unwrap();
        let names = Some(vec!["a".to_string(), "zz".to_string()]);
        let picked = select_vertices(&graph, &names, &None);
        assert_eq!(picked.len(), 1);
    }

    #[test]
    fn test_fold_session_restores() {
        let names = Some(vec!["a".to_string(), "b".to_string()]);
        let (report, exclusions) = BasicFold::fold::<petgraph::Undirected>(
            &ring_entries(),
            &names,
            &None,
            true,
            EdgeExclusions::new(),
        )
        .unwrap();
        assert_eq!(report.collapsed, 2);
        assert_eq!(report.vertex_count, 3);
        assert_eq!(report.edge_count, 3);
        assert_eq!(report.restored, Some(true));
        assert!(exclusions.is_empty());
        assert!(report.dot_after.contains("[a b]"));
    }

    #[test]
    fn test_fold_session_rejects_small_selection() {
        let names = Some(vec!["a".to_string()]);
        let outcome = BasicFold::fold::<petgraph::Undirected>(
            &ring_entries(),
            &names,
            &None,
            false,
            EdgeExclusions::new(),
        );
        assert_eq!(
            outcome.err(),
            Some(CollapseError::InsufficientSelection(1))
        );
    }

    #[test]
    fn test_compress_pair_counts_shared_edges() {
        let entries = vec![
            ("a".to_string(), Some("b".to_string()), None),
            ("a".to_string(), Some("b".to_string()), None),
            ("b".to_string(), Some("c".to_string()), None),
        ];
        let (count, dot) =
            compress_pair::<petgraph::Undirected>(&entries, &["a".to_string(), "b".to_string()])
                .unwrap();
        assert_eq!(count, 2);
        assert!(dot.contains("label = \"a\""));
    }
}

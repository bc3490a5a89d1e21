//! Optional petgraph compatibility layer.
//!
//! Converts a [`VisualGraph`] into petgraph's `DiGraph` so its algorithm
//! library and DOT export can be used for analysis and debugging of editor
//! graphs, including graphs the linear validator rejects.
//!
//! # Feature Gate
//!
//! Only available with the `petgraph-compat` feature:
//!
//! ```toml
//! [dependencies]
//! stepweave = { version = "0.1", features = ["petgraph-compat"] }
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use stepweave::graphs::{to_petgraph, VisualEdge, VisualGraph, VisualNode};
//!
//! let graph = VisualGraph {
//!     nodes: vec![VisualNode::new("a", "intro"), VisualNode::new("b", "finish")],
//!     edges: vec![VisualEdge::new("e1", "a", "b")],
//! };
//! let conversion = to_petgraph(&graph);
//! assert_eq!(conversion.graph.node_count(), 2);
//! ```

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use super::visual::VisualGraph;

/// Petgraph form of a visual graph: node weights are node ids, edges are
/// unit-weighted.
pub type VisualDiGraph = DiGraph<String, ()>;

/// Mapping from node id to petgraph `NodeIndex`.
pub type NodeIndexMap = FxHashMap<String, NodeIndex>;

/// Result of converting a [`VisualGraph`] to petgraph format.
#[derive(Debug, Clone)]
pub struct PetgraphConversion {
    pub graph: VisualDiGraph,
    pub index_map: NodeIndexMap,
}

impl PetgraphConversion {
    /// Look up the petgraph index for a node id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index_map.get(id).copied()
    }

    /// Get the node id at a petgraph index.
    #[must_use]
    pub fn node_at(&self, index: NodeIndex) -> Option<&String> {
        self.graph.node_weight(index)
    }
}

/// Convert a visual graph to a petgraph `DiGraph`.
///
/// Node indices follow the declaration order of `graph.nodes`, so the
/// conversion is deterministic. Edges whose endpoints are not declared
/// nodes are skipped.
#[must_use]
pub fn to_petgraph(graph: &VisualGraph) -> PetgraphConversion {
    let mut digraph = DiGraph::new();
    let mut index_map: NodeIndexMap = FxHashMap::default();

    for node in &graph.nodes {
        if !index_map.contains_key(&node.id) {
            let idx = digraph.add_node(node.id.clone());
            index_map.insert(node.id.clone(), idx);
        }
    }

    for edge in &graph.edges {
        if let Some(&from) = index_map.get(&edge.source)
            && let Some(&to) = index_map.get(&edge.target)
        {
            digraph.add_edge(from, to, ());
        }
    }

    PetgraphConversion {
        graph: digraph,
        index_map,
    }
}

/// Export a visual graph to DOT format for visualization.
///
/// Render with Graphviz (`dot -Tpng flow.dot -o flow.png`). Labels show
/// `id (stepKind)`.
#[must_use]
pub fn to_dot(graph: &VisualGraph) -> String {
    use std::fmt::Write;

    let conversion = to_petgraph(graph);
    let kinds: FxHashMap<&str, String> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.step_kind().to_string()))
        .collect();

    let mut output = String::new();
    writeln!(output, "digraph {{").unwrap();
    writeln!(output, "    rankdir=TB;").unwrap();
    writeln!(output, "    node [shape=box, style=rounded];").unwrap();

    for idx in conversion.graph.node_indices() {
        if let Some(id) = conversion.graph.node_weight(idx) {
            let kind = kinds.get(id.as_str()).map_or("unknown", String::as_str);
            writeln!(output, "    {} [ label=\"{id} ({kind})\" ];", idx.index()).unwrap();
        }
    }

    writeln!(output).unwrap();

    for edge in conversion.graph.edge_indices() {
        if let Some((from, to)) = conversion.graph.edge_endpoints(edge) {
            writeln!(output, "    {} -> {};", from.index(), to.index()).unwrap();
        }
    }

    writeln!(output, "}}").unwrap();
    output
}

/// Cycle check via petgraph, usable for cross-verification against the
/// built-in Kahn pass.
#[must_use]
pub fn is_cyclic(graph: &VisualGraph) -> bool {
    let conversion = to_petgraph(graph);
    petgraph::algo::is_cyclic_directed(&conversion.graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::visual::{VisualEdge, VisualNode};

    fn chain() -> VisualGraph {
        VisualGraph {
            nodes: vec![
                VisualNode::new("a", "intro"),
                VisualNode::new("b", "answerChoice"),
                VisualNode::new("c", "finish"),
            ],
            edges: vec![
                VisualEdge::new("e1", "a", "b"),
                VisualEdge::new("e2", "b", "c"),
            ],
        }
    }

    #[test]
    fn converts_chain() {
        let conversion = to_petgraph(&chain());
        assert_eq!(conversion.graph.node_count(), 3);
        assert_eq!(conversion.graph.edge_count(), 2);
        assert!(conversion.index_of("a").is_some());
        assert!(conversion.index_of("missing").is_none());
    }

    #[test]
    fn detects_cycles() {
        let mut graph = chain();
        assert!(!is_cyclic(&graph));
        graph.edges.push(VisualEdge::new("e3", "c", "a"));
        assert!(is_cyclic(&graph));
    }

    #[test]
    fn dot_output_labels_nodes() {
        let dot = to_dot(&chain());
        assert!(dot.contains("digraph {"));
        assert!(dot.contains("a (intro)"));
        assert!(dot.contains("->"));
    }
}

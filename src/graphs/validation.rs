//! Structural validation of visual graphs.

use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::fmt;

use super::visual::VisualGraph;
use crate::types::Issue;

/// Committed issue-code vocabulary of the graph validator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphIssueCode {
    /// The graph has no nodes at all.
    GraphEmpty,
    /// An edge references a source node that does not exist.
    EdgeMissingSource,
    /// An edge references a target node that does not exist.
    EdgeMissingTarget,
    /// Not exactly one entry (in-degree 0) node.
    EntryCountInvalid,
    /// Not exactly one exit (out-degree 0) node.
    ExitCountInvalid,
    /// A node with in-degree or out-degree above 1; linear mode has no
    /// branching.
    BranchNotSupported,
    /// A node with no edges while other nodes exist.
    IsolatedNode,
    /// The graph contains a cycle.
    CycleDetected,
    /// Nodes unreachable from the unique entry.
    GraphDisconnected,
}

impl GraphIssueCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            GraphIssueCode::GraphEmpty => "graph_empty",
            GraphIssueCode::EdgeMissingSource => "edge_missing_source",
            GraphIssueCode::EdgeMissingTarget => "edge_missing_target",
            GraphIssueCode::EntryCountInvalid => "entry_count_invalid",
            GraphIssueCode::ExitCountInvalid => "exit_count_invalid",
            GraphIssueCode::BranchNotSupported => "branch_not_supported",
            GraphIssueCode::IsolatedNode => "isolated_node",
            GraphIssueCode::CycleDetected => "cycle_detected",
            GraphIssueCode::GraphDisconnected => "graph_disconnected",
        }
    }
}

impl fmt::Display for GraphIssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of [`validate`]: `ok` iff `errors` is empty.
#[derive(Clone, Debug, Default)]
pub struct GraphValidation {
    pub ok: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl GraphValidation {
    fn failed(errors: Vec<Issue>, warnings: Vec<Issue>) -> Self {
        Self {
            ok: false,
            errors,
            warnings,
        }
    }
}

#[derive(Default)]
pub(super) struct Adjacency {
    /// Outgoing neighbors in edge order.
    pub out_map: FxHashMap<String, Vec<String>>,
    /// (in-degree, out-degree) per node.
    pub degrees: FxHashMap<String, (usize, usize)>,
}

/// Builds adjacency, skipping edges whose endpoints are unknown (those are
/// rejected before this runs).
pub(super) fn build_adjacency(graph: &VisualGraph) -> Adjacency {
    let mut adjacency = Adjacency::default();
    for node in &graph.nodes {
        adjacency.out_map.insert(node.id.clone(), Vec::new());
        adjacency.degrees.insert(node.id.clone(), (0, 0));
    }
    for edge in &graph.edges {
        if !adjacency.degrees.contains_key(&edge.source)
            || !adjacency.degrees.contains_key(&edge.target)
        {
            continue;
        }
        if let Some(out) = adjacency.out_map.get_mut(&edge.source) {
            out.push(edge.target.clone());
        }
        if let Some((_, out_degree)) = adjacency.degrees.get_mut(&edge.source) {
            *out_degree += 1;
        }
        if let Some((in_degree, _)) = adjacency.degrees.get_mut(&edge.target) {
            *in_degree += 1;
        }
    }
    adjacency
}

/// The unique entry node id (in-degree 0), if validation has established
/// there is exactly one.
pub(super) fn entry_node<'a>(graph: &'a VisualGraph, adjacency: &Adjacency) -> Option<&'a str> {
    graph
        .nodes
        .iter()
        .find(|node| matches!(adjacency.degrees.get(&node.id), Some((0, _))))
        .map(|node| node.id.as_str())
}

/// Kahn's algorithm: true iff every node can be dequeued, i.e. no cycle.
fn is_acyclic(graph: &VisualGraph, adjacency: &Adjacency) -> bool {
    let mut in_degrees: FxHashMap<&str, usize> = FxHashMap::default();
    let mut queue: VecDeque<&str> = VecDeque::new();
    for node in &graph.nodes {
        let (in_degree, _) = adjacency.degrees.get(&node.id).copied().unwrap_or((0, 0));
        in_degrees.insert(node.id.as_str(), in_degree);
        if in_degree == 0 {
            queue.push_back(node.id.as_str());
        }
    }

    let mut visited = 0usize;
    while let Some(current) = queue.pop_front() {
        visited += 1;
        for next in adjacency.out_map.get(current).into_iter().flatten() {
            if let Some(remaining) = in_degrees.get_mut(next.as_str()) {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    queue.push_back(next.as_str());
                }
            }
        }
    }

    visited == graph.nodes.len()
}

/// Walks from `entry` following the single outgoing edge per node; returns
/// the reachable node ids.
pub(super) fn chain_reach(entry: &str, adjacency: &Adjacency) -> FxHashSet<String> {
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut current = entry.to_owned();
    while !visited.contains(&current) {
        visited.insert(current.clone());
        let Some(next) = adjacency
            .out_map
            .get(&current)
            .and_then(|out| out.first())
        else {
            break;
        };
        current = next.clone();
    }
    visited
}

/// Validates the structural invariants of a linear visual graph.
///
/// Dangling edge endpoints are checked first and short-circuit; the
/// remaining checks accumulate so every expected diagnostic is assertable
/// in one pass. Reachability runs only after everything else passes.
#[must_use]
pub fn validate(graph: &VisualGraph) -> GraphValidation {
    let mut errors: Vec<Issue> = Vec::new();
    let warnings: Vec<Issue> = Vec::new();

    if graph.nodes.is_empty() {
        errors.push(Issue::new(
            GraphIssueCode::GraphEmpty,
            "the flow graph has no nodes",
            "graph.nodes",
        ));
        return GraphValidation::failed(errors, warnings);
    }

    let node_ids: FxHashSet<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &graph.edges {
        if !node_ids.contains(edge.source.as_str()) {
            errors.push(Issue::new(
                GraphIssueCode::EdgeMissingSource,
                format!("edge {} references a missing source node", edge.id),
                format!("graph.edges({}).source", edge.id),
            ));
        }
        if !node_ids.contains(edge.target.as_str()) {
            errors.push(Issue::new(
                GraphIssueCode::EdgeMissingTarget,
                format!("edge {} references a missing target node", edge.id),
                format!("graph.edges({}).target", edge.id),
            ));
        }
    }
    if !errors.is_empty() {
        return GraphValidation::failed(errors, warnings);
    }

    let adjacency = build_adjacency(graph);
    let entry_count = graph
        .nodes
        .iter()
        .filter(|node| matches!(adjacency.degrees.get(&node.id), Some((0, _))))
        .count();
    let exit_count = graph
        .nodes
        .iter()
        .filter(|node| matches!(adjacency.degrees.get(&node.id), Some((_, 0))))
        .count();

    if entry_count != 1 {
        errors.push(Issue::new(
            GraphIssueCode::EntryCountInvalid,
            format!("linear flows require exactly 1 entry node, found {entry_count}"),
            "graph.nodes",
        ));
    }
    if exit_count != 1 {
        errors.push(Issue::new(
            GraphIssueCode::ExitCountInvalid,
            format!("linear flows require exactly 1 exit node, found {exit_count}"),
            "graph.nodes",
        ));
    }

    for node in &graph.nodes {
        let (in_degree, out_degree) = adjacency.degrees.get(&node.id).copied().unwrap_or((0, 0));
        if in_degree > 1 || out_degree > 1 {
            errors.push(Issue::new(
                GraphIssueCode::BranchNotSupported,
                format!(
                    "node {} has multiple incoming or outgoing edges (in={in_degree}, out={out_degree}); linear mode has no branching",
                    node.id
                ),
                format!("graph.nodes({})", node.id),
            ));
        }
        if graph.nodes.len() > 1 && in_degree == 0 && out_degree == 0 {
            errors.push(Issue::new(
                GraphIssueCode::IsolatedNode,
                format!("node {} is isolated and cannot join the chain", node.id),
                format!("graph.nodes({})", node.id),
            ));
        }
    }

    if !is_acyclic(graph, &adjacency) {
        errors.push(Issue::new(
            GraphIssueCode::CycleDetected,
            "the flow graph contains a cycle; linear flows cannot loop",
            "graph.edges",
        ));
    }

    if !errors.is_empty() {
        return GraphValidation::failed(errors, warnings);
    }

    // Single entry is guaranteed at this point.
    if let Some(entry) = entry_node(graph, &adjacency) {
        let reached = chain_reach(entry, &adjacency);
        if reached.len() != graph.nodes.len() {
            errors.push(Issue::new(
                GraphIssueCode::GraphDisconnected,
                "the flow graph is not a single connected chain; some nodes are unreachable from the entry",
                "graph.nodes",
            ));
            return GraphValidation::failed(errors, warnings);
        }
    }

    GraphValidation {
        ok: true,
        errors,
        warnings,
    }
}

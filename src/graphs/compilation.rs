//! Linearization of a validated visual graph.

use tracing::instrument;

use super::validation::{self, GraphValidation};
use super::visual::{LinearStep, VisualGraph};

/// Outcome of [`compile`]: the linear step list when `ok`, otherwise the
/// validation report that blocked it.
#[derive(Clone, Debug, Default)]
pub struct GraphCompileResult {
    pub ok: bool,
    pub steps: Vec<LinearStep>,
    pub errors: Vec<crate::types::Issue>,
    pub warnings: Vec<crate::types::Issue>,
}

impl From<GraphValidation> for GraphCompileResult {
    fn from(validation: GraphValidation) -> Self {
        Self {
            ok: false,
            steps: Vec::new(),
            errors: validation.errors,
            warnings: validation.warnings,
        }
    }
}

/// Validates the graph and, on success, walks the chain from the entry
/// node emitting one [`LinearStep`] per node in traversal order.
///
/// Step ids are the node ids, so editor selection maps 1:1 onto runtime
/// positions. Payload fields win over the node's own kind.
#[instrument(skip_all, fields(nodes = graph.nodes.len(), edges = graph.edges.len()))]
#[must_use]
pub fn compile(graph: &VisualGraph) -> GraphCompileResult {
    let validation = validation::validate(graph);
    if !validation.ok {
        return GraphCompileResult::from(validation);
    }

    let adjacency = validation::build_adjacency(graph);
    let Some(entry) = validation::entry_node(graph, &adjacency) else {
        // Unreachable after a passing validation; treated as empty output.
        return GraphCompileResult::from(GraphValidation::default());
    };

    let by_id: rustc_hash::FxHashMap<&str, &super::visual::VisualNode> =
        graph.nodes.iter().map(|n| (n.id.as_str(), n)).collect();

    let mut steps = Vec::with_capacity(graph.nodes.len());
    let mut current = Some(entry.to_owned());
    let mut seen: rustc_hash::FxHashSet<String> = rustc_hash::FxHashSet::default();

    while let Some(id) = current
        && seen.insert(id.clone())
    {
        if let Some(node) = by_id.get(id.as_str()) {
            steps.push(LinearStep {
                id: node.id.clone(),
                kind: node.step_kind(),
                auto_next: node.auto_next(),
                group_id: node.group_id(),
            });
        }
        current = adjacency
            .out_map
            .get(&id)
            .and_then(|out| out.first())
            .cloned();
    }

    GraphCompileResult {
        ok: true,
        steps,
        errors: Vec::new(),
        warnings: validation.warnings,
    }
}

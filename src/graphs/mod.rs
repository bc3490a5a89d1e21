//! Visual-graph validation, linearization, and the inverse module mapping.
//!
//! The visual editor represents a flow as a node/edge graph. This module
//! turns that representation into the same step shape the flow compiler
//! emits, and back:
//!
//! ```text
//! VisualGraph ──validate──▶ structural report
//!             ──compile───▶ Vec<LinearStep>   (runtime-consumable)
//! Vec<LinearStep> ──module_from_linear_steps──▶ FlowModule draft
//! ```
//!
//! Validation accumulates every structural issue in one pass (single
//! entry/exit, no branching, no isolated nodes, no cycles via Kahn's
//! algorithm, full reachability from the entry); only dangling edge
//! endpoints short-circuit, since every later check would chase them. The
//! issue codes are a committed vocabulary — see [`GraphIssueCode`].
//!
//! The inverse mapping never hard-fails on missing content: required
//! per-group steps are synthesized with defaults and reported as warnings,
//! so a sketchy editor graph still lands on a usable module draft. Only a
//! completely empty input is an error.
//!
//! # Examples
//!
//! ```rust
//! use stepweave::graphs::{compile, NodePayload, VisualEdge, VisualGraph, VisualNode};
//!
//! let graph = VisualGraph {
//!     nodes: vec![
//!         VisualNode::new("n1", "intro"),
//!         VisualNode::new("n2", "answerChoice"),
//!     ],
//!     edges: vec![VisualEdge::new("e1", "n1", "n2")],
//! };
//!
//! let result = compile(&graph);
//! assert!(result.ok);
//! assert_eq!(result.steps.len(), 2);
//! assert_eq!(result.steps[0].id, "n1");
//! ```

mod compilation;
mod module_mapper;
mod validation;
mod visual;

#[cfg(feature = "petgraph-compat")]
mod petgraph_compat;


pub use compilation::{GraphCompileResult, compile};
pub use module_mapper::{
    MapperIssueCode, ModuleDraftOptions, ModuleDraftResult, module_from_linear_steps,
};
pub use validation::{GraphIssueCode, GraphValidation, validate};
pub use visual::{LinearStep, NodePayload, VisualEdge, VisualGraph, VisualNode};

#[cfg(feature = "petgraph-compat")]
pub use petgraph_compat::{
    NodeIndexMap, PetgraphConversion, VisualDiGraph, is_cyclic, to_dot, to_petgraph,
};

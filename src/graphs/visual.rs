//! Visual graph data model and the linear step it compiles to.

use serde::{Deserialize, Serialize};

use crate::types::{AutoNext, StepKind};

/// Step payload attached to a visual node by the editor.
///
/// All fields are optional; blanks and whitespace count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

/// One node in the visual graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualNode {
    pub id: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub data: NodePayload,
}

impl VisualNode {
    /// Node whose kind doubles as its step kind.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            data: NodePayload::default(),
        }
    }

    #[must_use]
    pub fn with_payload(mut self, data: NodePayload) -> Self {
        self.data = data;
        self
    }

    /// The effective step kind: payload `stepKind` first, then the node's
    /// own kind, defaulting to `unknown`.
    #[must_use]
    pub fn step_kind(&self) -> StepKind {
        let from_payload = self
            .data
            .step_kind
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let name = from_payload.unwrap_or_else(|| self.kind.trim());
        StepKind::from(name)
    }

    /// The effective autoNext signal, if the payload declares one.
    #[must_use]
    pub fn auto_next(&self) -> Option<AutoNext> {
        self.data
            .auto_next
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(AutoNext::from)
    }

    /// The effective group id, if the payload declares one.
    #[must_use]
    pub fn group_id(&self) -> Option<String> {
        self.data
            .group_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    }
}

/// One directed edge in the visual graph.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl VisualEdge {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The editor's node/edge flow representation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualGraph {
    #[serde(default)]
    pub nodes: Vec<VisualNode>,
    #[serde(default)]
    pub edges: Vec<VisualEdge>,
}

/// One step of a linearized visual graph — the same shape the flow
/// compiler emits, minus the kind-specific payload, so the runtime reducer
/// consumes both interchangeably.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearStep {
    pub id: String,
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_next: Option<AutoNext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
}

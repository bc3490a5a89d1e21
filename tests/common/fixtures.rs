//! Shared fixtures for integration tests.

use stepweave::flows::{ContentDocument, ContentGroup, FlowModule, ModuleRef, PerGroupStep};
use stepweave::graphs::{VisualEdge, VisualGraph, VisualNode};
use stepweave::routing::{FlowProfile, FlowProfileBuilder};
use stepweave::types::AudioSource;

/// The standard listening-choice template: description audio, countdown,
/// content audio, answer collection.
pub fn standard_module() -> FlowModule {
    FlowModule::builder("listening_choice.standard.v1", 1)
        .name("Standard listening flow")
        .per_group_step(PerGroupStep::play_audio(AudioSource::Description))
        .per_group_step(PerGroupStep::countdown())
        .per_group_step(PerGroupStep::play_audio(AudioSource::Content))
        .per_group_step(PerGroupStep::answer_choice())
        .build()
}

pub fn content_group(id: &str, prepare_seconds: Option<u32>, answer_seconds: u32) -> ContentGroup {
    ContentGroup {
        id: id.into(),
        prepare_seconds,
        answer_seconds,
    }
}

/// Two groups with different answer windows; the second has none.
pub fn two_group_content() -> ContentDocument {
    ContentDocument {
        groups: vec![content_group("g1", Some(5), 30), content_group("g2", None, 0)],
    }
}

pub fn single_group_content() -> ContentDocument {
    ContentDocument {
        groups: vec![content_group("g1", None, 30)],
    }
}

/// A straight chain where each node's kind doubles as its step kind.
pub fn chain_graph(kinds: &[&str]) -> VisualGraph {
    let nodes = kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| VisualNode::new(format!("n{i}"), *kind))
        .collect::<Vec<_>>();
    let edges = (1..kinds.len())
        .map(|i| VisualEdge::new(format!("e{i}"), format!("n{}", i - 1), format!("n{i}")))
        .collect();
    VisualGraph { nodes, edges }
}

/// A profile builder for the default question type.
pub fn profile(id: &str) -> FlowProfileBuilder {
    FlowProfile::builder(id, "listening_choice", ModuleRef::new("module", 1))
}

mod common;

use common::*;
use stepweave::graphs::{
    ModuleDraftOptions, VisualEdge, VisualGraph, VisualNode, compile, module_from_linear_steps,
    validate,
};
use stepweave::types::StepKind;

#[test]
fn fan_out_fails_with_branch_not_supported() {
    let graph = VisualGraph {
        nodes: vec![
            VisualNode::new("a", "intro"),
            VisualNode::new("b", "playAudio"),
            VisualNode::new("c", "answerChoice"),
        ],
        edges: vec![
            VisualEdge::new("e1", "a", "b"),
            VisualEdge::new("e2", "a", "c"),
        ],
    };
    let result = compile(&graph);
    assert!(!result.ok);
    assert!(result.errors.iter().any(|e| e.code == "branch_not_supported"));
    assert!(result.steps.is_empty());
}

#[test]
fn two_node_loop_fails_with_cycle_detected() {
    let graph = VisualGraph {
        nodes: vec![VisualNode::new("a", "intro"), VisualNode::new("b", "finish")],
        edges: vec![
            VisualEdge::new("e1", "a", "b"),
            VisualEdge::new("e2", "b", "a"),
        ],
    };
    let report = validate(&graph);
    assert!(!report.ok);
    assert!(report.errors.iter().any(|e| e.code == "cycle_detected"));
    // A loop has no entry or exit either.
    assert!(report.errors.iter().any(|e| e.code == "entry_count_invalid"));
    assert!(report.errors.iter().any(|e| e.code == "exit_count_invalid"));
}

#[test]
fn valid_chain_compiles_in_exact_order() {
    let result = compile(&chain_graph(&["intro", "playAudio", "answerChoice"]));
    assert!(result.ok);
    let ids: Vec<&str> = result.steps.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["n0", "n1", "n2"]);
    let kinds: Vec<StepKind> = result.steps.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![StepKind::Intro, StepKind::PlayAudio, StepKind::AnswerChoice]
    );
}

#[test]
fn issue_codes_are_a_committed_vocabulary() {
    // Hosts branch on these strings; changing one is a breaking change.
    let empty = validate(&VisualGraph::default());
    assert_eq!(empty.errors[0].code, "graph_empty");

    let dangling = VisualGraph {
        nodes: vec![VisualNode::new("a", "intro")],
        edges: vec![VisualEdge::new("e1", "ghost", "a")],
    };
    assert_eq!(
        validate(&dangling).errors[0].code,
        "edge_missing_source"
    );

    let mut disconnected = chain_graph(&["intro", "finish"]);
    disconnected.nodes.push(VisualNode::new("x", "countdown"));
    disconnected.nodes.push(VisualNode::new("y", "countdown"));
    disconnected
        .edges
        .push(VisualEdge::new("e9", "x", "y"));
    let report = validate(&disconnected);
    assert!(!report.ok);
    assert!(report.errors.iter().any(|e| e.code == "entry_count_invalid"));
}

#[test]
fn graph_to_module_round_trip() {
    let result = compile(&chain_graph(&[
        "intro",
        "countdown",
        "playAudio",
        "playAudio",
        "answerChoice",
    ]));
    assert!(result.ok);

    let draft = module_from_linear_steps(
        &result.steps,
        &standard_module(),
        &ModuleDraftOptions::default(),
    );
    assert!(draft.ok);
    assert!(draft.module.intro_show_title);
    assert!(draft.module.intro_countdown_enabled);
    assert_eq!(draft.module.per_group_steps.len(), 3);
    // Base identity survives the mapping.
    assert_eq!(draft.module.id, "listening_choice.standard.v1");
}

mod common;

use common::*;
use stepweave::flows::{CompileOptions, compile};
use stepweave::plugins::{
    PluginRegistryError, RendererHints, StepPlugin, StepPluginRegistry, StepSchema,
    standard_registry,
};
use stepweave::types::StepKind;
use stepweave::utils::ids::sequential_factory;

#[test]
fn standard_registry_covers_every_concrete_kind() {
    let registry = standard_registry().unwrap();
    for kind in [
        StepKind::Intro,
        StepKind::GroupPrompt,
        StepKind::Countdown,
        StepKind::PlayAudio,
        StepKind::PromptTone,
        StepKind::AnswerChoice,
        StepKind::Finish,
    ] {
        let plugin = registry.ensure(kind).unwrap();
        assert_eq!(plugin.kind, kind);
        assert!(!plugin.renderer.view.is_empty());
    }
    assert!(registry.get(StepKind::Unknown).is_none());
}

#[test]
fn prompt_tone_reuses_the_previous_screen() {
    let registry = standard_registry().unwrap();
    let tone = registry.ensure(StepKind::PromptTone).unwrap();
    assert!(tone.renderer.reuse_previous_screen);
    assert_eq!(tone.renderer.audio_carrier.as_deref(), Some("promptTone"));

    let audio = registry.ensure(StepKind::PlayAudio).unwrap();
    assert!(!audio.renderer.reuse_previous_screen);
    assert!(audio.renderer.context_info);
}

#[test]
fn list_is_deterministic_by_kind_name() {
    let registry = standard_registry().unwrap();
    let kinds: Vec<&str> = registry.list().iter().map(|p| p.kind.as_str()).collect();
    let mut sorted = kinds.clone();
    sorted.sort_unstable();
    assert_eq!(kinds, sorted);
}

#[test]
fn registries_are_isolated_values() {
    let mut custom = StepPluginRegistry::new("custom");
    custom
        .register(StepPlugin {
            kind: StepKind::Finish,
            schema: StepSchema {
                description: "Terminal".into(),
                required_fields: vec!["kind"],
                optional_fields: vec![],
            },
            renderer: RendererHints {
                view: "finish".into(),
                ..RendererHints::default()
            },
            runtime_reducer: None,
            validator: None,
        })
        .unwrap();

    assert!(custom.get(StepKind::Intro).is_none());
    assert!(standard_registry().unwrap().get(StepKind::Intro).is_some());
}

#[test]
fn registration_errors_carry_diagnostic_codes() {
    use miette::Diagnostic;

    let mut registry = standard_registry().unwrap();
    let duplicate = registry.ensure(StepKind::Intro).unwrap().clone();
    let err = registry.register(duplicate).unwrap_err();
    assert!(matches!(err, PluginRegistryError::DuplicateKind { .. }));
    assert_eq!(
        err.code().map(|c| c.to_string()).as_deref(),
        Some("stepweave::plugins::duplicate_kind")
    );
}

#[test]
fn validators_accept_compiled_steps() {
    let registry = standard_registry().unwrap();
    let result = compile(
        &two_group_content(),
        &standard_module(),
        CompileOptions {
            generate_id: sequential_factory("step"),
            ..CompileOptions::default()
        },
    );

    for step in &result.steps {
        let plugin = registry.ensure(step.kind()).unwrap();
        if let Some(validator) = &plugin.validator {
            let validation = validator(step);
            assert!(validation.ok, "step {} failed validation", step.id);
        }
    }
}

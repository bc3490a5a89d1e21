//! The standard listening-choice plugin set.
//!
//! One plugin per concrete step kind, carrying the renderer hints and
//! schema field lists the player and editors rely on. Every plugin's
//! runtime reducer delegates to generic autoNext handling, so the set is
//! behavior-neutral for the reducer today; the seam exists for kinds that
//! need bespoke stepping later.

use std::sync::Arc;

use super::registry::{
    PluginRegistryError, RendererHints, StepPlugin, StepPluginRegistry, StepSchema, StepValidation,
};
use crate::runtime::{RuntimeState, StepReducerContext, StepReducerFn, clamp_index};
use crate::step::{Step, StepBody};
use crate::types::StepKind;

/// A per-step reducer that advances on the step's own autoNext signal and
/// defers otherwise. Equivalent to the generic fallback; plugins carry it
/// so callers treating the registry as the resolver get identical behavior.
#[must_use]
pub fn auto_next_reducer() -> StepReducerFn {
    Arc::new(|ctx: &StepReducerContext<'_>| {
        let signal = ctx.event.signal_name()?;
        let auto_next = ctx.step.auto_next()?;
        if !auto_next.advances_on(signal) {
            return None;
        }
        Some(RuntimeState::at(clamp_index(
            ctx.state.step_index as i64 + 1,
            ctx.total_steps,
        )))
    })
}

fn kind_validator(expected: StepKind) -> impl Fn(&Step) -> StepValidation + Send + Sync {
    move |step: &Step| {
        if step.kind() == expected {
            StepValidation::passed()
        } else {
            StepValidation::failed(vec![format!(
                "kind must be {expected}, got {}",
                step.kind()
            )])
        }
    }
}

fn plugin(
    kind: StepKind,
    schema: StepSchema,
    renderer: RendererHints,
) -> StepPlugin {
    StepPlugin {
        kind,
        schema,
        renderer,
        runtime_reducer: Some(auto_next_reducer()),
        validator: Some(Arc::new(kind_validator(kind))),
    }
}

/// Builds the registry pre-loaded with the seven listening-choice plugins.
pub fn standard_registry() -> Result<StepPluginRegistry, PluginRegistryError> {
    let mut registry = StepPluginRegistry::new("listening-choice");
    registry.register_many([
        plugin(
            StepKind::Intro,
            StepSchema {
                description: "Intro screen for the question".into(),
                required_fields: vec!["kind"],
                optional_fields: vec![
                    "showTitle",
                    "showTitleDescription",
                    "showDescription",
                    "autoNext",
                ],
            },
            RendererHints {
                view: "intro".into(),
                reuse_previous_screen: false,
                audio_carrier: Some("intro".into()),
                context_info: false,
            },
        ),
        plugin(
            StepKind::GroupPrompt,
            StepSchema {
                description: "Per-group prompt screen".into(),
                required_fields: vec!["kind", "groupId"],
                optional_fields: vec!["showTitle", "autoNext"],
            },
            RendererHints {
                view: "groupPrompt".into(),
                reuse_previous_screen: false,
                audio_carrier: None,
                context_info: false,
            },
        ),
        plugin(
            StepKind::Countdown,
            StepSchema {
                description: "Countdown timer".into(),
                required_fields: vec!["kind", "seconds"],
                optional_fields: vec!["label", "showTitle", "autoNext"],
            },
            RendererHints {
                view: "countdown".into(),
                reuse_previous_screen: false,
                audio_carrier: None,
                context_info: false,
            },
        ),
        plugin(
            StepKind::PlayAudio,
            StepSchema {
                description: "Audio playback step".into(),
                required_fields: vec!["kind", "groupId", "audioSource"],
                optional_fields: vec![
                    "showTitle",
                    "showQuestionTitle",
                    "showQuestionTitleDescription",
                    "showGroupPrompt",
                    "autoNext",
                ],
            },
            RendererHints {
                view: "playAudio".into(),
                reuse_previous_screen: false,
                audio_carrier: Some("playAudio".into()),
                context_info: true,
            },
        ),
        plugin(
            StepKind::PromptTone,
            StepSchema {
                description: "Cue tone between phases".into(),
                required_fields: vec!["kind"],
                optional_fields: vec!["url", "groupId", "showTitle", "autoNext"],
            },
            RendererHints {
                // Tone plays over whatever screen is up; there is no view
                // of its own.
                view: "unsupported".into(),
                reuse_previous_screen: true,
                audio_carrier: Some("promptTone".into()),
                context_info: false,
            },
        ),
        plugin(
            StepKind::AnswerChoice,
            StepSchema {
                description: "Answer collection step".into(),
                required_fields: vec!["kind"],
                optional_fields: vec![
                    "groupId",
                    "questionIds",
                    "showQuestionTitle",
                    "showQuestionTitleDescription",
                    "showGroupPrompt",
                    "autoNext",
                ],
            },
            RendererHints {
                view: "answerChoice".into(),
                reuse_previous_screen: false,
                audio_carrier: None,
                context_info: true,
            },
        ),
        plugin(
            StepKind::Finish,
            StepSchema {
                description: "Terminal screen".into(),
                required_fields: vec!["kind"],
                optional_fields: vec!["text", "showTitle"],
            },
            RendererHints {
                view: "finish".into(),
                reuse_previous_screen: false,
                audio_carrier: None,
                context_info: false,
            },
        ),
    ])?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{ReducerResolver, RuntimeEvent};
    use crate::types::AutoNext;

    #[test]
    fn registers_all_seven_kinds() {
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
            assert!(registry.get(kind).is_some(), "missing plugin for {kind}");
        }
    }

    #[test]
    fn auto_next_reducer_defers_on_mismatched_signal() {
        let registry = standard_registry().unwrap();
        let step = Step::new(
            "c",
            StepBody::Countdown {
                show_title: true,
                seconds: 3,
                label: "Get ready".into(),
            },
            Some(AutoNext::CountdownEnded),
        );
        let reducer = registry.resolve(&step, 0).unwrap();

        let event = RuntimeEvent::signal("audioEnded");
        let ctx = StepReducerContext {
            state: RuntimeState::default(),
            event: &event,
            step: &step,
            step_index: 0,
            total_steps: 3,
        };
        assert!(reducer(&ctx).is_none());

        let event = RuntimeEvent::signal("countdownEnded");
        let ctx = StepReducerContext {
            state: RuntimeState::default(),
            event: &event,
            step: &step,
            step_index: 0,
            total_steps: 3,
        };
        assert_eq!(reducer(&ctx), Some(RuntimeState::at(1)));
    }

    #[test]
    fn validators_check_the_kind() {
        let registry = standard_registry().unwrap();
        let validator = registry
            .ensure(StepKind::Finish)
            .unwrap()
            .validator
            .clone()
            .unwrap();
        assert!(validator(&Step::new("f", StepBody::Finish, None)).ok);
        assert!(!validator(&Step::new("x", StepBody::Unknown, None)).ok);
    }
}

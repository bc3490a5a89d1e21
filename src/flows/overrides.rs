//! The authoritative per-kind override whitelist.
//!
//! Per-question bindings may patch individual compiled steps, keyed by plan
//! key. Patches arrive as raw JSON objects; only the fields listed here are
//! ever applied. Everything else — unknown fields, mistyped values,
//! non-object patches — is dropped silently, so foreign data can never be
//! smuggled into a compiled step. This table is the single source of truth;
//! the compiler and the test suite both read it.

use serde_json::Value;

use crate::step::{Step, StepBody};
use crate::types::StepKind;
use crate::utils::json_ext::{is_object, object_bool, object_str};

/// The override fields accepted for a step kind.
#[must_use]
pub fn allowed_fields(kind: StepKind) -> &'static [&'static str] {
    match kind {
        StepKind::Intro => &["showTitle", "showTitleDescription", "showDescription"],
        StepKind::PlayAudio | StepKind::AnswerChoice => &[
            "showTitle",
            "showQuestionTitle",
            "showQuestionTitleDescription",
            "showGroupPrompt",
        ],
        StepKind::Countdown => &["showTitle", "label"],
        StepKind::PromptTone => &["showTitle", "url"],
        StepKind::GroupPrompt | StepKind::Finish | StepKind::Unknown => &[],
    }
}

/// Applies a whitelisted override patch to a compiled step in place.
///
/// Non-object patches are ignored entirely. Fields outside
/// [`allowed_fields`] for the step's kind are logged at debug level and
/// dropped without report.
pub fn apply(step: &mut Step, patch: &Value) {
    if !is_object(patch) {
        return;
    }

    log_dropped_fields(step.kind(), patch);

    match &mut step.body {
        StepBody::Intro {
            show_title,
            show_title_description,
            show_description,
        } => {
            apply_bool(patch, "showTitle", show_title);
            apply_bool(patch, "showTitleDescription", show_title_description);
            apply_bool(patch, "showDescription", show_description);
        }
        StepBody::PlayAudio {
            show_title,
            show_question_title,
            show_question_title_description,
            show_group_prompt,
            ..
        }
        | StepBody::AnswerChoice {
            show_title,
            show_question_title,
            show_question_title_description,
            show_group_prompt,
            ..
        } => {
            apply_bool(patch, "showTitle", show_title);
            apply_bool(patch, "showQuestionTitle", show_question_title);
            apply_bool(
                patch,
                "showQuestionTitleDescription",
                show_question_title_description,
            );
            apply_bool(patch, "showGroupPrompt", show_group_prompt);
        }
        StepBody::Countdown {
            show_title, label, ..
        } => {
            apply_bool(patch, "showTitle", show_title);
            apply_string(patch, "label", label);
        }
        StepBody::PromptTone {
            show_title, url, ..
        } => {
            apply_bool(patch, "showTitle", show_title);
            apply_string(patch, "url", url);
        }
        StepBody::GroupPrompt { .. } | StepBody::Finish | StepBody::Unknown => {}
    }
}

fn apply_bool(patch: &Value, key: &str, target: &mut bool) {
    if let Some(v) = object_bool(patch, key) {
        *target = v;
    }
}

fn apply_string(patch: &Value, key: &str, target: &mut String) {
    if let Some(v) = object_str(patch, key) {
        *target = v.to_owned();
    }
}

fn log_dropped_fields(kind: StepKind, patch: &Value) {
    let Some(object) = patch.as_object() else {
        return;
    };
    let allowed = allowed_fields(kind);
    let dropped: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !allowed.contains(key))
        .collect();
    if !dropped.is_empty() {
        tracing::debug!(?kind, ?dropped, "dropping override fields outside whitelist");
    }
}

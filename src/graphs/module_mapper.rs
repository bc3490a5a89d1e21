//! Inverse mapping: linear steps back to a module draft.
//!
//! The visual editor produces a step chain; this turns it into a
//! [`FlowModule`] draft so graph-authored flows can re-enter the template
//! pipeline. The mapping is deliberately forgiving: steps the template
//! model cannot express are dropped with a warning, and the three step
//! templates every playable module needs (description audio, content
//! audio, answer collection) are synthesized when missing.

use chrono::Utc;
use std::fmt;
use tracing::instrument;

use super::visual::LinearStep;
use crate::flows::{DEFAULT_COUNTDOWN_LABEL, DEFAULT_COUNTDOWN_SECONDS, DEFAULT_PROMPT_TONE_URL};
use crate::flows::{FlowModule, ModuleStatus, PerGroupStep};
use crate::types::{AudioSource, Issue, StepKind};

/// Issue-code vocabulary of the inverse mapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapperIssueCode {
    /// The input step list was empty; nothing to map.
    CompiledStepsEmpty,
    /// The per-group section mapped to nothing, even after synthesis.
    PerGroupStepsEmpty,
    /// No intro step found; intro display flags are turned off.
    IntroMissing,
    /// A step kind the template model cannot express was dropped.
    UnsupportedInPerGroup,
    /// A description-audio template was synthesized at the front.
    AutoInsertDescriptionAudio,
    /// A content-audio template was synthesized before the answer step.
    AutoInsertContentAudio,
    /// An answer-collection template was synthesized at the end.
    AutoInsertAnswerChoice,
}

impl MapperIssueCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MapperIssueCode::CompiledStepsEmpty => "compiled_steps_empty",
            MapperIssueCode::PerGroupStepsEmpty => "per_group_steps_empty",
            MapperIssueCode::IntroMissing => "intro_missing",
            MapperIssueCode::UnsupportedInPerGroup => "unsupported_in_per_group",
            MapperIssueCode::AutoInsertDescriptionAudio => "auto_insert_description_audio",
            MapperIssueCode::AutoInsertContentAudio => "auto_insert_content_audio",
            MapperIssueCode::AutoInsertAnswerChoice => "auto_insert_answer_choice",
        }
    }
}

impl fmt::Display for MapperIssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Defaults applied to synthesized countdown templates.
#[derive(Clone, Debug)]
pub struct ModuleDraftOptions {
    pub default_countdown_seconds: u32,
    pub default_countdown_label: String,
}

impl Default for ModuleDraftOptions {
    fn default() -> Self {
        Self {
            default_countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
            default_countdown_label: DEFAULT_COUNTDOWN_LABEL.to_owned(),
        }
    }
}

/// Outcome of [`module_from_linear_steps`]: `ok` iff no errors.
#[derive(Clone, Debug)]
pub struct ModuleDraftResult {
    pub ok: bool,
    pub module: FlowModule,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

/// Maps a linear step chain onto a [`FlowModule`] draft based on `base`.
///
/// The draft keeps the base's identity and metadata; every mapped field is
/// overwritten from the step chain:
///
/// - intro display flags go on iff an intro step exists
/// - the intro countdown is any countdown strictly between the intro and
///   the first group anchor
/// - the per-group section starts at the first group-anchor step and keeps
///   only the kinds the template model expresses
/// - `playAudio` occurrences alternate description/content audio, first
///   occurrence being description
/// - missing required templates are synthesized with a warning
#[instrument(skip_all, fields(steps = steps.len(), base = %base.id))]
#[must_use]
pub fn module_from_linear_steps(
    steps: &[LinearStep],
    base: &FlowModule,
    options: &ModuleDraftOptions,
) -> ModuleDraftResult {
    let mut errors: Vec<Issue> = Vec::new();
    let mut warnings: Vec<Issue> = Vec::new();

    let mut module = base.clone();
    module.status = ModuleStatus::Draft;
    module.updated_at = Some(Utc::now());

    if steps.is_empty() {
        errors.push(Issue::new(
            MapperIssueCode::CompiledStepsEmpty,
            "cannot derive a module from an empty step list",
            "steps",
        ));
        return ModuleDraftResult {
            ok: false,
            module,
            errors,
            warnings,
        };
    }

    let intro_index = steps.iter().position(|s| s.kind == StepKind::Intro);
    let has_intro = intro_index.is_some();
    module.intro_show_title = has_intro;
    module.intro_show_title_description = has_intro;
    module.intro_show_description = has_intro;
    if !has_intro {
        warnings.push(Issue::new(
            MapperIssueCode::IntroMissing,
            "no intro step found; intro display flags are disabled",
            "module.introShowTitle",
        ));
    }

    let first_anchor_index = steps.iter().position(|s| s.kind.is_group_anchor());

    // Intro countdown: a countdown after the intro but before the first
    // group anchor.
    let intro_countdown = steps.iter().enumerate().any(|(i, s)| {
        s.kind == StepKind::Countdown
            && intro_index.is_none_or(|intro| i > intro)
            && first_anchor_index.is_none_or(|anchor| i < anchor)
    });
    module.intro_countdown_enabled = intro_countdown;
    if intro_countdown {
        module.intro_countdown_show_title = true;
        module.intro_countdown_seconds = options.default_countdown_seconds;
        module.intro_countdown_label = options.default_countdown_label.clone();
    }

    let start = first_anchor_index
        .or_else(|| steps.iter().position(|s| s.kind.is_per_group()))
        .unwrap_or(0);
    let section = &steps[start..];

    let mut per_group: Vec<PerGroupStep> = Vec::new();
    let mut play_audio_count = 0usize;
    for (i, step) in section.iter().enumerate() {
        match step.kind {
            StepKind::PlayAudio => {
                let source = if play_audio_count % 2 == 0 {
                    AudioSource::Description
                } else {
                    AudioSource::Content
                };
                play_audio_count += 1;
                per_group.push(PerGroupStep::play_audio(source));
            }
            StepKind::Countdown => {
                per_group.push(PerGroupStep::Countdown {
                    show_title: true,
                    seconds: Some(options.default_countdown_seconds),
                    label: Some(options.default_countdown_label.clone()),
                });
            }
            StepKind::PromptTone => {
                per_group.push(PerGroupStep::PromptTone {
                    show_title: true,
                    url: Some(DEFAULT_PROMPT_TONE_URL.to_owned()),
                });
            }
            StepKind::AnswerChoice => {
                per_group.push(PerGroupStep::answer_choice());
            }
            other => {
                warnings.push(Issue::new(
                    MapperIssueCode::UnsupportedInPerGroup,
                    format!("step kind {other} cannot appear in the per-group section; dropped"),
                    format!("steps({i})"),
                ));
            }
        }
    }

    ensure_required(&mut per_group, &mut warnings);

    // Unreachable while ensure_required synthesizes the three core
    // templates; kept as a guard.
    if per_group.is_empty() {
        errors.push(Issue::new(
            MapperIssueCode::PerGroupStepsEmpty,
            "the per-group section mapped to no templates",
            "module.perGroupSteps",
        ));
    }
    module.per_group_steps = per_group;

    ModuleDraftResult {
        ok: errors.is_empty(),
        module,
        errors,
        warnings,
    }
}

fn has_audio(per_group: &[PerGroupStep], wanted: AudioSource) -> bool {
    per_group.iter().any(|step| {
        matches!(
            step,
            PerGroupStep::PlayAudio { audio_source, .. } if *audio_source == wanted
        )
    })
}

/// Every playable module needs description audio, content audio, and an
/// answer step; synthesize whichever are missing.
fn ensure_required(per_group: &mut Vec<PerGroupStep>, warnings: &mut Vec<Issue>) {
    if !has_audio(per_group, AudioSource::Description) {
        per_group.insert(0, PerGroupStep::play_audio(AudioSource::Description));
        warnings.push(Issue::new(
            MapperIssueCode::AutoInsertDescriptionAudio,
            "no description audio step; one was inserted at the front",
            "module.perGroupSteps",
        ));
    }

    if !has_audio(per_group, AudioSource::Content) {
        let insert_at = per_group
            .iter()
            .position(|step| matches!(step, PerGroupStep::AnswerChoice { .. }))
            .unwrap_or(per_group.len());
        per_group.insert(insert_at, PerGroupStep::play_audio(AudioSource::Content));
        warnings.push(Issue::new(
            MapperIssueCode::AutoInsertContentAudio,
            "no content audio step; one was inserted before the answer step",
            "module.perGroupSteps",
        ));
    }

    if !per_group
        .iter()
        .any(|step| matches!(step, PerGroupStep::AnswerChoice { .. }))
    {
        per_group.push(PerGroupStep::answer_choice());
        warnings.push(Issue::new(
            MapperIssueCode::AutoInsertAnswerChoice,
            "no answer step; one was appended",
            "module.perGroupSteps",
        ));
    }
}

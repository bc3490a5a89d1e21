//! Content + module → ordered step list.

use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fmt;
use tracing::instrument;

use super::content::ContentDocument;
use super::module::{FlowModule, PerGroupStep};
use super::overrides;
use super::{DEFAULT_COUNTDOWN_LABEL, DEFAULT_COUNTDOWN_SECONDS, DEFAULT_PROMPT_TONE_URL};
use crate::step::{Step, StepBody};
use crate::types::{AutoNext, Issue, StepKind};
use crate::utils::ids::{IdFactory, uuid_factory};

/// Warning vocabulary of the flow compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompileWarningCode {
    /// Intro countdown enabled but configured with zero seconds; the step
    /// is skipped.
    IntroCountdownZeroSeconds,
    /// A promptTone template declared no url; the fixed fallback asset was
    /// substituted.
    PromptToneUrlDefaulted,
}

impl CompileWarningCode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            CompileWarningCode::IntroCountdownZeroSeconds => "intro_countdown_zero_seconds",
            CompileWarningCode::PromptToneUrlDefaulted => "prompt_tone_url_defaulted",
        }
    }
}

impl fmt::Display for CompileWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One planned step: its stable key plus the template-derived body.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanItem {
    pub key: String,
    pub body: StepBody,
    pub auto_next: Option<AutoNext>,
}

/// The keyed plan plus template-level warnings.
#[derive(Clone, Debug, Default)]
pub struct CompilePlan {
    pub items: Vec<PlanItem>,
    pub warnings: Vec<Issue>,
}

/// Override patches keyed by plan key.
pub type Overrides = FxHashMap<String, Value>;

/// Compilation inputs beyond the content and module snapshots.
pub struct CompileOptions {
    /// Id source for the emitted steps; the only non-determinism here.
    pub generate_id: IdFactory,
    /// Whitelisted per-step patches keyed by plan key.
    pub overrides: Overrides,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            generate_id: uuid_factory(),
            overrides: Overrides::default(),
        }
    }
}

/// Ordered steps, their plan keys (index-aligned), and accumulated
/// warnings.
#[derive(Clone, Debug, Default)]
pub struct CompileResult {
    pub steps: Vec<Step>,
    pub keys: Vec<String>,
    pub warnings: Vec<Issue>,
}

fn non_empty(text: &str, fallback: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        fallback.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Builds the ordered `{key, templateStep}` plan: intro, optional intro
/// countdown, then one instance of every per-group template for every
/// content group in document order.
///
/// Keys are deterministic: `intro`, `intro.countdown`,
/// `g{groupIndex}.{kind}{suffix}` where `suffix` numbers repeated kinds
/// within a group from 2.
#[must_use]
pub fn compile_plan(content: &ContentDocument, module: &FlowModule) -> CompilePlan {
    let mut items = Vec::new();
    let mut warnings = Vec::new();

    items.push(PlanItem {
        key: "intro".to_owned(),
        body: StepBody::Intro {
            show_title: module.intro_show_title,
            show_title_description: module.intro_show_title_description,
            show_description: module.intro_show_description,
        },
        auto_next: Some(AutoNext::AudioEnded),
    });

    if module.intro_countdown_enabled {
        if module.intro_countdown_seconds > 0 {
            items.push(PlanItem {
                key: "intro.countdown".to_owned(),
                body: StepBody::Countdown {
                    show_title: module.intro_countdown_show_title,
                    seconds: module.intro_countdown_seconds,
                    label: non_empty(&module.intro_countdown_label, DEFAULT_COUNTDOWN_LABEL),
                },
                auto_next: Some(AutoNext::CountdownEnded),
            });
        } else {
            warnings.push(Issue::new(
                CompileWarningCode::IntroCountdownZeroSeconds,
                "intro countdown is enabled with zero seconds; the step is skipped",
                "module.introCountdownSeconds",
            ));
        }
    }

    // Template-level warnings fire once per template, not per group.
    for (index, template) in module.per_group_steps.iter().enumerate() {
        if matches!(template, PerGroupStep::PromptTone { url: None, .. }) {
            warnings.push(Issue::new(
                CompileWarningCode::PromptToneUrlDefaulted,
                format!("promptTone declares no url; defaulting to {DEFAULT_PROMPT_TONE_URL}"),
                format!("module.perGroupSteps({index})"),
            ));
        }
    }

    for (group_index, group) in content.groups.iter().enumerate() {
        let mut kind_count: FxHashMap<StepKind, u32> = FxHashMap::default();

        for template in &module.per_group_steps {
            let kind = template_kind(template);
            let count = kind_count.entry(kind).or_insert(0);
            *count += 1;
            let suffix = if *count > 1 {
                count.to_string()
            } else {
                String::new()
            };
            let key = format!("g{group_index}.{kind}{suffix}");

            let (body, auto_next) = match template {
                PerGroupStep::PlayAudio {
                    audio_source,
                    show_title,
                    show_question_title,
                    show_question_title_description,
                    show_group_prompt,
                } => (
                    StepBody::PlayAudio {
                        group_id: group.id.clone(),
                        audio_source: *audio_source,
                        show_title: *show_title,
                        show_question_title: *show_question_title,
                        show_question_title_description: *show_question_title_description,
                        show_group_prompt: *show_group_prompt,
                    },
                    AutoNext::AudioEnded,
                ),
                PerGroupStep::Countdown {
                    show_title,
                    seconds,
                    label,
                } => (
                    StepBody::Countdown {
                        show_title: *show_title,
                        seconds: group
                            .prepare_seconds
                            .unwrap_or_else(|| seconds.unwrap_or(DEFAULT_COUNTDOWN_SECONDS)),
                        label: label
                            .clone()
                            .unwrap_or_else(|| DEFAULT_COUNTDOWN_LABEL.to_owned()),
                    },
                    AutoNext::CountdownEnded,
                ),
                PerGroupStep::PromptTone { show_title, url } => (
                    StepBody::PromptTone {
                        group_id: group.id.clone(),
                        show_title: *show_title,
                        url: url
                            .clone()
                            .unwrap_or_else(|| DEFAULT_PROMPT_TONE_URL.to_owned()),
                    },
                    AutoNext::AudioEnded,
                ),
                PerGroupStep::AnswerChoice {
                    show_title,
                    show_question_title,
                    show_question_title_description,
                    show_group_prompt,
                } => (
                    StepBody::AnswerChoice {
                        group_id: group.id.clone(),
                        show_title: *show_title,
                        show_question_title: *show_question_title,
                        show_question_title_description: *show_question_title_description,
                        show_group_prompt: *show_group_prompt,
                    },
                    if group.answer_seconds > 0 {
                        AutoNext::TimeEnded
                    } else {
                        AutoNext::TapNext
                    },
                ),
            };

            items.push(PlanItem {
                key,
                body,
                auto_next: Some(auto_next),
            });
        }
    }

    CompilePlan { items, warnings }
}

fn template_kind(template: &PerGroupStep) -> StepKind {
    match template {
        PerGroupStep::PlayAudio { .. } => StepKind::PlayAudio,
        PerGroupStep::Countdown { .. } => StepKind::Countdown,
        PerGroupStep::PromptTone { .. } => StepKind::PromptTone,
        PerGroupStep::AnswerChoice { .. } => StepKind::AnswerChoice,
    }
}

/// Instantiates the plan: assigns each planned step a fresh id via the
/// injected factory, then applies the override keyed by its plan key
/// through the whitelist.
///
/// Compiling the same inputs with the same id factory yields identical
/// output.
#[instrument(skip_all, fields(module = %module.id, version = module.version, groups = content.groups.len()))]
#[must_use]
pub fn compile(
    content: &ContentDocument,
    module: &FlowModule,
    mut options: CompileOptions,
) -> CompileResult {
    let plan = compile_plan(content, module);
    let mut steps = Vec::with_capacity(plan.items.len());
    let mut keys = Vec::with_capacity(plan.items.len());

    for item in plan.items {
        let mut step = Step::new((options.generate_id)(), item.body, item.auto_next);
        if let Some(patch) = options.overrides.get(&item.key) {
            overrides::apply(&mut step, patch);
        }
        keys.push(item.key);
        steps.push(step);
    }

    CompileResult {
        steps,
        keys,
        warnings: plan.warnings,
    }
}

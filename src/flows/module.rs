//! Flow module templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::lifecycle::ModuleStatus;
use super::{DEFAULT_COUNTDOWN_LABEL, DEFAULT_COUNTDOWN_SECONDS};
use crate::types::AudioSource;

fn default_true() -> bool {
    true
}

fn default_countdown_seconds() -> u32 {
    DEFAULT_COUNTDOWN_SECONDS
}

fn default_countdown_label() -> String {
    DEFAULT_COUNTDOWN_LABEL.to_owned()
}

/// Reference to one immutable module version.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleRef {
    pub id: String,
    pub version: u32,
}

impl ModuleRef {
    pub fn new(id: impl Into<String>, version: u32) -> Self {
        Self {
            id: id.into(),
            version,
        }
    }
}

/// One per-group step template, instantiated once per content group.
///
/// Display flags default to `true`; `countdown.seconds` is a fallback only
/// (the group's `prepare_seconds` wins at compile time).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PerGroupStep {
    #[serde(rename_all = "camelCase")]
    PlayAudio {
        audio_source: AudioSource,
        #[serde(default = "default_true")]
        show_title: bool,
        #[serde(default = "default_true")]
        show_question_title: bool,
        #[serde(default = "default_true")]
        show_question_title_description: bool,
        #[serde(default = "default_true")]
        show_group_prompt: bool,
    },
    #[serde(rename_all = "camelCase")]
    Countdown {
        #[serde(default = "default_true")]
        show_title: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seconds: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    PromptTone {
        #[serde(default = "default_true")]
        show_title: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    AnswerChoice {
        #[serde(default = "default_true")]
        show_title: bool,
        #[serde(default = "default_true")]
        show_question_title: bool,
        #[serde(default = "default_true")]
        show_question_title_description: bool,
        #[serde(default = "default_true")]
        show_group_prompt: bool,
    },
}

impl PerGroupStep {
    /// Audio template with all display flags on.
    #[must_use]
    pub fn play_audio(audio_source: AudioSource) -> Self {
        PerGroupStep::PlayAudio {
            audio_source,
            show_title: true,
            show_question_title: true,
            show_question_title_description: true,
            show_group_prompt: true,
        }
    }

    /// Countdown template deferring seconds/label to compile-time defaults.
    #[must_use]
    pub fn countdown() -> Self {
        PerGroupStep::Countdown {
            show_title: true,
            seconds: None,
            label: None,
        }
    }

    /// Prompt tone template deferring the url to the fixed fallback asset.
    #[must_use]
    pub fn prompt_tone() -> Self {
        PerGroupStep::PromptTone {
            show_title: true,
            url: None,
        }
    }

    /// Answer template with all display flags on.
    #[must_use]
    pub fn answer_choice() -> Self {
        PerGroupStep::AnswerChoice {
            show_title: true,
            show_question_title: true,
            show_question_title_description: true,
            show_group_prompt: true,
        }
    }
}

/// A versioned, reusable flow template for one question shape.
///
/// `(id, version)` is immutable content once created: editing produces a
/// new version, and only `status` changes in place — exclusively through
/// [`ModuleStatus::can_transition`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowModule {
    pub id: String,
    /// Version number, starting at 1.
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub status: ModuleStatus,

    #[serde(default = "default_true")]
    pub intro_show_title: bool,
    #[serde(default = "default_true")]
    pub intro_show_title_description: bool,
    #[serde(default = "default_true")]
    pub intro_show_description: bool,

    #[serde(default = "default_true")]
    pub intro_countdown_enabled: bool,
    #[serde(default = "default_true")]
    pub intro_countdown_show_title: bool,
    #[serde(default = "default_countdown_seconds")]
    pub intro_countdown_seconds: u32,
    #[serde(default = "default_countdown_label")]
    pub intro_countdown_label: String,

    #[serde(default)]
    pub per_group_steps: Vec<PerGroupStep>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FlowModule {
    /// Starts a builder for a new draft version.
    #[must_use]
    pub fn builder(id: impl Into<String>, version: u32) -> FlowModuleBuilder {
        FlowModuleBuilder::new(id, version)
    }

    /// Reference to this `(id, version)`.
    #[must_use]
    pub fn module_ref(&self) -> ModuleRef {
        ModuleRef::new(self.id.clone(), self.version)
    }
}

/// Builder for [`FlowModule`] drafts with the standard defaults.
#[derive(Clone, Debug)]
pub struct FlowModuleBuilder {
    module: FlowModule,
}

impl FlowModuleBuilder {
    #[must_use]
    pub fn new(id: impl Into<String>, version: u32) -> Self {
        Self {
            module: FlowModule {
                id: id.into(),
                version,
                name: String::new(),
                note: None,
                status: ModuleStatus::Draft,
                intro_show_title: true,
                intro_show_title_description: true,
                intro_show_description: true,
                intro_countdown_enabled: true,
                intro_countdown_show_title: true,
                intro_countdown_seconds: DEFAULT_COUNTDOWN_SECONDS,
                intro_countdown_label: DEFAULT_COUNTDOWN_LABEL.to_owned(),
                per_group_steps: Vec::new(),
                created_at: None,
                updated_at: None,
            },
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.module.name = name.into();
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.module.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: ModuleStatus) -> Self {
        self.module.status = status;
        self
    }

    #[must_use]
    pub fn intro_countdown(mut self, enabled: bool, seconds: u32) -> Self {
        self.module.intro_countdown_enabled = enabled;
        self.module.intro_countdown_seconds = seconds;
        self
    }

    #[must_use]
    pub fn per_group_step(mut self, step: PerGroupStep) -> Self {
        self.module.per_group_steps.push(step);
        self
    }

    #[must_use]
    pub fn per_group_steps(mut self, steps: impl IntoIterator<Item = PerGroupStep>) -> Self {
        self.module.per_group_steps.extend(steps);
        self
    }

    #[must_use]
    pub fn build(self) -> FlowModule {
        self.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_standard_defaults() {
        let module = FlowModule::builder("m", 1).build();
        assert_eq!(module.status, ModuleStatus::Draft);
        assert!(module.intro_show_title);
        assert!(module.intro_countdown_enabled);
        assert_eq!(module.intro_countdown_seconds, DEFAULT_COUNTDOWN_SECONDS);
    }

    #[test]
    fn per_group_steps_deserialize_with_defaults() {
        let json = r#"[
            {"kind": "playAudio", "audioSource": "description"},
            {"kind": "countdown"},
            {"kind": "answerChoice", "showGroupPrompt": false}
        ]"#;
        let steps: Vec<PerGroupStep> = serde_json::from_str(json).unwrap();
        assert_eq!(steps[0], PerGroupStep::play_audio(AudioSource::Description));
        assert_eq!(steps[1], PerGroupStep::countdown());
        assert!(matches!(
            steps[2],
            PerGroupStep::AnswerChoice {
                show_group_prompt: false,
                ..
            }
        ));
    }
}

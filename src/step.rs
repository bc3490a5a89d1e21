//! Compiled step values.
//!
//! A [`Step`] is one executable unit in a compiled flow: play audio, run a
//! countdown, collect an answer. Steps are produced by
//! [`crate::flows::compile`] and by the visual-graph pipeline, and consumed
//! by the runtime reducer. The kind-specific payload lives in [`StepBody`],
//! a tagged enum so per-kind handling is exhaustively checked.
//!
//! Serialization uses the persisted wire shape: a `kind` tag plus camelCase
//! fields, with `autoNext` flattened alongside.
//!
//! # Examples
//!
//! ```rust
//! use stepweave::step::{Step, StepBody};
//! use stepweave::types::{AutoNext, StepKind};
//!
//! let step = Step {
//!     id: "s1".into(),
//!     body: StepBody::Countdown {
//!         show_title: true,
//!         seconds: 3,
//!         label: "Get ready".into(),
//!     },
//!     auto_next: Some(AutoNext::CountdownEnded),
//! };
//!
//! assert_eq!(step.kind(), StepKind::Countdown);
//!
//! let json = serde_json::to_value(&step).unwrap();
//! assert_eq!(json["kind"], "countdown");
//! assert_eq!(json["autoNext"], "countdownEnded");
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{AudioSource, AutoNext, StepKind};

/// Kind-specific payload of a compiled step.
///
/// Display flags default to `true` in the compiler; they are carried here
/// explicitly so a compiled step is self-contained.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepBody {
    #[serde(rename_all = "camelCase")]
    Intro {
        show_title: bool,
        show_title_description: bool,
        show_description: bool,
    },
    #[serde(rename_all = "camelCase")]
    GroupPrompt { group_id: String, show_title: bool },
    #[serde(rename_all = "camelCase")]
    Countdown {
        show_title: bool,
        seconds: u32,
        label: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayAudio {
        group_id: String,
        audio_source: AudioSource,
        show_title: bool,
        show_question_title: bool,
        show_question_title_description: bool,
        show_group_prompt: bool,
    },
    #[serde(rename_all = "camelCase")]
    PromptTone {
        group_id: String,
        show_title: bool,
        url: String,
    },
    #[serde(rename_all = "camelCase")]
    AnswerChoice {
        group_id: String,
        show_title: bool,
        show_question_title: bool,
        show_question_title_description: bool,
        show_group_prompt: bool,
    },
    Finish,
    Unknown,
}

impl StepBody {
    /// The discriminant of this body.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        match self {
            StepBody::Intro { .. } => StepKind::Intro,
            StepBody::GroupPrompt { .. } => StepKind::GroupPrompt,
            StepBody::Countdown { .. } => StepKind::Countdown,
            StepBody::PlayAudio { .. } => StepKind::PlayAudio,
            StepBody::PromptTone { .. } => StepKind::PromptTone,
            StepBody::AnswerChoice { .. } => StepKind::AnswerChoice,
            StepBody::Finish => StepKind::Finish,
            StepBody::Unknown => StepKind::Unknown,
        }
    }

    /// The content group this body belongs to, if any.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        match self {
            StepBody::GroupPrompt { group_id, .. }
            | StepBody::PlayAudio { group_id, .. }
            | StepBody::PromptTone { group_id, .. }
            | StepBody::AnswerChoice { group_id, .. } => Some(group_id.as_str()),
            _ => None,
        }
    }
}

/// One executable unit in a compiled flow.
///
/// Ids are unique within one compiled step list; they come from the
/// caller-injected id factory, never from the compiler itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    #[serde(flatten)]
    pub body: StepBody,
    #[serde(rename = "autoNext", default, skip_serializing_if = "Option::is_none")]
    pub auto_next: Option<AutoNext>,
}

impl Step {
    pub fn new(id: impl Into<String>, body: StepBody, auto_next: Option<AutoNext>) -> Self {
        Self {
            id: id.into(),
            body,
            auto_next,
        }
    }

    /// The discriminant of this step.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.body.kind()
    }
}

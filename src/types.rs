//! Core types for the Stepweave flow engine.
//!
//! This module defines the discriminants shared by every component: the
//! closed set of step kinds, the auto-advance signal vocabulary, and the
//! audio source selector. These are the domain concepts that define what a
//! compiled flow *is*.
//!
//! # Key Types
//!
//! - [`StepKind`]: identifies the kind of a step in a compiled flow
//! - [`AutoNext`]: the signal that auto-advances a step (or `TapNext` for
//!   manual-only advance)
//! - [`AudioSource`]: which audio asset a `playAudio` step carries
//! - [`Issue`]: the `{code, message, path}` diagnostic record accumulated
//!   by compilers and validators
//!
//! # Examples
//!
//! ```rust
//! use stepweave::types::{StepKind, AutoNext};
//!
//! let kind = StepKind::PlayAudio;
//! assert_eq!(kind.as_str(), "playAudio");
//!
//! // Forward compatibility: unknown kinds decode to Unknown
//! assert_eq!(StepKind::from("somethingNew"), StepKind::Unknown);
//!
//! // tapNext never auto-advances
//! assert!(!AutoNext::TapNext.advances_on("tapNext"));
//! assert!(AutoNext::AudioEnded.advances_on("audioEnded"));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the kind of a step within a compiled flow.
///
/// The set is closed: every step the compilers emit is one of these
/// variants, so per-kind handling is exhaustively checked. Kinds arriving
/// from external data (visual-graph payloads, persisted JSON) that are not
/// in the set decode to [`Unknown`](Self::Unknown).
///
/// # Examples
///
/// ```rust
/// use stepweave::types::StepKind;
///
/// assert_eq!(StepKind::AnswerChoice.as_str(), "answerChoice");
/// assert_eq!(StepKind::from("countdown"), StepKind::Countdown);
/// assert_eq!(StepKind::from(""), StepKind::Unknown);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StepKind {
    /// Opening screen introducing the question.
    Intro,
    /// Prompt screen shown once per content group.
    GroupPrompt,
    /// Countdown timer step.
    Countdown,
    /// Audio playback step (description or content audio).
    PlayAudio,
    /// Short cue tone played between phases.
    PromptTone,
    /// Answer collection step.
    AnswerChoice,
    /// Terminal screen after the last group.
    Finish,
    /// Any kind outside the closed set; rendered as unsupported.
    Unknown,
}

impl StepKind {
    /// The wire name of this kind (camelCase, as persisted).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Intro => "intro",
            StepKind::GroupPrompt => "groupPrompt",
            StepKind::Countdown => "countdown",
            StepKind::PlayAudio => "playAudio",
            StepKind::PromptTone => "promptTone",
            StepKind::AnswerChoice => "answerChoice",
            StepKind::Finish => "finish",
            StepKind::Unknown => "unknown",
        }
    }

    /// Returns `true` if this kind anchors the start of the per-group
    /// section when reading a linear step sequence.
    #[must_use]
    pub fn is_group_anchor(&self) -> bool {
        matches!(
            self,
            StepKind::PlayAudio
                | StepKind::PromptTone
                | StepKind::AnswerChoice
                | StepKind::GroupPrompt
        )
    }

    /// Returns `true` if this kind may appear as a per-group step template.
    #[must_use]
    pub fn is_per_group(&self) -> bool {
        matches!(
            self,
            StepKind::PlayAudio
                | StepKind::Countdown
                | StepKind::PromptTone
                | StepKind::AnswerChoice
        )
    }
}

impl From<&str> for StepKind {
    fn from(s: &str) -> Self {
        match s.trim() {
            "intro" => StepKind::Intro,
            "groupPrompt" => StepKind::GroupPrompt,
            "countdown" => StepKind::Countdown,
            "playAudio" => StepKind::PlayAudio,
            "promptTone" => StepKind::PromptTone,
            "answerChoice" => StepKind::AnswerChoice,
            "finish" => StepKind::Finish,
            _ => StepKind::Unknown,
        }
    }
}

impl From<String> for StepKind {
    fn from(s: String) -> Self {
        StepKind::from(s.as_str())
    }
}

impl From<StepKind> for String {
    fn from(kind: StepKind) -> Self {
        kind.as_str().to_owned()
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The named signal that auto-advances a step.
///
/// `TapNext` denotes manual-only advance: the runtime never auto-advances
/// on it. [`Signal`](Self::Signal) carries graph-authored custom signals
/// and round-trips as a plain string.
///
/// # Examples
///
/// ```rust
/// use stepweave::types::AutoNext;
///
/// assert!(AutoNext::CountdownEnded.advances_on("countdownEnded"));
/// assert!(!AutoNext::CountdownEnded.advances_on("audioEnded"));
/// assert!(!AutoNext::TapNext.advances_on("tapNext"));
///
/// let custom = AutoNext::from("recordingEnded");
/// assert_eq!(custom, AutoNext::Signal("recordingEnded".into()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AutoNext {
    /// Manual navigation only; never auto-advances.
    TapNext,
    /// Advance when the step's audio finishes.
    AudioEnded,
    /// Advance when the countdown reaches zero.
    CountdownEnded,
    /// Advance when the answer window elapses.
    TimeEnded,
    /// Custom signal name matched verbatim against event types.
    Signal(String),
}

impl AutoNext {
    /// The signal name matched against runtime event types.
    #[must_use]
    pub fn signal_name(&self) -> &str {
        match self {
            AutoNext::TapNext => "tapNext",
            AutoNext::AudioEnded => "audioEnded",
            AutoNext::CountdownEnded => "countdownEnded",
            AutoNext::TimeEnded => "timeEnded",
            AutoNext::Signal(name) => name.as_str(),
        }
    }

    /// Whether an event with the given signal auto-advances past a step
    /// carrying this `AutoNext`. `TapNext` and empty signals never do.
    #[must_use]
    pub fn advances_on(&self, signal: &str) -> bool {
        if matches!(self, AutoNext::TapNext) {
            return false;
        }
        let name = self.signal_name();
        !name.is_empty() && !signal.is_empty() && name == signal
    }
}

impl From<&str> for AutoNext {
    fn from(s: &str) -> Self {
        match s.trim() {
            "tapNext" => AutoNext::TapNext,
            "audioEnded" => AutoNext::AudioEnded,
            "countdownEnded" => AutoNext::CountdownEnded,
            "timeEnded" => AutoNext::TimeEnded,
            other => AutoNext::Signal(other.to_owned()),
        }
    }
}

impl From<String> for AutoNext {
    fn from(s: String) -> Self {
        AutoNext::from(s.as_str())
    }
}

impl From<AutoNext> for String {
    fn from(value: AutoNext) -> Self {
        value.signal_name().to_owned()
    }
}

impl fmt::Display for AutoNext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signal_name())
    }
}

/// Which audio asset a `playAudio` step carries.
///
/// Anything that is not explicitly `description` normalizes to `Content`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    /// The group's description audio.
    Description,
    /// The group's content audio.
    #[default]
    Content,
}

impl AudioSource {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioSource::Description => "description",
            AudioSource::Content => "content",
        }
    }
}

impl From<&str> for AudioSource {
    fn from(s: &str) -> Self {
        if s == "description" {
            AudioSource::Description
        } else {
            AudioSource::Content
        }
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One diagnostic record accumulated by a compiler or validator.
///
/// Codes come from per-component vocabularies (see
/// [`crate::graphs::GraphIssueCode`] and friends); `path` points at the
/// offending location in the input, e.g. `graph.nodes(n2)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub code: String,
    pub message: String,
    pub path: String,
}

impl Issue {
    pub fn new(
        code: impl fmt::Display,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.code, self.message, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_kind_round_trips_through_strings() {
        for kind in [
            StepKind::Intro,
            StepKind::GroupPrompt,
            StepKind::Countdown,
            StepKind::PlayAudio,
            StepKind::PromptTone,
            StepKind::AnswerChoice,
            StepKind::Finish,
            StepKind::Unknown,
        ] {
            assert_eq!(StepKind::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_kinds_decode_to_unknown() {
        assert_eq!(StepKind::from("branching"), StepKind::Unknown);
        assert_eq!(StepKind::from("  "), StepKind::Unknown);
    }

    #[test]
    fn tap_next_never_advances() {
        assert!(!AutoNext::TapNext.advances_on("tapNext"));
        assert!(!AutoNext::TapNext.advances_on("audioEnded"));
    }

    #[test]
    fn custom_signals_match_verbatim() {
        let custom = AutoNext::from("recordingEnded");
        assert!(custom.advances_on("recordingEnded"));
        assert!(!custom.advances_on("audioEnded"));
    }

    #[test]
    fn empty_signal_never_matches() {
        let empty = AutoNext::Signal(String::new());
        assert!(!empty.advances_on(""));
        assert!(!empty.advances_on("audioEnded"));
    }

    #[test]
    fn audio_source_normalizes_to_content() {
        assert_eq!(AudioSource::from("description"), AudioSource::Description);
        assert_eq!(AudioSource::from("content"), AudioSource::Content);
        assert_eq!(AudioSource::from("garbage"), AudioSource::Content);
    }
}

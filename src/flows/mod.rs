//! Flow modules and the flow compiler.
//!
//! A [`FlowModule`] is a versioned, reusable template describing how to
//! sequence steps for one question shape. [`compile`] instantiates it over
//! a read-only [`ContentDocument`] into an ordered step list:
//!
//! ```text
//! content + module ──compile_plan──▶ keyed plan ──ids + overrides──▶ Vec<Step>
//! ```
//!
//! Plan keys are deterministic (`intro`, `intro.countdown`,
//! `g{groupIndex}.{kind}{suffix}`) so per-question override patches stay
//! stable across recompiles. Overrides pass through one authoritative
//! per-kind whitelist ([`overrides`]); anything outside it is dropped
//! silently.
//!
//! Module status moves only through [`ModuleStatus::can_transition`].
//!
//! # Examples
//!
//! ```rust
//! use stepweave::flows::{compile, CompileOptions, FlowModule, PerGroupStep};
//! use stepweave::flows::{ContentDocument, ContentGroup};
//! use stepweave::types::AudioSource;
//! use stepweave::utils::ids::sequential_factory;
//!
//! let module = FlowModule::builder("listening_choice.standard.v1", 1)
//!     .name("Standard")
//!     .per_group_step(PerGroupStep::play_audio(AudioSource::Content))
//!     .per_group_step(PerGroupStep::answer_choice())
//!     .build();
//!
//! let content = ContentDocument {
//!     groups: vec![ContentGroup {
//!         id: "g1".into(),
//!         prepare_seconds: None,
//!         answer_seconds: 30,
//!     }],
//! };
//!
//! let result = compile(
//!     &content,
//!     &module,
//!     CompileOptions {
//!         generate_id: sequential_factory("step"),
//!         ..CompileOptions::default()
//!     },
//! );
//! // intro + countdown + 2 per-group steps
//! assert_eq!(result.steps.len(), 4);
//! assert_eq!(result.keys[0], "intro");
//! assert_eq!(result.keys[2], "g0.playAudio");
//! ```

mod compiler;
mod content;
mod lifecycle;
mod module;
pub mod overrides;

pub use compiler::{
    CompileOptions, CompilePlan, CompileResult, CompileWarningCode, Overrides, PlanItem, compile,
    compile_plan,
};
pub use content::{ContentDocument, ContentGroup};
pub use lifecycle::ModuleStatus;
pub use module::{FlowModule, FlowModuleBuilder, ModuleRef, PerGroupStep};

/// Fallback countdown duration when neither the group nor the template
/// declares one.
pub const DEFAULT_COUNTDOWN_SECONDS: u32 = 3;

/// Fallback countdown label.
pub const DEFAULT_COUNTDOWN_LABEL: &str = "Get ready";

/// Fixed fallback asset for prompt tones without a declared url.
pub const DEFAULT_PROMPT_TONE_URL: &str = "/static/audio/small_time.mp3";

//! # Stepweave: Flow Engine for Step-driven Exam Content
//!
//! Stepweave compiles declarative flow templates into ordered step lists,
//! drives playback over them with a deterministic state machine, lints and
//! linearizes visual node/edge graphs, and routes question types to module
//! versions by delivery context.
//!
//! ## Core Concepts
//!
//! - **Steps**: The atomic playback units — intro, countdown, audio,
//!   answer collection — each with an auto-advance signal
//! - **Modules**: Versioned templates describing how to sequence steps for
//!   one question shape
//! - **Flow compiler**: Instantiates a module over read-only content into
//!   a concrete step list with stable override keys
//! - **Runtime**: A pure reducer over `{stepIndex}` driven by navigation
//!   and completion events
//! - **Graphs**: Validation and linearization of editor-drawn flows, plus
//!   the inverse mapping back to a module draft
//! - **Routing**: Specificity scoring, table lints, and fix suggestions
//!   for context-based module selection
//!
//! ## Quick Start
//!
//! ### Compiling a flow
//!
//! ```
//! use stepweave::flows::{compile, CompileOptions, ContentDocument, ContentGroup};
//! use stepweave::flows::{FlowModule, PerGroupStep};
//! use stepweave::types::AudioSource;
//! use stepweave::utils::ids::sequential_factory;
//!
//! let module = FlowModule::builder("listening_choice.standard.v1", 1)
//!     .name("Standard listening flow")
//!     .per_group_step(PerGroupStep::play_audio(AudioSource::Description))
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
//! // intro + intro countdown + 3 per-group steps
//! assert_eq!(result.steps.len(), 5);
//! assert_eq!(result.keys[2], "g0.playAudio");
//! ```
//!
//! ### Driving playback
//!
//! ```
//! use stepweave::runtime::{reduce, RuntimeEvent, RuntimeState};
//! use stepweave::step::{Step, StepBody};
//! use stepweave::types::AutoNext;
//!
//! let steps = vec![
//!     Step::new("s1", StepBody::Finish, Some(AutoNext::AudioEnded)),
//!     Step::new("s2", StepBody::Finish, None),
//! ];
//!
//! let state = reduce(
//!     RuntimeState::default(),
//!     &steps,
//!     &RuntimeEvent::signal("audioEnded"),
//! );
//! assert_eq!(state.step_index, 1);
//!
//! // Indices clamp; the runtime never leaves the step list.
//! let state = reduce(state, &steps, &RuntimeEvent::go_to(99));
//! assert_eq!(state.step_index, 1);
//! ```
//!
//! ### Routing a context
//!
//! ```
//! use stepweave::flows::ModuleRef;
//! use stepweave::routing::{FlowProfile, RoutingContext, rank_profiles};
//!
//! let profiles = vec![
//!     FlowProfile::builder("default", "listening_choice", ModuleRef::new("m", 1)).build(),
//!     FlowProfile::builder("exam", "listening_choice", ModuleRef::new("m", 2))
//!         .scene("exam")
//!         .build(),
//! ];
//! let context = RoutingContext::new(None, Some("exam".to_owned()), None);
//! let ranked = rank_profiles(&profiles, &context);
//! assert_eq!(ranked[0].profile.module.version, 2);
//! ```
//!
//! ## Module Guide
//!
//! - [`types`] - Step kinds, auto-advance signals, diagnostic records
//! - [`step`] - Compiled step shapes and their payloads
//! - [`flows`] - Flow modules, the compiler, and override whitelisting
//! - [`runtime`] - The playback state machine
//! - [`graphs`] - Visual-graph validation, linearization, inverse mapping
//! - [`routing`] - Profile scoring, diagnostics, and fix suggestions
//! - [`plugins`] - Step-kind registry for renderer and validator hooks
//! - [`telemetry`] - Tracing setup for hosts and tests

pub mod flows;
pub mod graphs;
pub mod plugins;
pub mod routing;
pub mod runtime;
pub mod step;
pub mod telemetry;
pub mod types;
pub mod utils;

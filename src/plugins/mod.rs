//! Step plugin registry and the standard listening-choice plugin set.
//!
//! A [`StepPlugin`] is a small struct of data and pure functions describing
//! one step kind: its schema (for editors), renderer hints (for the
//! player), an optional per-step runtime reducer, and an optional shape
//! validator. [`StepPluginRegistry`] maps each [`StepKind`](crate::types::StepKind)
//! to at most one plugin.
//!
//! The registry is an explicit value constructed and passed by the caller —
//! never a module-level singleton — so tests can build isolated registries.
//! Registration fails fast on programming errors (duplicate kind, missing
//! renderer view); it is the only component in the crate that errors on
//! shape problems, and only at registration time.
//!
//! # Examples
//!
//! ```rust
//! use stepweave::plugins::standard_registry;
//! use stepweave::types::StepKind;
//!
//! let registry = standard_registry().unwrap();
//! assert!(registry.get(StepKind::Countdown).is_some());
//! assert!(registry.get(StepKind::Unknown).is_none());
//! assert_eq!(registry.list().len(), 7);
//! ```

mod registry;
mod standard;

pub use registry::{
    PluginRegistryError, RendererHints, StepPlugin, StepPluginRegistry, StepSchema,
    StepValidation, StepValidatorFn,
};
pub use standard::{auto_next_reducer, standard_registry};

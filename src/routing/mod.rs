//! Context-based routing of question types to module versions.
//!
//! A routing table is a set of [`FlowProfile`] rows per question type.
//! Given a delivery [`RoutingContext`] (region, scene, grade), the scorer
//! picks the best enabled profile:
//!
//! - exact dimension match scores 3, wildcard scores 1, mismatch rejects
//! - `priority` is weighted at 10, so one priority point outranks any
//!   combination of dimension matches
//! - ties break on raw priority, then on fewer wildcards
//!
//! The diagnostics side ([`diagnose_profiles`], [`can_submit`]) lints the
//! table for conflicts, dead rules, and weak coverage, and
//! [`build_fix_suggestions`] turns findings into one-line patches.
//! [`score_profiles`] bundles both into a single report for editor UIs.
//!
//! # Examples
//!
//! ```rust
//! use stepweave::flows::ModuleRef;
//! use stepweave::routing::{FlowProfile, RoutingContext, rank_profiles};
//!
//! let profiles = vec![
//!     FlowProfile::builder("default", "listening_choice", ModuleRef::new("m", 1)).build(),
//!     FlowProfile::builder("north-exam", "listening_choice", ModuleRef::new("m", 2))
//!         .region("north")
//!         .scene("exam")
//!         .build(),
//! ];
//!
//! let context = RoutingContext::new(Some("north".to_owned()), Some("exam".to_owned()), None);
//! let ranked = rank_profiles(&profiles, &context);
//! assert_eq!(ranked[0].profile.id, "north-exam");
//! assert_eq!(ranked[0].profile.module.version, 2);
//! ```

mod diagnostics;
mod profile;
mod scorer;

pub use diagnostics::{
    DeadRule, FixSuggestion, ProfileConflict, ProfileDiagnostics, ProfilePatch, ReportOptions,
    RoutingReport, SubmitCheck, WeakCoverage, build_fix_suggestions, can_remove_profile,
    can_submit, diagnose_profiles, score_profiles,
};
pub use profile::{FlowProfile, FlowProfileBuilder};
pub use scorer::{
    Dimension, RoutingContext, ScoreDetail, rank_profiles, score_profile, wildcard_dimensions,
};

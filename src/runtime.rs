//! Pure runtime state machine over compiled steps.
//!
//! The runtime is a value transform: `(state, steps, event) -> state`. No
//! timers, no playback, no I/O — the surrounding player reports discrete
//! events (`audioEnded`, `countdownEnded`, ...) and renders whatever step
//! index comes back. Because the reducer is pure, callers may freely replay
//! or fork [`RuntimeState`] for undo/redo without coordination.
//!
//! Event handling priority:
//!
//! 1. [`RuntimeEvent::GoToStep`] clamps unconditionally.
//! 2. [`RuntimeEvent::Next`] / [`RuntimeEvent::Prev`] clamp current ±1.
//! 3. A per-step reducer supplied by a [`ReducerResolver`] (typically the
//!    plugin registry) may claim the event; a returned state wins, with its
//!    index clamped back into range.
//! 4. Generic autoNext matching: empty or `tapNext` never auto-advance;
//!    otherwise advance by one iff the event signal equals the step's
//!    autoNext.
//!
//! # Examples
//!
//! ```rust
//! use stepweave::runtime::{reduce, RuntimeEvent, RuntimeState};
//! use stepweave::step::{Step, StepBody};
//! use stepweave::types::AutoNext;
//!
//! let steps = vec![
//!     Step::new(
//!         "intro",
//!         StepBody::Intro {
//!             show_title: true,
//!             show_title_description: true,
//!             show_description: true,
//!         },
//!         Some(AutoNext::AudioEnded),
//!     ),
//!     Step::new("end", StepBody::Finish, None),
//! ];
//!
//! let s0 = RuntimeState::default();
//! let s1 = reduce(s0, &steps, &RuntimeEvent::signal("audioEnded"));
//! assert_eq!(s1.step_index, 1);
//!
//! // Finish has no autoNext: nothing advances it.
//! let s2 = reduce(s1, &steps, &RuntimeEvent::signal("audioEnded"));
//! assert_eq!(s2.step_index, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::graphs::LinearStep;
use crate::step::Step;
use crate::types::{AutoNext, StepKind};

/// The entire runtime state: the index of the active step.
///
/// Always clamped to `[0, total - 1]` by the reducer; an empty step list
/// clamps everything to 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeState {
    #[serde(rename = "stepIndex")]
    pub step_index: usize,
}

impl RuntimeState {
    #[must_use]
    pub fn at(step_index: usize) -> Self {
        Self { step_index }
    }
}

/// One discrete event fed to the reducer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeEvent {
    /// Manual advance.
    Next,
    /// Manual step back.
    Prev,
    /// Jump to an absolute index; clamped unconditionally. The index is
    /// signed so out-of-range jumps from external callers clamp instead of
    /// wrapping.
    GoToStep { step_index: i64 },
    /// A named signal matched against the active step's autoNext.
    Signal(String),
}

impl RuntimeEvent {
    /// A signal event, e.g. `RuntimeEvent::signal("audioEnded")`.
    #[must_use]
    pub fn signal(name: impl Into<String>) -> Self {
        RuntimeEvent::Signal(name.into())
    }

    /// Jump to an absolute step index.
    #[must_use]
    pub fn go_to(step_index: i64) -> Self {
        RuntimeEvent::GoToStep { step_index }
    }

    /// The signal name carried by [`Signal`](Self::Signal), trimmed.
    #[must_use]
    pub fn signal_name(&self) -> Option<&str> {
        match self {
            RuntimeEvent::Signal(name) => Some(name.trim()),
            _ => None,
        }
    }
}

/// The step surface the reducer needs. Implemented by both compiled
/// [`Step`]s and visual-graph [`LinearStep`]s, so one runtime serves both
/// pipelines.
pub trait RuntimeStep {
    fn kind(&self) -> StepKind;
    fn auto_next(&self) -> Option<&AutoNext>;
}

impl RuntimeStep for Step {
    fn kind(&self) -> StepKind {
        self.body.kind()
    }

    fn auto_next(&self) -> Option<&AutoNext> {
        self.auto_next.as_ref()
    }
}

impl RuntimeStep for LinearStep {
    fn kind(&self) -> StepKind {
        self.kind
    }

    fn auto_next(&self) -> Option<&AutoNext> {
        self.auto_next.as_ref()
    }
}

/// Everything a per-step reducer sees for one invocation.
pub struct StepReducerContext<'a> {
    pub state: RuntimeState,
    pub event: &'a RuntimeEvent,
    pub step: &'a dyn RuntimeStep,
    pub step_index: usize,
    pub total_steps: usize,
}

/// A per-step reducer. Returning `None` defers to generic autoNext
/// handling; a returned state wins (its index is clamped into range).
pub type StepReducerFn = Arc<dyn Fn(&StepReducerContext<'_>) -> Option<RuntimeState> + Send + Sync>;

/// Resolves a per-step reducer for the active step, if any.
///
/// [`crate::plugins::StepPluginRegistry`] implements this by looking up the
/// plugin for the step's kind; callers may also supply ad-hoc resolvers.
pub trait ReducerResolver {
    fn resolve(&self, step: &dyn RuntimeStep, step_index: usize) -> Option<StepReducerFn>;
}

/// Clamp an index into `[0, total - 1]`; 0 when the list is empty.
#[must_use]
pub fn clamp_index(step_index: i64, total: usize) -> usize {
    if total == 0 {
        return 0;
    }
    let max = (total - 1) as i64;
    step_index.clamp(0, max) as usize
}

/// Pure transition without per-step reducers.
///
/// Identical `(state, steps, event)` always yields identical output.
#[must_use]
pub fn reduce<S: RuntimeStep>(state: RuntimeState, steps: &[S], event: &RuntimeEvent) -> RuntimeState {
    reduce_with_resolver(state, steps, event, None)
}

/// Pure transition consulting an optional per-step reducer resolver.
#[must_use]
pub fn reduce_with_resolver<S: RuntimeStep>(
    state: RuntimeState,
    steps: &[S],
    event: &RuntimeEvent,
    resolver: Option<&dyn ReducerResolver>,
) -> RuntimeState {
    let total = steps.len();
    let current = clamp_index(state.step_index as i64, total);

    match event {
        RuntimeEvent::GoToStep { step_index } => {
            return RuntimeState::at(clamp_index(*step_index, total));
        }
        RuntimeEvent::Next => {
            return RuntimeState::at(clamp_index(current as i64 + 1, total));
        }
        RuntimeEvent::Prev => {
            return RuntimeState::at(clamp_index(current as i64 - 1, total));
        }
        RuntimeEvent::Signal(_) => {}
    }

    let Some(active) = steps.get(current) else {
        return RuntimeState::at(current);
    };

    if let Some(resolver) = resolver
        && let Some(step_reducer) = resolver.resolve(active, current)
    {
        let ctx = StepReducerContext {
            state: RuntimeState::at(current),
            event,
            step: active,
            step_index: current,
            total_steps: total,
        };
        if let Some(next) = step_reducer(&ctx) {
            return RuntimeState::at(clamp_index(next.step_index as i64, total));
        }
    }

    let signal = event.signal_name().unwrap_or_default();
    match active.auto_next() {
        Some(auto_next) if auto_next.advances_on(signal) => {
            RuntimeState::at(clamp_index(current as i64 + 1, total))
        }
        _ => RuntimeState::at(current),
    }
}

//! Plugin descriptor types and the kind-keyed registry.

use miette::Diagnostic;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::runtime::{ReducerResolver, RuntimeStep, StepReducerFn};
use crate::step::Step;
use crate::types::StepKind;

/// Errors raised by [`StepPluginRegistry`].
///
/// These indicate programming errors (malformed or duplicate registration,
/// [`ensure`](StepPluginRegistry::ensure) on an unregistered kind), never
/// runtime data-shape problems.
#[derive(Debug, Error, Diagnostic)]
pub enum PluginRegistryError {
    /// `StepKind::Unknown` cannot carry a plugin.
    #[error("[{namespace}] the unknown step kind cannot be registered")]
    #[diagnostic(
        code(stepweave::plugins::unregisterable_kind),
        help("Register plugins only for concrete step kinds.")
    )]
    UnregisterableKind { namespace: String },

    /// Renderer hints lack a view name.
    #[error("[{namespace}] plugin {kind} renderer.view is required")]
    #[diagnostic(code(stepweave::plugins::missing_view))]
    MissingView { namespace: String, kind: StepKind },

    /// Schema lacks a description.
    #[error("[{namespace}] plugin {kind} missing schema description")]
    #[diagnostic(code(stepweave::plugins::missing_schema))]
    MissingSchema { namespace: String, kind: StepKind },

    /// The kind already carries a plugin.
    #[error("[{namespace}] duplicate plugin kind: {kind}")]
    #[diagnostic(
        code(stepweave::plugins::duplicate_kind),
        help("Each step kind may be registered at most once per registry.")
    )]
    DuplicateKind { namespace: String, kind: StepKind },

    /// `ensure` was called for a kind no plugin covers.
    #[error("[{namespace}] plugin not found: {kind}")]
    #[diagnostic(code(stepweave::plugins::not_registered))]
    NotRegistered { namespace: String, kind: StepKind },
}

/// Editor-facing schema hints for one step kind.
#[derive(Clone, Debug, Default)]
pub struct StepSchema {
    pub description: String,
    pub required_fields: Vec<&'static str>,
    pub optional_fields: Vec<&'static str>,
}

/// Player-facing renderer hints for one step kind.
#[derive(Clone, Debug, Default)]
pub struct RendererHints {
    /// The view component the player mounts for this kind.
    pub view: String,
    /// Keep the previous screen on screen while this step runs.
    pub reuse_previous_screen: bool,
    /// Which audio channel this step drives, if any.
    pub audio_carrier: Option<String>,
    /// Show the contextual info panel alongside the step.
    pub context_info: bool,
}

/// Result of a plugin's shape validator.
#[derive(Clone, Debug, Default)]
pub struct StepValidation {
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl StepValidation {
    #[must_use]
    pub fn passed() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            ok: false,
            errors,
            warnings: Vec::new(),
        }
    }
}

/// Pure shape validator for a compiled step of this plugin's kind.
pub type StepValidatorFn = Arc<dyn Fn(&Step) -> StepValidation + Send + Sync>;

/// Per-kind descriptor: schema, renderer hints, optional runtime reducer
/// and validator.
#[derive(Clone)]
pub struct StepPlugin {
    pub kind: StepKind,
    pub schema: StepSchema,
    pub renderer: RendererHints,
    pub runtime_reducer: Option<StepReducerFn>,
    pub validator: Option<StepValidatorFn>,
}

impl std::fmt::Debug for StepPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepPlugin")
            .field("kind", &self.kind)
            .field("schema", &self.schema)
            .field("renderer", &self.renderer)
            .field("runtime_reducer", &self.runtime_reducer.is_some())
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Explicit, kind-keyed plugin registry.
///
/// # Examples
///
/// ```rust
/// use stepweave::plugins::{RendererHints, StepPlugin, StepPluginRegistry, StepSchema};
/// use stepweave::types::StepKind;
///
/// let mut registry = StepPluginRegistry::new("demo");
/// registry
///     .register(StepPlugin {
///         kind: StepKind::Finish,
///         schema: StepSchema {
///             description: "Terminal screen".into(),
///             required_fields: vec!["kind"],
///             optional_fields: vec![],
///         },
///         renderer: RendererHints {
///             view: "finish".into(),
///             ..RendererHints::default()
///         },
///         runtime_reducer: None,
///         validator: None,
///     })
///     .unwrap();
///
/// assert!(registry.get(StepKind::Finish).is_some());
/// assert!(registry.register(registry.ensure(StepKind::Finish).unwrap().clone()).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct StepPluginRegistry {
    namespace: String,
    plugins: FxHashMap<StepKind, Arc<StepPlugin>>,
}

impl StepPluginRegistry {
    /// Creates an empty registry. The namespace only labels error messages.
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            plugins: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Registers a plugin, failing fast on malformed or duplicate input.
    pub fn register(&mut self, plugin: StepPlugin) -> Result<(), PluginRegistryError> {
        if plugin.kind == StepKind::Unknown {
            return Err(PluginRegistryError::UnregisterableKind {
                namespace: self.namespace.clone(),
            });
        }
        if plugin.renderer.view.trim().is_empty() {
            return Err(PluginRegistryError::MissingView {
                namespace: self.namespace.clone(),
                kind: plugin.kind,
            });
        }
        if plugin.schema.description.trim().is_empty() {
            return Err(PluginRegistryError::MissingSchema {
                namespace: self.namespace.clone(),
                kind: plugin.kind,
            });
        }
        if self.plugins.contains_key(&plugin.kind) {
            return Err(PluginRegistryError::DuplicateKind {
                namespace: self.namespace.clone(),
                kind: plugin.kind,
            });
        }
        self.plugins.insert(plugin.kind, Arc::new(plugin));
        Ok(())
    }

    /// Registers a batch; stops at the first failure.
    pub fn register_many(
        &mut self,
        plugins: impl IntoIterator<Item = StepPlugin>,
    ) -> Result<(), PluginRegistryError> {
        for plugin in plugins {
            self.register(plugin)?;
        }
        Ok(())
    }

    /// Builder-style registration for fluent construction.
    pub fn with_plugin(mut self, plugin: StepPlugin) -> Result<Self, PluginRegistryError> {
        self.register(plugin)?;
        Ok(self)
    }

    /// Looks up the plugin for a kind.
    #[must_use]
    pub fn get(&self, kind: StepKind) -> Option<&StepPlugin> {
        self.plugins.get(&kind).map(Arc::as_ref)
    }

    /// Looks up a plugin whose absence is a programming error.
    pub fn ensure(&self, kind: StepKind) -> Result<&StepPlugin, PluginRegistryError> {
        self.get(kind).ok_or_else(|| PluginRegistryError::NotRegistered {
            namespace: self.namespace.clone(),
            kind,
        })
    }

    /// All registered plugins in kind order (deterministic).
    #[must_use]
    pub fn list(&self) -> Vec<&StepPlugin> {
        let mut all: Vec<&StepPlugin> = self.plugins.values().map(Arc::as_ref).collect();
        all.sort_by_key(|p| p.kind.as_str());
        all
    }
}

impl ReducerResolver for StepPluginRegistry {
    fn resolve(&self, step: &dyn RuntimeStep, _step_index: usize) -> Option<StepReducerFn> {
        self.get(step.kind())?.runtime_reducer.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plugin(kind: StepKind, view: &str, description: &str) -> StepPlugin {
        StepPlugin {
            kind,
            schema: StepSchema {
                description: description.into(),
                required_fields: vec!["kind"],
                optional_fields: vec![],
            },
            renderer: RendererHints {
                view: view.into(),
                ..RendererHints::default()
            },
            runtime_reducer: None,
            validator: None,
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        let mut registry = StepPluginRegistry::new("test");
        let err = registry
            .register(plugin(StepKind::Unknown, "x", "d"))
            .unwrap_err();
        assert!(matches!(err, PluginRegistryError::UnregisterableKind { .. }));
    }

    #[test]
    fn rejects_missing_view_and_schema() {
        let mut registry = StepPluginRegistry::new("test");
        assert!(matches!(
            registry.register(plugin(StepKind::Intro, " ", "d")).unwrap_err(),
            PluginRegistryError::MissingView { .. }
        ));
        assert!(matches!(
            registry.register(plugin(StepKind::Intro, "intro", "")).unwrap_err(),
            PluginRegistryError::MissingSchema { .. }
        ));
    }

    #[test]
    fn rejects_duplicate_kind() {
        let mut registry = StepPluginRegistry::new("test");
        registry.register(plugin(StepKind::Intro, "intro", "d")).unwrap();
        let err = registry
            .register(plugin(StepKind::Intro, "intro2", "d"))
            .unwrap_err();
        assert!(matches!(err, PluginRegistryError::DuplicateKind { .. }));
    }

    #[test]
    fn ensure_reports_missing_kind() {
        let registry = StepPluginRegistry::new("test");
        let err = registry.ensure(StepKind::Countdown).unwrap_err();
        assert!(matches!(err, PluginRegistryError::NotRegistered { .. }));
    }
}

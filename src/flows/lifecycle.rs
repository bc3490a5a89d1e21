//! Module version lifecycle guard.
//!
//! A module version is created as a draft, published (which freezes its
//! content), and eventually archived. Archived versions are excluded from
//! new routing resolution but retained for content already bound to them.
//! [`ModuleStatus::can_transition`] is the sole authority on legal moves;
//! all status writes must route through it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of one `(id, version)` module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ModuleStatus {
    /// Whether moving from `self` to `to` is legal.
    ///
    /// Legal: any state to itself, draft→published, draft→archived,
    /// published→archived. Everything else (notably published→draft and
    /// archived→anything else) is illegal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stepweave::flows::ModuleStatus;
    ///
    /// assert!(ModuleStatus::Draft.can_transition(ModuleStatus::Published));
    /// assert!(!ModuleStatus::Published.can_transition(ModuleStatus::Draft));
    /// assert!(!ModuleStatus::Archived.can_transition(ModuleStatus::Published));
    /// assert!(ModuleStatus::Archived.can_transition(ModuleStatus::Archived));
    /// ```
    #[must_use]
    pub fn can_transition(self, to: ModuleStatus) -> bool {
        use ModuleStatus::*;
        match (self, to) {
            (a, b) if a == b => true,
            (Draft, Published) | (Draft, Archived) | (Published, Archived) => true,
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleStatus::Draft => "draft",
            ModuleStatus::Published => "published",
            ModuleStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ModuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

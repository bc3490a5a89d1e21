//! Routing profiles: which module version serves which delivery context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::flows::ModuleRef;

/// One routing rule: when the delivery context matches, this profile's
/// module version is a candidate.
///
/// The three targeting dimensions are optional; an unset (or blank)
/// dimension is a wildcard that matches any context value. `priority`
/// breaks ties between profiles that match equally well.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowProfile {
    pub id: String,
    /// The question shape this profile routes, e.g. `listening_choice`.
    pub question_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub module: ModuleRef,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

impl FlowProfile {
    /// Starts a builder for an enabled, fully-wildcarded profile.
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        question_type: impl Into<String>,
        module: ModuleRef,
    ) -> FlowProfileBuilder {
        FlowProfileBuilder::new(id, question_type, module)
    }

    /// Normalized dimension value: trimmed, with blanks as wildcards.
    #[must_use]
    pub(super) fn dimension(value: &Option<String>) -> Option<&str> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// How many of the three dimensions are wildcards.
    #[must_use]
    pub fn wildcard_count(&self) -> u8 {
        [&self.region, &self.scene, &self.grade]
            .into_iter()
            .filter(|dim| Self::dimension(dim).is_none())
            .count() as u8
    }
}

/// Builder for [`FlowProfile`] with the standard defaults.
#[derive(Clone, Debug)]
pub struct FlowProfileBuilder {
    profile: FlowProfile,
}

impl FlowProfileBuilder {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        question_type: impl Into<String>,
        module: ModuleRef,
    ) -> Self {
        Self {
            profile: FlowProfile {
                id: id.into(),
                question_type: question_type.into(),
                region: None,
                scene: None,
                grade: None,
                module,
                priority: 0,
                enabled: true,
                note: None,
                created_at: None,
                updated_at: None,
            },
        }
    }

    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.profile.region = Some(region.into());
        self
    }

    #[must_use]
    pub fn scene(mut self, scene: impl Into<String>) -> Self {
        self.profile.scene = Some(scene.into());
        self
    }

    #[must_use]
    pub fn grade(mut self, grade: impl Into<String>) -> Self {
        self.profile.grade = Some(grade.into());
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.profile.priority = priority;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.profile.enabled = enabled;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.profile.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn build(self) -> FlowProfile {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> FlowProfile {
        FlowProfile::builder("p1", "listening_choice", ModuleRef::new("m", 1)).build()
    }

    #[test]
    fn builder_defaults_to_enabled_wildcard() {
        let p = profile();
        assert!(p.enabled);
        assert_eq!(p.priority, 0);
        assert_eq!(p.wildcard_count(), 3);
    }

    #[test]
    fn blank_dimensions_count_as_wildcards() {
        let mut p = profile();
        p.region = Some("  ".into());
        p.scene = Some("exam".into());
        assert_eq!(p.wildcard_count(), 2);
        assert_eq!(FlowProfile::dimension(&p.region), None);
        assert_eq!(FlowProfile::dimension(&p.scene), Some("exam"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let p: FlowProfile = serde_json::from_str(
            r#"{"id": "p", "questionType": "q", "module": {"id": "m", "version": 2}}"#,
        )
        .unwrap();
        assert!(p.enabled);
        assert_eq!(p.module.version, 2);
        assert_eq!(p.region, None);
    }
}

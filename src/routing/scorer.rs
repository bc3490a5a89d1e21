//! Specificity scoring and ranking of routing profiles.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

use super::profile::FlowProfile;

/// The three targeting dimensions of a routing profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Region,
    Scene,
    Grade,
}

impl Dimension {
    /// Fixed reporting order: region, scene, grade.
    pub const ALL: [Dimension; 3] = [Dimension::Region, Dimension::Scene, Dimension::Grade];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Region => "region",
            Dimension::Scene => "scene",
            Dimension::Grade => "grade",
        }
    }

    /// The profile's raw value on this dimension.
    #[must_use]
    pub fn of<'a>(&self, profile: &'a FlowProfile) -> &'a Option<String> {
        match self {
            Dimension::Region => &profile.region,
            Dimension::Scene => &profile.scene,
            Dimension::Grade => &profile.grade,
        }
    }
}

/// The dimensions a profile leaves as wildcards, in [`Dimension::ALL`]
/// order.
#[must_use]
pub fn wildcard_dimensions(profile: &FlowProfile) -> Vec<Dimension> {
    Dimension::ALL
        .into_iter()
        .filter(|dimension| FlowProfile::dimension(dimension.of(profile)).is_none())
        .collect()
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The delivery context a question is served in.
///
/// Blank values count as absent, same as profile dimensions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
}

impl RoutingContext {
    #[must_use]
    pub fn new(
        region: impl Into<Option<String>>,
        scene: impl Into<Option<String>>,
        grade: impl Into<Option<String>>,
    ) -> Self {
        Self {
            region: region.into(),
            scene: scene.into(),
            grade: grade.into(),
        }
    }
}

/// Exact match on a dimension.
const MATCH_SCORE: i32 = 3;
/// Wildcard on a dimension: matches anything, worth less than an exact hit.
const WILDCARD_SCORE: i32 = 1;
/// How much one priority point outweighs dimension scores.
const PRIORITY_WEIGHT: i32 = 10;

/// Why and how well one profile matched a context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetail {
    pub profile: FlowProfile,
    pub region_score: i32,
    pub scene_score: i32,
    pub grade_score: i32,
    pub priority_score: i32,
    pub wildcard_count: u8,
    pub total_score: i32,
}

/// One dimension's contribution, or `None` when the profile is rejected on
/// this dimension.
///
/// A profile that pins a dimension the context does not carry can never be
/// a safe match; a wildcard always matches but scores below an exact hit.
fn dimension_score(profile_value: &Option<String>, context_value: &Option<String>) -> Option<i32> {
    let Some(wanted) = FlowProfile::dimension(profile_value) else {
        return Some(WILDCARD_SCORE);
    };
    let actual = context_value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())?;
    (wanted == actual).then_some(MATCH_SCORE)
}

/// Scores one profile against a context, or `None` when any dimension
/// rejects it. Enablement is not consulted here.
#[must_use]
pub fn score_profile(profile: &FlowProfile, context: &RoutingContext) -> Option<ScoreDetail> {
    let region_score = dimension_score(&profile.region, &context.region)?;
    let scene_score = dimension_score(&profile.scene, &context.scene)?;
    let grade_score = dimension_score(&profile.grade, &context.grade)?;
    let priority_score = profile.priority.saturating_mul(PRIORITY_WEIGHT);

    Some(ScoreDetail {
        wildcard_count: profile.wildcard_count(),
        total_score: region_score + scene_score + grade_score + priority_score,
        profile: profile.clone(),
        region_score,
        scene_score,
        grade_score,
        priority_score,
    })
}

/// Scores every enabled profile against the context and ranks the matches:
/// total score descending, then raw priority descending, then fewer
/// wildcards first.
///
/// The sort is stable, so profiles that tie on all three criteria keep
/// their input order.
#[instrument(skip_all, fields(profiles = profiles.len()))]
#[must_use]
pub fn rank_profiles(profiles: &[FlowProfile], context: &RoutingContext) -> Vec<ScoreDetail> {
    let mut ranked: Vec<ScoreDetail> = profiles
        .iter()
        .filter(|profile| profile.enabled)
        .filter_map(|profile| score_profile(profile, context))
        .collect();

    ranked.sort_by(|a, b| {
        b.total_score
            .cmp(&a.total_score)
            .then_with(|| b.profile.priority.cmp(&a.profile.priority))
            .then_with(|| a.wildcard_count.cmp(&b.wildcard_count))
    });
    ranked
}

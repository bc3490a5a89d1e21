//! Routing-table diagnostics and fix suggestions.
//!
//! Three lints run over a profile set:
//!
//! - **conflicts** — enabled profiles with identical targeting and
//!   priority; the engine cannot pick between them deterministically
//! - **dead rules** — profiles fully shadowed by a strictly
//!   higher-priority profile whose targeting covers theirs
//! - **weak coverage** — profiles wildcarding most dimensions, which tend
//!   to swallow traffic meant for narrower rules
//!
//! Conflicts and dead rules block submission; weak coverage only warns.
//! Every finding comes with a [`FixSuggestion`] carrying a minimal patch.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::profile::FlowProfile;
use super::scorer::{Dimension, RoutingContext, ScoreDetail, rank_profiles, wildcard_dimensions};

/// A group of enabled profiles with identical targeting and priority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileConflict {
    /// Human-readable targeting signature, `*` for wildcards.
    pub signature: String,
    /// Conflicting profile ids in table order.
    pub profile_ids: Vec<String>,
    pub priority: i32,
}

/// One profile fully shadowed by a higher-priority profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadRule {
    pub profile_id: String,
    pub blocker_id: String,
}

/// A profile wildcarding two or all three dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakCoverage {
    pub profile_id: String,
    /// The unset dimensions, in region/scene/grade order.
    pub wildcard_dimensions: Vec<Dimension>,
    pub wildcard_count: u8,
    pub reason: String,
}

/// Everything the lints found, in table order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDiagnostics {
    pub conflicts: Vec<ProfileConflict>,
    pub dead_rules: Vec<DeadRule>,
    pub weak_coverage: Vec<WeakCoverage>,
}

impl ProfileDiagnostics {
    /// Whether anything blocks submission.
    #[must_use]
    pub fn has_blockers(&self) -> bool {
        !self.conflicts.is_empty() || !self.dead_rules.is_empty()
    }
}

/// Minimal change resolving one finding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl ProfilePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.priority.is_none() && self.enabled.is_none()
    }

    /// Applies the patch in place.
    pub fn apply(&self, profile: &mut FlowProfile) {
        if let Some(priority) = self.priority {
            profile.priority = priority;
        }
        if let Some(enabled) = self.enabled {
            profile.enabled = enabled;
        }
    }
}

/// One actionable fix for one finding, keyed for deduplication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixSuggestion {
    /// Stable dedupe key, e.g. `conflict:p2`.
    pub key: String,
    pub target_id: String,
    pub summary: String,
    pub reason: String,
    pub patch: ProfilePatch,
    /// Whether applying [`FixSuggestion::patch`] alone resolves the
    /// finding without human judgement.
    pub auto_applicable: bool,
}

fn dim_text(value: &Option<String>) -> &str {
    FlowProfile::dimension(value).unwrap_or("*")
}

fn signature_text(profile: &FlowProfile) -> String {
    format!(
        "{} / {} / {} / priority={}",
        dim_text(&profile.region),
        dim_text(&profile.scene),
        dim_text(&profile.grade),
        profile.priority
    )
}

fn signature_key(profile: &FlowProfile) -> String {
    format!(
        "{}|{}|{}|{}",
        dim_text(&profile.region),
        dim_text(&profile.scene),
        dim_text(&profile.grade),
        profile.priority
    )
}

/// Whether `blocker`'s targeting covers `target`'s on one dimension: a
/// wildcard covers anything, a pinned value covers only itself.
fn dimension_covers(blocker: &Option<String>, target: &Option<String>) -> bool {
    match (FlowProfile::dimension(blocker), FlowProfile::dimension(target)) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(b), Some(t)) => b == t,
    }
}

fn covers(blocker: &FlowProfile, target: &FlowProfile) -> bool {
    dimension_covers(&blocker.region, &target.region)
        && dimension_covers(&blocker.scene, &target.scene)
        && dimension_covers(&blocker.grade, &target.grade)
}

/// Runs every lint over the enabled profiles. Findings are reported in
/// table order.
#[instrument(skip_all, fields(profiles = profiles.len()))]
#[must_use]
pub fn diagnose_profiles(profiles: &[FlowProfile]) -> ProfileDiagnostics {
    let enabled: Vec<&FlowProfile> = profiles.iter().filter(|p| p.enabled).collect();

    // Conflict groups keyed by normalized signature, first-seen order.
    let mut group_index: FxHashMap<String, usize> = FxHashMap::default();
    let mut groups: Vec<ProfileConflict> = Vec::new();
    for profile in &enabled {
        let key = signature_key(profile);
        match group_index.get(&key) {
            Some(&i) => groups[i].profile_ids.push(profile.id.clone()),
            None => {
                group_index.insert(key, groups.len());
                groups.push(ProfileConflict {
                    signature: signature_text(profile),
                    profile_ids: vec![profile.id.clone()],
                    priority: profile.priority,
                });
            }
        }
    }
    let conflicts: Vec<ProfileConflict> = groups
        .into_iter()
        .filter(|group| group.profile_ids.len() > 1)
        .collect();

    let mut dead_rules: Vec<DeadRule> = Vec::new();
    for target in &enabled {
        for blocker in &enabled {
            if blocker.id != target.id
                && blocker.priority > target.priority
                && covers(blocker, target)
            {
                dead_rules.push(DeadRule {
                    profile_id: target.id.clone(),
                    blocker_id: blocker.id.clone(),
                });
            }
        }
    }

    let mut weak_coverage: Vec<WeakCoverage> = Vec::new();
    for profile in &enabled {
        let wildcards = profile.wildcard_count();
        if wildcards >= 2 {
            let reason = if wildcards == 3 {
                "all three dimensions are wildcards; this profile matches every context".to_owned()
            } else {
                format!("{wildcards} of 3 dimensions are wildcards; this profile matches broadly")
            };
            weak_coverage.push(WeakCoverage {
                profile_id: profile.id.clone(),
                wildcard_dimensions: wildcard_dimensions(profile),
                wildcard_count: wildcards,
                reason,
            });
        }
    }

    ProfileDiagnostics {
        conflicts,
        dead_rules,
        weak_coverage,
    }
}

/// Turns findings into deduplicated, mostly auto-applicable patches.
///
/// - conflict groups keep their first profile untouched; each later one
///   gets a strictly lower priority so the tie disappears
/// - dead rules are disabled
/// - weak profiles with a positive priority get it zeroed; weak profiles
///   already at zero need a human to narrow the targeting
#[must_use]
pub fn build_fix_suggestions(
    profiles: &[FlowProfile],
    diagnostics: &ProfileDiagnostics,
) -> Vec<FixSuggestion> {
    let by_id: FxHashMap<&str, &FlowProfile> =
        profiles.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut suggestions: Vec<FixSuggestion> = Vec::new();

    for conflict in &diagnostics.conflicts {
        for (index, id) in conflict.profile_ids.iter().skip(1).enumerate() {
            let key = format!("conflict:{id}");
            if !seen.insert(key.clone()) {
                continue;
            }
            let offset = index as i32 + 1;
            suggestions.push(FixSuggestion {
                key,
                target_id: id.clone(),
                summary: format!("lower priority of {id} to break the tie"),
                reason: format!(
                    "shares targeting {} with {}",
                    conflict.signature, conflict.profile_ids[0]
                ),
                patch: ProfilePatch {
                    priority: Some(conflict.priority - offset),
                    enabled: None,
                },
                auto_applicable: true,
            });
        }
    }

    for dead in &diagnostics.dead_rules {
        let key = format!("dead:{}", dead.profile_id);
        if !seen.insert(key.clone()) {
            continue;
        }
        suggestions.push(FixSuggestion {
            key,
            target_id: dead.profile_id.clone(),
            summary: format!("disable {}; it can never win", dead.profile_id),
            reason: format!("fully shadowed by higher-priority profile {}", dead.blocker_id),
            patch: ProfilePatch {
                priority: None,
                enabled: Some(false),
            },
            auto_applicable: true,
        });
    }

    for weak in &diagnostics.weak_coverage {
        let key = format!("weak:{}", weak.profile_id);
        if !seen.insert(key.clone()) {
            continue;
        }
        let priority = by_id.get(weak.profile_id.as_str()).map_or(0, |p| p.priority);
        let (patch, auto_applicable, summary) = if priority > 0 {
            (
                ProfilePatch {
                    priority: Some(0),
                    enabled: None,
                },
                true,
                format!("drop priority of broad profile {} to 0", weak.profile_id),
            )
        } else {
            (
                ProfilePatch::default(),
                false,
                format!("narrow the targeting of {}", weak.profile_id),
            )
        };
        suggestions.push(FixSuggestion {
            key,
            target_id: weak.profile_id.clone(),
            summary,
            reason: weak.reason.clone(),
            patch,
            auto_applicable,
        });
    }

    suggestions
}

/// Submission gate: conflicts and dead rules block, weak coverage warns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitCheck {
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Whether the profile set may be submitted as-is.
#[must_use]
pub fn can_submit(profiles: &[FlowProfile]) -> SubmitCheck {
    let diagnostics = diagnose_profiles(profiles);

    let mut errors: Vec<String> = Vec::new();
    for conflict in &diagnostics.conflicts {
        errors.push(format!(
            "conflicting profiles [{}] share targeting {}",
            conflict.profile_ids.join(", "),
            conflict.signature
        ));
    }
    for dead in &diagnostics.dead_rules {
        errors.push(format!(
            "profile {} can never win; shadowed by {}",
            dead.profile_id, dead.blocker_id
        ));
    }

    let warnings: Vec<String> = diagnostics
        .weak_coverage
        .iter()
        .map(|weak| format!("profile {}: {}", weak.profile_id, weak.reason))
        .collect();

    SubmitCheck {
        ok: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Limits applied to the ranked sections of a [`RoutingReport`].
#[derive(Clone, Copy, Debug)]
pub struct ReportOptions {
    pub ranked_limit: usize,
    pub top_limit: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            ranked_limit: 20,
            top_limit: 3,
        }
    }
}

/// The full answer to "what would this context get, and is the table
/// healthy".
#[derive(Clone, Debug, Default)]
pub struct RoutingReport {
    /// Matches in rank order, capped at `ranked_limit`.
    pub ranked: Vec<ScoreDetail>,
    /// The leading matches, capped at `top_limit`.
    pub top: Vec<ScoreDetail>,
    /// The winner, if anything matched.
    pub best: Option<ScoreDetail>,
    pub diagnostics: ProfileDiagnostics,
    pub fix_suggestions: Vec<FixSuggestion>,
}

/// Scores, ranks, and lints in one pass.
#[instrument(skip_all, fields(profiles = profiles.len()))]
#[must_use]
pub fn score_profiles(
    profiles: &[FlowProfile],
    context: &RoutingContext,
    options: ReportOptions,
) -> RoutingReport {
    let mut ranked = rank_profiles(profiles, context);
    let diagnostics = diagnose_profiles(profiles);
    let fix_suggestions = build_fix_suggestions(profiles, &diagnostics);

    let best = ranked.first().cloned();
    let top: Vec<ScoreDetail> = ranked.iter().take(options.top_limit).cloned().collect();
    ranked.truncate(options.ranked_limit);

    RoutingReport {
        ranked,
        top,
        best,
        diagnostics,
        fix_suggestions,
    }
}

/// Removal guard: the last enabled profile for a question type must stay,
/// or that type loses routing entirely.
#[must_use]
pub fn can_remove_profile(profiles: &[FlowProfile], id: &str) -> bool {
    let Some(target) = profiles.iter().find(|p| p.id == id) else {
        return true;
    };
    if !target.enabled {
        return true;
    }
    profiles
        .iter()
        .filter(|p| p.enabled && p.question_type == target.question_type)
        .count()
        > 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::ModuleRef;

    fn profile(id: &str) -> crate::routing::FlowProfileBuilder {
        FlowProfile::builder(id, "listening_choice", ModuleRef::new("m", 1))
    }

    #[test]
    fn identical_targeting_conflicts_in_table_order() {
        let profiles = vec![
            profile("a").region("north").build(),
            profile("b").scene("exam").build(),
            profile("c").region("north").build(),
        ];
        let diagnostics = diagnose_profiles(&profiles);
        assert_eq!(diagnostics.conflicts.len(), 1);
        let conflict = &diagnostics.conflicts[0];
        assert_eq!(conflict.profile_ids, vec!["a", "c"]);
        assert_eq!(conflict.signature, "north / * / * / priority=0");
    }

    #[test]
    fn different_priorities_do_not_conflict() {
        let profiles = vec![
            profile("a").region("north").build(),
            profile("b").region("north").priority(1).build(),
        ];
        assert!(diagnose_profiles(&profiles).conflicts.is_empty());
    }

    #[test]
    fn shadowed_profile_is_dead() {
        let profiles = vec![
            profile("broad").priority(5).build(),
            profile("narrow").region("north").build(),
        ];
        let diagnostics = diagnose_profiles(&profiles);
        assert_eq!(
            diagnostics.dead_rules,
            vec![DeadRule {
                profile_id: "narrow".into(),
                blocker_id: "broad".into(),
            }]
        );
    }

    #[test]
    fn narrower_blocker_does_not_shadow_wildcard() {
        // blocker pins region, target wildcards it: not covered.
        let profiles = vec![
            profile("pinned").region("north").priority(5).build(),
            profile("wild").build(),
        ];
        assert!(diagnose_profiles(&profiles).dead_rules.is_empty());
    }

    #[test]
    fn disabled_profiles_are_invisible_to_lints() {
        let profiles = vec![
            profile("a").region("north").build(),
            profile("b").region("north").enabled(false).build(),
        ];
        let diagnostics = diagnose_profiles(&profiles);
        assert!(diagnostics.conflicts.is_empty());
    }

    #[test]
    fn weak_coverage_flags_two_or_more_wildcards() {
        let profiles = vec![
            profile("full-wild").build(),
            profile("two-wild").region("north").build(),
            profile("one-wild").region("north").scene("exam").build(),
        ];
        let diagnostics = diagnose_profiles(&profiles);
        let flagged: Vec<&str> = diagnostics
            .weak_coverage
            .iter()
            .map(|w| w.profile_id.as_str())
            .collect();
        assert_eq!(flagged, vec!["full-wild", "two-wild"]);
        assert!(diagnostics.weak_coverage[0].reason.contains("every context"));
        assert_eq!(
            diagnostics.weak_coverage[1].wildcard_dimensions,
            vec![Dimension::Scene, Dimension::Grade]
        );
    }

    #[test]
    fn conflict_fixes_step_priorities_down() {
        let profiles = vec![
            profile("a").priority(4).build(),
            profile("b").priority(4).build(),
            profile("c").priority(4).build(),
        ];
        let diagnostics = diagnose_profiles(&profiles);
        let fixes = build_fix_suggestions(&profiles, &diagnostics);
        let conflict_fixes: Vec<&FixSuggestion> = fixes
            .iter()
            .filter(|f| f.key.starts_with("conflict:"))
            .collect();
        assert_eq!(conflict_fixes.len(), 2);
        assert_eq!(conflict_fixes[0].target_id, "b");
        assert_eq!(conflict_fixes[0].patch.priority, Some(3));
        assert_eq!(conflict_fixes[1].target_id, "c");
        assert_eq!(conflict_fixes[1].patch.priority, Some(2));
        assert!(conflict_fixes.iter().all(|f| f.auto_applicable));
    }

    #[test]
    fn dead_rule_fix_disables_once_per_target() {
        let profiles = vec![
            profile("big").priority(9).build(),
            profile("bigger").priority(10).build(),
            profile("tiny").region("north").build(),
        ];
        let diagnostics = diagnose_profiles(&profiles);
        // tiny is shadowed by both; big is shadowed by bigger.
        let fixes = build_fix_suggestions(&profiles, &diagnostics);
        let dead_fixes: Vec<&FixSuggestion> =
            fixes.iter().filter(|f| f.key.starts_with("dead:")).collect();
        let targets: Vec<&str> = dead_fixes.iter().map(|f| f.target_id.as_str()).collect();
        assert_eq!(targets.iter().filter(|t| **t == "tiny").count(), 1);
        assert!(dead_fixes.iter().all(|f| f.patch.enabled == Some(false)));
    }

    #[test]
    fn weak_fix_zeroes_positive_priority_only() {
        let profiles = vec![profile("boosted").priority(2).build(), profile("flat").build()];
        let diagnostics = diagnose_profiles(&profiles);
        let fixes = build_fix_suggestions(&profiles, &diagnostics);
        let boosted = fixes.iter().find(|f| f.key == "weak:boosted").unwrap();
        assert_eq!(boosted.patch.priority, Some(0));
        assert!(boosted.auto_applicable);
        let flat = fixes.iter().find(|f| f.key == "weak:flat").unwrap();
        assert!(flat.patch.is_empty());
        assert!(!flat.auto_applicable);
    }

    #[test]
    fn submit_gate_blocks_on_conflicts_and_dead_rules() {
        let clean = vec![profile("only").region("north").scene("exam").build()];
        assert!(can_submit(&clean).ok);

        let conflicted = vec![profile("a").build(), profile("b").build()];
        let check = can_submit(&conflicted);
        assert!(!check.ok);
        assert!(!check.errors.is_empty());
        // Full wildcards also warn.
        assert!(!check.warnings.is_empty());
    }

    #[test]
    fn last_enabled_profile_cannot_be_removed() {
        let profiles = vec![
            profile("only").build(),
            FlowProfile::builder("other-type", "speaking", ModuleRef::new("m", 1)).build(),
            profile("off").enabled(false).build(),
        ];
        assert!(!can_remove_profile(&profiles, "only"));
        assert!(can_remove_profile(&profiles, "off"));
        assert!(can_remove_profile(&profiles, "missing"));

        let two = vec![profile("a").build(), profile("b").build()];
        assert!(can_remove_profile(&two, "a"));
    }

    #[test]
    fn report_caps_sections_and_picks_best() {
        let profiles: Vec<FlowProfile> = (0..30)
            .map(|i| profile(&format!("p{i}")).priority(i).build())
            .collect();
        let report = score_profiles(
            &profiles,
            &RoutingContext::default(),
            ReportOptions::default(),
        );
        assert_eq!(report.ranked.len(), 20);
        assert_eq!(report.top.len(), 3);
        assert_eq!(report.best.as_ref().unwrap().profile.id, "p29");
        assert!(report.diagnostics.weak_coverage.len() >= 30 - 1);
    }
}

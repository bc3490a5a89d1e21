mod common;

use common::*;
use stepweave::routing::{
    ReportOptions, RoutingContext, can_submit, diagnose_profiles, rank_profiles, score_profile,
    score_profiles,
};

fn ctx(region: Option<&str>, scene: Option<&str>, grade: Option<&str>) -> RoutingContext {
    RoutingContext::new(
        region.map(str::to_owned),
        scene.map(str::to_owned),
        grade.map(str::to_owned),
    )
}

#[test]
fn more_specific_rule_outranks_broader_one() {
    let broad = profile("broad").region("GD").build();
    let narrow = profile("narrow").region("GD").scene("exam").build();

    let ranked = rank_profiles(&[broad, narrow], &ctx(Some("GD"), Some("exam"), None));
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].profile.id, "narrow");
    // exact+exact+wildcard = 7 vs exact+wildcard+wildcard = 5.
    assert_eq!(ranked[0].total_score, 7);
    assert_eq!(ranked[1].total_score, 5);
}

#[test]
fn wrong_region_is_rejected_outright() {
    let p = profile("gd-only").region("GD").build();
    assert!(score_profile(&p, &ctx(Some("BJ"), None, None)).is_none());
    assert!(rank_profiles(&[p], &ctx(Some("BJ"), None, None)).is_empty());
}

#[test]
fn identical_rules_report_a_conflict() {
    let profiles = vec![
        profile("first").region("GD").scene("exam").build(),
        profile("second").region("GD").scene("exam").build(),
    ];
    let diagnostics = diagnose_profiles(&profiles);
    assert_eq!(diagnostics.conflicts.len(), 1);
    assert_eq!(diagnostics.conflicts[0].profile_ids, vec!["first", "second"]);
    assert_eq!(
        diagnostics.conflicts[0].signature,
        "GD / exam / * / priority=0"
    );
}

#[test]
fn rule_under_a_higher_priority_wildcard_is_dead() {
    let profiles = vec![
        profile("umbrella").priority(5).build(),
        profile("specific").region("GD").scene("exam").grade("g5").build(),
    ];
    let diagnostics = diagnose_profiles(&profiles);
    assert_eq!(diagnostics.dead_rules.len(), 1);
    assert_eq!(diagnostics.dead_rules[0].profile_id, "specific");
    assert_eq!(diagnostics.dead_rules[0].blocker_id, "umbrella");
}

#[test]
fn full_report_combines_ranking_and_lints() {
    let profiles = vec![
        profile("default").build(),
        profile("gd").region("GD").priority(1).build(),
        profile("gd-twin").region("GD").priority(1).build(),
    ];
    let report = score_profiles(
        &profiles,
        &ctx(Some("GD"), None, None),
        ReportOptions::default(),
    );

    let best = report.best.as_ref().unwrap();
    assert_eq!(best.profile.id, "gd");
    assert!(report.top.len() <= 3);
    assert_eq!(report.diagnostics.conflicts.len(), 1);

    // The conflict comes with an auto-applicable priority fix for the twin.
    let fix = report
        .fix_suggestions
        .iter()
        .find(|f| f.key == "conflict:gd-twin")
        .expect("expected a conflict fix");
    assert!(fix.auto_applicable);
    assert_eq!(fix.patch.priority, Some(0));
}

#[test]
fn applying_suggested_fixes_clears_the_blockers() {
    let mut profiles = vec![
        profile("a").region("GD").build(),
        profile("b").region("GD").build(),
    ];
    assert!(!can_submit(&profiles).ok);

    // Demoting a conflict loser can expose it as a dead rule, so fixes may
    // take more than one round to converge.
    for _ in 0..3 {
        if can_submit(&profiles).ok {
            break;
        }
        let diagnostics = diagnose_profiles(&profiles);
        let fixes = stepweave::routing::build_fix_suggestions(&profiles, &diagnostics);
        for fix in fixes.iter().filter(|f| f.auto_applicable) {
            let target = profiles.iter_mut().find(|p| p.id == fix.target_id).unwrap();
            fix.patch.apply(target);
        }
    }

    assert!(can_submit(&profiles).ok);
}

#[test]
fn absent_context_dimension_rejects_pinned_rules_only() {
    let pinned = profile("pinned").grade("g5").build();
    let wildcard = profile("wild").build();
    let ranked = rank_profiles(&[pinned, wildcard], &ctx(Some("GD"), None, None));
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].profile.id, "wild");
}

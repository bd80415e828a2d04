//! Classifier tests — threshold rules, precedence, role exemptions.

use chrono::NaiveDate;
use clantrack_core::{
    classifier::{classify, Tier},
    config::EvalConfig,
    participation::ParticipationRecord,
    sources::RosterEntry,
    types::PlayerTag,
};

fn record(role: &str) -> ParticipationRecord {
    let entry = RosterEntry {
        clan_tag: "#CLAN1".to_string(),
        clan_name: "Test Clan".to_string(),
        player_tag: "#AAA".to_string(),
        player_name: "Alpha".to_string(),
        role: role.to_string(),
        th_level: 14,
    };
    ParticipationRecord::new(PlayerTag::parse("#AAA").unwrap(), &entry, None)
}

fn with_counts(
    role: &str,
    cwl_ok: u32,
    classic_ok: u32,
    cwl_failed: u32,
    classic_failed: u32,
) -> ParticipationRecord {
    let mut r = record(role);
    r.cwl_attacks_used = cwl_ok;
    r.classic_wars_participated = classic_ok;
    r.cwl_wars_failed = cwl_failed;
    r.classic_wars_failed = classic_failed;
    r
}

fn config() -> EvalConfig {
    EvalConfig::default()
}

/// Scenario A: 2 CWL attacks + 1 classic war = 3 successes → promote.
#[test]
fn member_at_success_limit_is_promoted() {
    let r = with_counts("Member", 2, 1, 0, 0);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Promote);
    assert!(c.rationale.contains("Elder"), "rationale: {}", c.rationale);
}

/// Scenario B: Elder with 2 CWL misses + 1 classic no-show → demote.
#[test]
fn elder_at_penalty_limit_is_demoted() {
    let r = with_counts("Elder", 0, 0, 2, 1);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Demote);
    assert!(c.rationale.contains("Member"), "rationale: {}", c.rationale);
}

/// Scenario D: all counts zero → safe, flagged inactive/new.
#[test]
fn idle_member_is_safe_and_flagged_inactive() {
    let r = with_counts("Member", 0, 0, 0, 0);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Safe);
    assert!(c.rationale.contains("inactive"), "rationale: {}", c.rationale);
}

/// A Member clearing both thresholds at once is promoted — success is
/// checked first, deliberately.
#[test]
fn promotion_outranks_penalty_for_members() {
    let r = with_counts("Member", 3, 0, 3, 0);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Promote);
}

/// A Member at the penalty limit without enough successes is a manual
/// demotion candidate.
#[test]
fn member_at_penalty_limit_is_flagged() {
    let r = with_counts("Member", 1, 0, 2, 1);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Demote);
    assert!(c.rationale.contains("violation"), "rationale: {}", c.rationale);
}

/// Leaders and Co-Leaders are exempt regardless of counts.
#[test]
fn leadership_is_always_safe() {
    for role in ["Leader", "Co-Leader"] {
        let r = with_counts(role, 0, 0, 99, 99);
        let c = classify(&r, &config());
        assert_eq!(c.tier, Tier::Safe, "{role} must never be auto-actioned");
    }
}

/// An Elder below the penalty limit stays safe, with the count noted.
#[test]
fn elder_below_penalty_limit_is_safe_with_note() {
    let r = with_counts("Elder", 0, 0, 2, 0);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Safe);
    assert!(c.rationale.contains("2x"), "rationale: {}", c.rationale);
}

/// An Elder with a clean record is plainly safe.
#[test]
fn clean_elder_is_safe() {
    let r = with_counts("Elder", 5, 2, 0, 0);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Safe);
}

/// A Member with some progress below the limit is safe with it noted.
#[test]
fn member_progress_is_noted() {
    let r = with_counts("Member", 2, 0, 0, 0);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Safe);
    assert!(c.rationale.contains("2x"), "rationale: {}", c.rationale);
}

/// Unrecognized roles fall back to safe.
#[test]
fn unknown_role_falls_back_to_safe() {
    let r = with_counts("SuperAdmin", 0, 0, 99, 99);
    let c = classify(&r, &config());
    assert_eq!(c.tier, Tier::Safe);
}

/// Thresholds come from config, not constants baked into the rules.
#[test]
fn thresholds_are_configurable() {
    let cfg = EvalConfig {
        success_limit: 5,
        ..EvalConfig::default()
    };
    let r = with_counts("Member", 3, 1, 0, 0);
    assert_eq!(classify(&r, &cfg).tier, Tier::Safe, "4 successes under a limit of 5");

    let r = with_counts("Member", 3, 2, 0, 0);
    assert_eq!(classify(&r, &cfg).tier, Tier::Promote);
}

/// The classifier reads but never mutates its input.
#[test]
fn classification_does_not_change_the_record() {
    let r = with_counts("Member", 2, 1, 1, 0);
    let before = (
        r.cwl_attacks_used,
        r.classic_wars_participated,
        r.cwl_wars_failed,
        r.classic_wars_failed,
    );
    let _ = classify(&r, &config());
    let after = (
        r.cwl_attacks_used,
        r.classic_wars_participated,
        r.cwl_wars_failed,
        r.classic_wars_failed,
    );
    assert_eq!(before, after);
}

/// Reset dates live on the record but play no part in classification.
#[test]
fn reset_date_does_not_affect_classification() {
    let mut r = with_counts("Member", 3, 0, 0, 0);
    r.reset_date = Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    assert_eq!(classify(&r, &config()).tier, Tier::Promote);
}

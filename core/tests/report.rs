//! Report assembly tests — row ordering and classification carry-through.

use clantrack_core::{
    classifier::Tier,
    config::EvalConfig,
    participation::ParticipationRecord,
    report,
    sources::RosterEntry,
    types::PlayerTag,
};

fn record(tag: &str, name: &str, th_level: i64) -> ParticipationRecord {
    let entry = RosterEntry {
        clan_tag: "#CLAN1".to_string(),
        clan_name: "Test Clan".to_string(),
        player_tag: tag.to_string(),
        player_name: name.to_string(),
        role: "Member".to_string(),
        th_level,
    };
    ParticipationRecord::new(PlayerTag::parse(tag).unwrap(), &entry, None)
}

/// Rows come out ordered by TH level descending, ties broken by name.
#[test]
fn report_orders_by_th_descending_then_name() {
    let records = vec![
        record("#AAA", "Zulu", 12),
        record("#BBB", "Bravo", 14),
        record("#CCC", "Alpha", 14),
        record("#DDD", "Mike", 15),
    ];

    let rows = report::build_participation_report(&records, &EvalConfig::default());
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        ["Mike", "Alpha", "Bravo", "Zulu"],
        "TH 15 first, then the TH 14 tie alphabetically, then TH 12"
    );
}

/// Each row carries the classifier's verdict for its record.
#[test]
fn report_rows_carry_classification() {
    let mut promotable = record("#AAA", "Alpha", 14);
    promotable.cwl_attacks_used = 3;
    let idle = record("#BBB", "Bravo", 14);

    let rows = report::build_participation_report(&[promotable, idle], &EvalConfig::default());
    let alpha = rows.iter().find(|r| r.name == "Alpha").unwrap();
    let bravo = rows.iter().find(|r| r.name == "Bravo").unwrap();

    assert_eq!(alpha.tier, Tier::Promote);
    assert_eq!(alpha.cwl_attacks_used, 3);
    assert_eq!(bravo.tier, Tier::Safe);
    assert!(bravo.rationale.contains("inactive"), "rationale: {}", bravo.rationale);
}

/// An empty aggregation run yields an empty report, not an error.
#[test]
fn empty_records_yield_empty_report() {
    let rows = report::build_participation_report(&[], &EvalConfig::default());
    assert!(rows.is_empty());
}

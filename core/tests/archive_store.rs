//! Store tests — schema, append dedup, read-back through the source traits.

use chrono::NaiveDate;
use clantrack_core::{
    rows::{self, CwlLine, WarLogEntry},
    sources::{ArchiveReader, RosterEntry, RosterProvider},
    store::{ClanStore, ClassicWarArchiveEntry, CwlArchiveEntry},
};

const CLAN: &str = "#CLAN1";

fn store() -> ClanStore {
    let store = ClanStore::in_memory().expect("open in-memory store");
    store.migrate().expect("apply migrations");
    store
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn roster_entry(tag: &str, name: &str) -> RosterEntry {
    RosterEntry {
        clan_tag: CLAN.to_string(),
        clan_name: "Test Clan".to_string(),
        player_tag: tag.to_string(),
        player_name: name.to_string(),
        role: "Member".to_string(),
        th_level: 13,
    }
}

fn classic_entry(tag: &str, status: &str) -> ClassicWarArchiveEntry {
    ClassicWarArchiveEntry {
        member_tag: tag.to_string(),
        member_name: "Player".to_string(),
        th_level: 13,
        status_text: status.to_string(),
    }
}

#[test]
fn migrations_are_idempotent() {
    let store = store();
    store.migrate().expect("second migrate must be a no-op");
}

#[test]
fn roster_replace_overwrites_the_snapshot() {
    let store = store();
    store
        .replace_roster(CLAN, &[roster_entry("#AAA", "Alpha"), roster_entry("#BBB", "Bravo")])
        .unwrap();
    store
        .replace_roster(CLAN, &[roster_entry("#CCC", "Charlie")])
        .unwrap();

    let members = store.members(CLAN).unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].player_tag, "#CCC");
}

#[test]
fn role_changes_read_back_in_insertion_order() {
    let store = store();
    store.insert_role_change("#AAA", date(2025, 3, 1)).unwrap();
    store.insert_role_change("#AAA", date(2025, 6, 1)).unwrap();
    store.insert_role_change("#BBB", date(2025, 4, 1)).unwrap();

    let log = store.role_change_log().unwrap();
    assert_eq!(log.len(), 3);
    assert_eq!(log[1].player_tag, "#AAA");
    assert_eq!(log[1].changed_on, date(2025, 6, 1));
}

#[test]
fn classic_war_append_rejects_duplicate_war_ids() {
    let store = store();
    let war_id = rows::generate_war_id(CLAN, date(2025, 9, 14), "Night Owls");
    let entries = vec![classic_entry("#AAA", "\u{2714}\u{fe0f} 2/2")];

    assert!(store
        .append_classic_war(CLAN, &war_id, date(2025, 9, 14), "win", "Night Owls", &entries)
        .unwrap());
    assert!(
        !store
            .append_classic_war(CLAN, &war_id, date(2025, 9, 14), "win", "Night Owls", &entries)
            .unwrap(),
        "second append of the same war id must be refused"
    );

    let rows = store.classic_war_rows(CLAN).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].war_id, war_id);
    assert_eq!(rows[0].archive_date, date(2025, 9, 14));
}

#[test]
fn cwl_block_reads_back_as_header_then_entries() {
    let store = store();
    let block = rows::block_header(1, "Night Owls", "October 2025", CLAN);
    let entries = vec![
        CwlArchiveEntry {
            member_tag: "#AAA".to_string(),
            member_name: "Alpha".to_string(),
            status_text: "\u{2714}\u{fe0f}".to_string(),
            stars: 3,
            destruction: 100.0,
        },
        CwlArchiveEntry {
            member_tag: "#BBB".to_string(),
            member_name: "Bravo".to_string(),
            status_text: "\u{274c}".to_string(),
            stars: 0,
            destruction: 0.0,
        },
    ];

    assert!(store
        .append_cwl_block(CLAN, "October 2025", &block, date(2025, 10, 5), &entries)
        .unwrap());
    assert!(!store
        .append_cwl_block(CLAN, "October 2025", &block, date(2025, 10, 5), &entries)
        .unwrap());

    let lines = store.cwl_lines(CLAN).unwrap();
    assert_eq!(lines.len(), 3, "one header line plus two member lines");
    match &lines[0] {
        CwlLine::BlockHeader(id) => assert_eq!(*id, block),
        other => panic!("expected block header first, got {other:?}"),
    }
    match &lines[1] {
        CwlLine::Entry(row) => {
            assert_eq!(row.member_tag, "#AAA");
            assert_eq!(row.season_id, "October 2025");
            assert_eq!(row.stars, 3);
        }
        other => panic!("expected member entry, got {other:?}"),
    }
}

#[test]
fn war_log_ignores_duplicate_entries() {
    let store = store();
    let entry = WarLogEntry {
        war_id: "#CLAN1-20250914-NIGHTOWLS".to_string(),
        result: "win".to_string(),
        opponent_name: "Night Owls".to_string(),
        end_date: date(2025, 9, 14),
    };
    store.append_war_log_entry(CLAN, &entry).unwrap();
    store.append_war_log_entry(CLAN, &entry).unwrap();

    assert_eq!(store.war_log(CLAN).unwrap().len(), 1);
}

#[test]
fn raid_append_rejects_duplicate_raid_ids() {
    let store = store();
    let rows = vec![("#AAA".to_string(), "Alpha".to_string(), 25_000i64, 6u32)];

    assert!(store
        .append_raid_season(CLAN, "#CLAN1-2025-09-20", date(2025, 9, 20), &rows)
        .unwrap());
    assert!(!store
        .append_raid_season(CLAN, "#CLAN1-2025-09-20", date(2025, 9, 20), &rows)
        .unwrap());

    let read = store.raid_rows(CLAN).unwrap();
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].loot, 25_000);
    assert_eq!(read[0].attacks, 6);
}

#[test]
fn clans_upsert_and_list_by_name() {
    let store = store();
    store.upsert_clan("#CLAN2", "Bravo Clan").unwrap();
    store.upsert_clan("#CLAN1", "Alpha Clan").unwrap();
    store.upsert_clan("#CLAN2", "Bravo Clan Renamed").unwrap();

    let clans = store.clans().unwrap();
    assert_eq!(clans.len(), 2);
    assert_eq!(clans[0].name, "Alpha Clan");
    assert_eq!(clans[1].name, "Bravo Clan Renamed");
}

#[test]
fn archives_are_isolated_per_clan() {
    let store = store();
    let entries = vec![classic_entry("#AAA", "\u{2714}\u{fe0f} 2/2")];
    store
        .append_classic_war("#CLAN1", "war-a", date(2025, 9, 1), "win", "Foo", &entries)
        .unwrap();
    store
        .append_classic_war("#CLAN2", "war-b", date(2025, 9, 2), "lose", "Bar", &entries)
        .unwrap();

    assert_eq!(store.classic_war_rows("#CLAN1").unwrap().len(), 1);
    assert_eq!(store.classic_war_rows("#CLAN2").unwrap().len(), 1);
    assert!(store.classic_war_rows("#CLAN3").unwrap().is_empty());
}

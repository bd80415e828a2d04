//! Clan-level summaries derived from the archives.
//!
//! These feed the dashboard: latest CWL season performance, war-log win
//! rate, promotion/demotion headcounts, and the top raid looter.

use crate::{
    classifier::{self, Tier},
    config::EvalConfig,
    error::TrackResult,
    participation::ParticipationRecord,
    sources::ArchiveReader,
    types::{PlayerTag, Role},
};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

// ── CWL season summary ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CwlPlayerPerformance {
    pub tag: PlayerTag,
    pub name: String,
    pub stars: i64,
    pub attacks: u32,
    /// Mean destruction percentage over the player's attacks, 0–100.
    pub avg_destruction: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CwlSeasonSummary {
    pub season_id: String,
    pub total_stars: i64,
    /// Distinct war-day blocks archived for this season.
    pub war_days: usize,
    /// Ordered by stars, then average destruction, descending.
    pub performance: Vec<CwlPlayerPerformance>,
}

struct PlayerTally {
    name: String,
    stars: i64,
    destruction: f64,
    attacks: u32,
}

/// Summarize the most recently archived CWL season for a clan, or `None`
/// when the archive holds no season for it.
pub fn latest_cwl_summary(
    archive: &dyn ArchiveReader,
    clan_tag: &str,
) -> TrackResult<Option<CwlSeasonSummary>> {
    let lines = archive.cwl_lines(clan_tag)?;

    // The last data row's season id is the latest season: blocks are
    // appended in archive order.
    let latest_season = lines.iter().rev().find_map(|line| match line {
        crate::rows::CwlLine::Entry(row) if !row.season_id.trim().is_empty() => {
            Some(row.season_id.trim().to_string())
        }
        _ => None,
    });
    let Some(season_id) = latest_season else {
        return Ok(None);
    };

    let mut war_day_blocks: BTreeSet<String> = BTreeSet::new();
    let mut total_stars = 0i64;
    let mut tallies: BTreeMap<PlayerTag, PlayerTally> = BTreeMap::new();

    for line in &lines {
        match line {
            crate::rows::CwlLine::BlockHeader(block_id) => {
                if block_id.contains(clan_tag) && block_id.contains(&season_id) {
                    war_day_blocks.insert(block_id.clone());
                }
            }
            crate::rows::CwlLine::Entry(row) => {
                if row.season_id.trim() != season_id {
                    continue;
                }
                let Some(tag) = PlayerTag::parse(&row.member_tag) else {
                    continue;
                };
                total_stars += row.stars;

                let tally = tallies.entry(tag).or_insert_with(|| PlayerTally {
                    name: row.member_name.trim().to_string(),
                    stars: 0,
                    destruction: 0.0,
                    attacks: 0,
                });
                tally.stars += row.stars;
                tally.destruction += row.destruction;
                tally.attacks += 1;
            }
        }
    }

    let mut performance: Vec<CwlPlayerPerformance> = tallies
        .into_iter()
        .map(|(tag, tally)| CwlPlayerPerformance {
            tag,
            name: tally.name,
            stars: tally.stars,
            attacks: tally.attacks,
            avg_destruction: if tally.attacks > 0 {
                tally.destruction / tally.attacks as f64
            } else {
                0.0
            },
        })
        .collect();

    performance.sort_by(|a, b| {
        b.stars.cmp(&a.stars).then_with(|| {
            b.avg_destruction
                .partial_cmp(&a.avg_destruction)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    });

    Ok(Some(CwlSeasonSummary {
        season_id,
        total_stars,
        war_days: war_day_blocks.len(),
        performance,
    }))
}

// ── Dashboard metrics ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct RaidLooter {
    pub tag: PlayerTag,
    pub name: String,
    pub loot: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClanMetrics {
    pub wars_logged: u32,
    pub wars_won: u32,
    /// Members the classifier currently recommends for promotion.
    pub promotion_candidates: u32,
    /// Elders the classifier currently recommends for demotion.
    pub demotion_risks: u32,
    pub top_raid_looter: Option<RaidLooter>,
}

/// Compute the dashboard headline numbers for one clan from the war log,
/// the raid archive, and an already-aggregated participation run.
pub fn clan_metrics(
    archive: &dyn ArchiveReader,
    records: &[ParticipationRecord],
    config: &EvalConfig,
    clan_tag: &str,
) -> TrackResult<ClanMetrics> {
    let war_log = archive.war_log(clan_tag)?;
    let wars_logged = war_log.len() as u32;
    let wars_won = war_log
        .iter()
        .filter(|entry| entry.result.trim().eq_ignore_ascii_case("win"))
        .count() as u32;

    let mut promotion_candidates = 0u32;
    let mut demotion_risks = 0u32;
    for record in records {
        let classification = classifier::classify(record, config);
        match (record.role, classification.tier) {
            (Role::Member, Tier::Promote) => promotion_candidates += 1,
            (Role::Elder, Tier::Demote) => demotion_risks += 1,
            _ => {}
        }
    }

    // Lifetime loot per member; the biggest total wins the dashboard slot.
    let mut loot_totals: BTreeMap<PlayerTag, (String, i64)> = BTreeMap::new();
    for row in archive.raid_rows(clan_tag)? {
        let Some(tag) = PlayerTag::parse(&row.member_tag) else {
            continue;
        };
        let entry = loot_totals
            .entry(tag)
            .or_insert_with(|| (row.member_name.trim().to_string(), 0));
        entry.1 += row.loot;
    }
    let top_raid_looter = loot_totals
        .into_iter()
        .max_by_key(|(_, (_, loot))| *loot)
        .map(|(tag, (name, loot))| RaidLooter { tag, name, loot });

    Ok(ClanMetrics {
        wars_logged,
        wars_won,
        promotion_candidates,
        demotion_risks,
        top_raid_looter,
    })
}

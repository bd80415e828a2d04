//! Participation aggregation — war/CWL metrics for promotion review.
//!
//! One aggregation run reads the full roster and full archive history,
//! accumulates one record per member in memory, and returns the complete
//! result set. There is no streaming and no partial output; an aborted
//! run simply drops its accumulator.
//!
//! RULES:
//!   - Each war/day id contributes to a member's counts at most once,
//!     however often the archive repeats it.
//!   - Events dated at or before a member's reset date are ignored.
//!   - Archive rows for tags missing from the roster are dropped, not
//!     errored: history of departed members is intentionally discarded.

use crate::{
    config::EvalConfig,
    error::TrackResult,
    rows::{self, CwlLine},
    sources::{ArchiveReader, RosterEntry, RosterProvider},
    types::{BlockId, ClanTag, PlayerTag, Role, WarId},
};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

// ── Public types ─────────────────────────────────────────────────────────────

/// Per-member participation counts for one aggregation run.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipationRecord {
    pub tag: PlayerTag,
    pub name: String,
    pub clan_tag: ClanTag,
    pub clan_name: String,
    pub role: Role,
    pub th_level: i64,
    /// Most recent role change; history at or before this date is ignored.
    pub reset_date: Option<NaiveDate>,

    /// CWL war-days where the member attacked.
    pub cwl_attacks_used: u32,
    /// CWL war-days the member was registered for but sat out.
    pub cwl_wars_failed: u32,
    /// Classic wars where both allotted attacks were used.
    pub classic_wars_participated: u32,
    /// Classic wars with zero attacks used.
    pub classic_wars_failed: u32,

    // Dedup state, per member and per outcome kind.
    #[serde(skip)]
    registered_cwl_blocks: BTreeSet<BlockId>,
    #[serde(skip)]
    attacked_cwl_blocks: BTreeSet<BlockId>,
    #[serde(skip)]
    participated_war_ids: BTreeSet<WarId>,
    #[serde(skip)]
    failed_war_ids: BTreeSet<WarId>,
}

impl ParticipationRecord {
    /// A zeroed record for one roster member. Counts are filled in by the
    /// aggregation pass.
    pub fn new(tag: PlayerTag, entry: &RosterEntry, reset_date: Option<NaiveDate>) -> Self {
        Self {
            tag,
            name: entry.player_name.trim().to_string(),
            clan_tag: entry.clan_tag.trim().to_string(),
            clan_name: entry.clan_name.trim().to_string(),
            role: Role::parse(&entry.role),
            th_level: entry.th_level,
            reset_date,
            cwl_attacks_used: 0,
            cwl_wars_failed: 0,
            classic_wars_participated: 0,
            classic_wars_failed: 0,
            registered_cwl_blocks: BTreeSet::new(),
            attacked_cwl_blocks: BTreeSet::new(),
            participated_war_ids: BTreeSet::new(),
            failed_war_ids: BTreeSet::new(),
        }
    }

    /// True when an event dated `date` falls under the reset cutoff.
    fn before_reset(&self, date: NaiveDate) -> bool {
        matches!(self.reset_date, Some(reset) if date <= reset)
    }

    /// Number of distinct CWL war-days the member was registered for.
    pub fn registered_cwl_days(&self) -> usize {
        self.registered_cwl_blocks.len()
    }

    pub fn total_success(&self) -> u32 {
        self.cwl_attacks_used + self.classic_wars_participated
    }

    pub fn total_penalty(&self) -> u32 {
        self.cwl_wars_failed + self.classic_wars_failed
    }

    fn finalize_cwl(&mut self) {
        // Registered-but-unused days become penalties, floored at zero —
        // a negative gap means the archive repeated success rows out of
        // order, which is a data issue, not a caller error.
        let registered = self.registered_cwl_blocks.len() as u32;
        self.cwl_wars_failed = registered.saturating_sub(self.cwl_attacks_used);
    }
}

// ── Aggregator ───────────────────────────────────────────────────────────────

/// Two-state scan over the CWL archive stream: data rows only count once
/// a block header has been seen.
enum BlockScan {
    AwaitingBlock,
    InBlock(BlockId),
}

pub struct ParticipationAggregator<'a> {
    archive: &'a dyn ArchiveReader,
    roster: &'a dyn RosterProvider,
    config: EvalConfig,
}

impl<'a> ParticipationAggregator<'a> {
    pub fn new(
        archive: &'a dyn ArchiveReader,
        roster: &'a dyn RosterProvider,
        config: EvalConfig,
    ) -> Self {
        Self {
            archive,
            roster,
            config,
        }
    }

    /// Run one full aggregation pass for a clan. Missing or empty sources
    /// degrade to an empty result set; only storage failures propagate.
    pub fn aggregated_participation_data(
        &self,
        clan_tag: &str,
    ) -> TrackResult<Vec<ParticipationRecord>> {
        let mut members = self.initialize_members(clan_tag)?;
        self.aggregate_classic_wars(&mut members, clan_tag)?;
        self.aggregate_cwl_wars(&mut members, clan_tag)?;
        Ok(members.into_values().collect())
    }

    /// Build the member map from the roster, resolving each member's
    /// reset date from the role-change log. Only rows with a tag-shaped
    /// player tag are admitted.
    fn initialize_members(
        &self,
        clan_tag: &str,
    ) -> TrackResult<BTreeMap<PlayerTag, ParticipationRecord>> {
        let roster = self.roster.members(clan_tag)?;
        let change_log = self.roster.role_change_log()?;

        let mut reset_dates: HashMap<PlayerTag, NaiveDate> = HashMap::new();
        for change in &change_log {
            let Some(tag) = PlayerTag::parse(&change.player_tag) else {
                continue;
            };
            let latest = reset_dates.entry(tag).or_insert(change.changed_on);
            if change.changed_on > *latest {
                *latest = change.changed_on;
            }
        }

        let mut members = BTreeMap::new();
        for entry in &roster {
            let Some(tag) = PlayerTag::parse(&entry.player_tag) else {
                log::debug!("roster row skipped, tag not tag-shaped: {:?}", entry.player_tag);
                continue;
            };
            let reset_date = reset_dates.get(&tag).copied();
            members.insert(tag.clone(), ParticipationRecord::new(tag, entry, reset_date));
        }

        log::debug!("initialized {} members for {clan_tag}", members.len());
        Ok(members)
    }

    /// Fold the classic-war archive into the member map. A war id counts
    /// at most once per member per outcome kind.
    fn aggregate_classic_wars(
        &self,
        members: &mut BTreeMap<PlayerTag, ParticipationRecord>,
        clan_tag: &str,
    ) -> TrackResult<()> {
        let archive_rows = self.archive.classic_war_rows(clan_tag)?;

        for row in &archive_rows {
            let Some(tag) = PlayerTag::parse(&row.member_tag) else {
                continue;
            };
            let Some(member) = members.get_mut(&tag) else {
                // Departed or renamed member — history dropped by design.
                continue;
            };
            if member.before_reset(row.archive_date) {
                continue;
            }

            let Some(used) = rows::classic_attacks_used(&row.status_text) else {
                log::debug!(
                    "classic row for {} skipped, no outcome in status {:?}",
                    row.member_tag,
                    row.status_text
                );
                continue;
            };
            if used == self.config.classic_attacks_allowed {
                if member.participated_war_ids.insert(row.war_id.clone()) {
                    member.classic_wars_participated += 1;
                }
            } else if used == 0 {
                if member.failed_war_ids.insert(row.war_id.clone()) {
                    member.classic_wars_failed += 1;
                }
            }
            // One attack of two sits in the explicit non-classification
            // band: neither participation nor failure.
        }
        Ok(())
    }

    /// Fold the CWL archive into the member map. Every admitted row
    /// registers its block as an opportunity; success marks count an
    /// attack, once per block. Rows ahead of the first header are
    /// dropped.
    fn aggregate_cwl_wars(
        &self,
        members: &mut BTreeMap<PlayerTag, ParticipationRecord>,
        clan_tag: &str,
    ) -> TrackResult<()> {
        let lines = self.archive.cwl_lines(clan_tag)?;
        let mut scan = BlockScan::AwaitingBlock;

        for line in &lines {
            match line {
                CwlLine::BlockHeader(block_id) => {
                    scan = BlockScan::InBlock(block_id.clone());
                }
                CwlLine::Entry(row) => {
                    let BlockScan::InBlock(block_id) = &scan else {
                        log::debug!("cwl row before first block header dropped: {:?}", row.member_tag);
                        continue;
                    };
                    let Some(tag) = PlayerTag::parse(&row.member_tag) else {
                        continue;
                    };
                    let Some(member) = members.get_mut(&tag) else {
                        continue;
                    };
                    if member.before_reset(row.archive_date) {
                        continue;
                    }

                    member.registered_cwl_blocks.insert(block_id.clone());
                    if rows::cwl_attacked(&row.status_text)
                        && member.attacked_cwl_blocks.insert(block_id.clone())
                    {
                        member.cwl_attacks_used += 1;
                    }
                }
            }
        }

        for member in members.values_mut() {
            member.finalize_cwl();
        }
        Ok(())
    }
}

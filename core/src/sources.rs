//! Collaborator interfaces the aggregator consumes.
//!
//! The aggregator never reads the database or any sheet-shaped source
//! directly — it only sees these two traits. `store::ClanStore`
//! implements both; tests substitute in-memory fakes.

use crate::error::TrackResult;
use crate::rows::{ClassicWarRow, CwlLine, RaidRow, WarLogEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One roster row as supplied by the member directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub clan_tag: String,
    pub clan_name: String,
    /// Raw tag text; normalized via `PlayerTag::parse` on admission.
    pub player_tag: String,
    pub player_name: String,
    pub role: String,
    pub th_level: i64,
}

/// One logged role transition. The most recent entry per player becomes
/// that player's reset date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChange {
    pub player_tag: String,
    pub changed_on: NaiveDate,
}

/// Read access to the historical war archives.
pub trait ArchiveReader {
    fn classic_war_rows(&self, clan_tag: &str) -> TrackResult<Vec<ClassicWarRow>>;

    /// CWL lines in archive order, block boundaries included as
    /// `CwlLine::BlockHeader`.
    fn cwl_lines(&self, clan_tag: &str) -> TrackResult<Vec<CwlLine>>;

    fn war_log(&self, clan_tag: &str) -> TrackResult<Vec<WarLogEntry>>;

    fn raid_rows(&self, clan_tag: &str) -> TrackResult<Vec<RaidRow>>;
}

/// Read access to the current member directory.
pub trait RosterProvider {
    fn members(&self, clan_tag: &str) -> TrackResult<Vec<RosterEntry>>;

    fn role_change_log(&self) -> TrackResult<Vec<RoleChange>>;
}

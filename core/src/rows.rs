//! Archive row types and status-text parsing.
//!
//! RULE: positional and text parsing of archive cells lives here and in
//! the store adapter only. The aggregator sees typed rows and never
//! touches raw status strings itself.

use crate::types::{BlockId, WarId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Marker the archiver writes in front of a successful attack status.
pub const SUCCESS_MARK: &str = "\u{2714}\u{fe0f}";

/// Sentinel prefix of a CWL war-day block header line.
pub const BLOCK_HEADER_PREFIX: &str = "--- START";

/// One member's row in the classic-war archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassicWarRow {
    pub war_id: WarId,
    pub archive_date: NaiveDate,
    /// Raw tag text as archived; normalized at lookup time.
    pub member_tag: String,
    /// e.g. "✔️ 2/2" or "❌ 0/2".
    pub status_text: String,
}

/// One line of the CWL archive stream, in archive order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CwlLine {
    /// Starts a new war-day block; all entries until the next header
    /// belong to this block.
    BlockHeader(BlockId),
    Entry(CwlRow),
}

/// One member's row inside a CWL war-day block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CwlRow {
    pub season_id: String,
    pub archive_date: NaiveDate,
    pub member_tag: String,
    pub member_name: String,
    /// e.g. "✔️" or "❌".
    pub status_text: String,
    pub stars: i64,
    pub destruction: f64,
}

/// One result line of the war log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarLogEntry {
    pub war_id: WarId,
    pub result: String,
    pub opponent_name: String,
    pub end_date: NaiveDate,
}

/// One member's row in the raid archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RaidRow {
    pub raid_id: String,
    pub archive_date: NaiveDate,
    pub member_tag: String,
    pub member_name: String,
    pub loot: i64,
    pub attacks: u32,
}

/// Extract the attacks-used count from a classic status cell like
/// "✔️ 2/2" or "❌ 0/2". Returns `None` when the text carries no
/// `used/allowed` fragment; such a row states no outcome and must not
/// be counted against anyone.
pub fn classic_attacks_used(status: &str) -> Option<u32> {
    let chars: Vec<char> = status.chars().collect();
    for w in chars.windows(3) {
        if w[1] == '/' && w[0].is_ascii_digit() && w[2].is_ascii_digit() {
            return w[0].to_digit(10);
        }
    }
    None
}

/// A CWL status cell counts as an attack only when it leads with the
/// success mark. Any other text — failure mark, placeholder, garbage —
/// is "no attack".
pub fn cwl_attacked(status: &str) -> bool {
    status.trim_start().starts_with(SUCCESS_MARK)
}

/// True when an archive cell is a CWL block header line.
pub fn is_block_header(cell: &str) -> bool {
    cell.trim_start().starts_with(BLOCK_HEADER_PREFIX)
}

/// Compose the block header written when a CWL war-day is archived.
/// The embedded day/opponent/season/clan make the id unique per war-day.
pub fn block_header(day: u32, opponent: &str, season_id: &str, clan_tag: &str) -> BlockId {
    format!(
        "{BLOCK_HEADER_PREFIX} DAY {day} VS {} / SEASON {season_id} / CLAN {clan_tag} ---",
        opponent.trim().to_uppercase()
    )
}

/// Deterministic classic-war id: `{clan_tag}-{yyyymmdd}-{OPPONENT}` with
/// the opponent name uppercased and stripped to alphanumerics.
pub fn generate_war_id(clan_tag: &str, end_date: NaiveDate, opponent_name: &str) -> WarId {
    let safe_opponent: String = opponent_name
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    format!("{clan_tag}-{}-{safe_opponent}", end_date.format("%Y%m%d"))
}

use super::{ClanStore, DATE_FORMAT};
use crate::{
    error::TrackResult,
    rows::{ClassicWarRow, CwlLine, CwlRow, RaidRow, WarLogEntry},
};
use chrono::NaiveDate;
use rusqlite::params;

/// One member's line of a classic war being archived.
#[derive(Debug, Clone)]
pub struct ClassicWarArchiveEntry {
    pub member_tag: String,
    pub member_name: String,
    pub th_level: i64,
    pub status_text: String,
}

/// One member's line of a CWL war-day being archived.
#[derive(Debug, Clone)]
pub struct CwlArchiveEntry {
    pub member_tag: String,
    pub member_name: String,
    pub status_text: String,
    pub stars: i64,
    pub destruction: f64,
}

fn parse_date(text: &str, context: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(err) => {
            log::debug!("{context} row skipped, bad date {text:?}: {err}");
            None
        }
    }
}

impl ClanStore {
    // ── Classic war archive ────────────────────────────────────

    /// Append one finished classic war. Returns `false` without writing
    /// when the war id is already archived.
    pub fn append_classic_war(
        &self,
        clan_tag: &str,
        war_id: &str,
        archive_date: NaiveDate,
        result: &str,
        opponent_name: &str,
        entries: &[ClassicWarArchiveEntry],
    ) -> TrackResult<bool> {
        let already_archived: bool = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM classic_war_archive WHERE war_id = ?1)",
            params![war_id],
            |row| row.get(0),
        )?;
        if already_archived {
            log::info!("classic war {war_id} already archived, skipping");
            return Ok(false);
        }

        let date_text = archive_date.format(DATE_FORMAT).to_string();
        for entry in entries {
            self.conn().execute(
                "INSERT INTO classic_war_archive
                 (clan_tag, war_id, archive_date, result, opponent_name,
                  member_tag, member_name, th_level, status_text)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    clan_tag,
                    war_id,
                    date_text,
                    result,
                    opponent_name,
                    entry.member_tag,
                    entry.member_name,
                    entry.th_level,
                    entry.status_text,
                ],
            )?;
        }
        log::info!("archived classic war {war_id} ({} member rows)", entries.len());
        Ok(true)
    }

    pub(crate) fn read_classic_war_rows(&self, clan_tag: &str) -> TrackResult<Vec<ClassicWarRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT war_id, archive_date, member_tag, status_text
             FROM classic_war_archive WHERE clan_tag = ?1 ORDER BY id ASC",
        )?;
        let raw = stmt
            .query_map(params![clan_tag], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(raw.len());
        for (war_id, date_text, member_tag, status_text) in raw {
            let Some(archive_date) = parse_date(&date_text, "classic war archive") else {
                continue;
            };
            rows.push(ClassicWarRow {
                war_id,
                archive_date,
                member_tag,
                status_text,
            });
        }
        Ok(rows)
    }

    // ── CWL archive ────────────────────────────────────────────

    /// Append one CWL war-day block: a header line followed by its member
    /// lines. Returns `false` without writing when the block id is
    /// already archived.
    pub fn append_cwl_block(
        &self,
        clan_tag: &str,
        season_id: &str,
        block_id: &str,
        archive_date: NaiveDate,
        entries: &[CwlArchiveEntry],
    ) -> TrackResult<bool> {
        let already_archived: bool = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM cwl_archive WHERE block_id = ?1)",
            params![block_id],
            |row| row.get(0),
        )?;
        if already_archived {
            log::info!("cwl block {block_id:?} already archived, skipping");
            return Ok(false);
        }

        self.conn().execute(
            "INSERT INTO cwl_archive (clan_tag, block_id) VALUES (?1, ?2)",
            params![clan_tag, block_id],
        )?;

        let date_text = archive_date.format(DATE_FORMAT).to_string();
        for entry in entries {
            self.conn().execute(
                "INSERT INTO cwl_archive
                 (clan_tag, season_id, archive_date, member_tag, member_name,
                  status_text, stars, destruction)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    clan_tag,
                    season_id,
                    date_text,
                    entry.member_tag,
                    entry.member_name,
                    entry.status_text,
                    entry.stars,
                    entry.destruction,
                ],
            )?;
        }
        log::info!("archived cwl block ({} member rows)", entries.len());
        Ok(true)
    }

    pub(crate) fn read_cwl_lines(&self, clan_tag: &str) -> TrackResult<Vec<CwlLine>> {
        let mut stmt = self.conn().prepare(
            "SELECT block_id, season_id, archive_date, member_tag, member_name,
                    status_text, stars, destruction
             FROM cwl_archive WHERE clan_tag = ?1 ORDER BY id ASC",
        )?;
        let raw = stmt
            .query_map(params![clan_tag], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, i64>(6)?,
                    row.get::<_, f64>(7)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut lines = Vec::with_capacity(raw.len());
        for (block_id, season_id, date_text, member_tag, member_name, status_text, stars, destruction) in raw {
            if let Some(block_id) = block_id {
                lines.push(CwlLine::BlockHeader(block_id));
                continue;
            }
            let date_text = date_text.unwrap_or_default();
            let Some(archive_date) = parse_date(&date_text, "cwl archive") else {
                continue;
            };
            lines.push(CwlLine::Entry(CwlRow {
                season_id: season_id.unwrap_or_default(),
                archive_date,
                member_tag: member_tag.unwrap_or_default(),
                member_name: member_name.unwrap_or_default(),
                status_text: status_text.unwrap_or_default(),
                stars,
                destruction,
            }));
        }
        Ok(lines)
    }

    // ── War log ────────────────────────────────────────────────

    /// Record one war-log result. Duplicate (clan, war id) pairs are
    /// ignored, matching how the log is re-fetched wholesale upstream.
    pub fn append_war_log_entry(&self, clan_tag: &str, entry: &WarLogEntry) -> TrackResult<()> {
        self.conn().execute(
            "INSERT OR IGNORE INTO war_log (clan_tag, war_id, result, opponent_name, end_date)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                clan_tag,
                entry.war_id,
                entry.result,
                entry.opponent_name,
                entry.end_date.format(DATE_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    pub(crate) fn read_war_log(&self, clan_tag: &str) -> TrackResult<Vec<WarLogEntry>> {
        let mut stmt = self.conn().prepare(
            "SELECT war_id, result, opponent_name, end_date
             FROM war_log WHERE clan_tag = ?1 ORDER BY end_date DESC",
        )?;
        let raw = stmt
            .query_map(params![clan_tag], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = Vec::with_capacity(raw.len());
        for (war_id, result, opponent_name, date_text) in raw {
            let Some(end_date) = parse_date(&date_text, "war log") else {
                continue;
            };
            entries.push(WarLogEntry {
                war_id,
                result,
                opponent_name,
                end_date,
            });
        }
        Ok(entries)
    }

    // ── Raid archive ───────────────────────────────────────────

    /// Append one raid season's member rows. Returns `false` without
    /// writing when the raid id is already archived.
    pub fn append_raid_season(
        &self,
        clan_tag: &str,
        raid_id: &str,
        archive_date: NaiveDate,
        rows: &[(String, String, i64, u32)],
    ) -> TrackResult<bool> {
        let already_archived: bool = self.conn().query_row(
            "SELECT EXISTS(SELECT 1 FROM raid_archive WHERE raid_id = ?1)",
            params![raid_id],
            |row| row.get(0),
        )?;
        if already_archived {
            log::info!("raid {raid_id} already archived, skipping");
            return Ok(false);
        }

        let date_text = archive_date.format(DATE_FORMAT).to_string();
        for (member_tag, member_name, loot, attacks) in rows {
            self.conn().execute(
                "INSERT INTO raid_archive
                 (clan_tag, raid_id, archive_date, member_tag, member_name, loot, attacks)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![clan_tag, raid_id, date_text, member_tag, member_name, loot, attacks],
            )?;
        }
        Ok(true)
    }

    pub(crate) fn read_raid_rows(&self, clan_tag: &str) -> TrackResult<Vec<RaidRow>> {
        let mut stmt = self.conn().prepare(
            "SELECT raid_id, archive_date, member_tag, member_name, loot, attacks
             FROM raid_archive WHERE clan_tag = ?1 ORDER BY id ASC",
        )?;
        let raw = stmt
            .query_map(params![clan_tag], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, i64>(4)?,
                    row.get::<_, u32>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::with_capacity(raw.len());
        for (raid_id, date_text, member_tag, member_name, loot, attacks) in raw {
            let Some(archive_date) = parse_date(&date_text, "raid archive") else {
                continue;
            };
            rows.push(RaidRow {
                raid_id,
                archive_date,
                member_tag,
                member_name: member_name.unwrap_or_default(),
                loot,
                attacks,
            });
        }
        Ok(rows)
    }
}

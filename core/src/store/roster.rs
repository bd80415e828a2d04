use super::{ClanStore, DATE_FORMAT};
use crate::{
    error::TrackResult,
    sources::{RosterEntry, RoleChange},
};
use chrono::NaiveDate;
use rusqlite::params;

impl ClanStore {
    // ── Roster ─────────────────────────────────────────────────

    /// Replace the stored roster snapshot for one clan. A refresh always
    /// rewrites the full member list, mirroring how the directory is
    /// fetched upstream.
    pub fn replace_roster(&self, clan_tag: &str, entries: &[RosterEntry]) -> TrackResult<()> {
        self.conn()
            .execute("DELETE FROM roster WHERE clan_tag = ?1", params![clan_tag])?;
        for entry in entries {
            self.conn().execute(
                "INSERT INTO roster (clan_tag, clan_name, player_tag, player_name, role, th_level)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.clan_tag,
                    entry.clan_name,
                    entry.player_tag,
                    entry.player_name,
                    entry.role,
                    entry.th_level,
                ],
            )?;
        }
        log::debug!("roster for {clan_tag} replaced, {} entries", entries.len());
        Ok(())
    }

    pub(crate) fn read_roster(&self, clan_tag: &str) -> TrackResult<Vec<RosterEntry>> {
        let mut stmt = self.conn().prepare(
            "SELECT clan_tag, clan_name, player_tag, player_name, role, th_level
             FROM roster WHERE clan_tag = ?1 ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![clan_tag], |row| {
                Ok(RosterEntry {
                    clan_tag: row.get(0)?,
                    clan_name: row.get(1)?,
                    player_tag: row.get(2)?,
                    player_name: row.get(3)?,
                    role: row.get(4)?,
                    th_level: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Role-change log ────────────────────────────────────────

    pub fn insert_role_change(&self, player_tag: &str, changed_on: NaiveDate) -> TrackResult<()> {
        self.conn().execute(
            "INSERT INTO role_change_log (player_tag, changed_on) VALUES (?1, ?2)",
            params![player_tag, changed_on.format(DATE_FORMAT).to_string()],
        )?;
        Ok(())
    }

    pub(crate) fn read_role_change_log(&self) -> TrackResult<Vec<RoleChange>> {
        let mut stmt = self
            .conn()
            .prepare("SELECT player_tag, changed_on FROM role_change_log ORDER BY id ASC")?;
        let raw = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut changes = Vec::with_capacity(raw.len());
        for (player_tag, date_text) in raw {
            match NaiveDate::parse_from_str(&date_text, DATE_FORMAT) {
                Ok(changed_on) => changes.push(RoleChange {
                    player_tag,
                    changed_on,
                }),
                Err(err) => {
                    log::debug!("role change for {player_tag} skipped, bad date {date_text:?}: {err}");
                }
            }
        }
        Ok(changes)
    }
}

//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database. The aggregator and the
//! summaries consume `ClanStore` through the `sources` traits — they
//! never execute SQL directly.

mod archive;
mod roster;

pub use archive::{ClassicWarArchiveEntry, CwlArchiveEntry};

use crate::{
    error::TrackResult,
    rows::{ClassicWarRow, CwlLine, RaidRow, WarLogEntry},
    sources::{ArchiveReader, RosterEntry, RoleChange, RosterProvider},
};
use rusqlite::{params, Connection};
use serde::Serialize;

/// Dates are stored as ISO-8601 text columns.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// A clan known to the tracker (the original settings sheet).
#[derive(Debug, Clone, Serialize)]
pub struct ClanRef {
    pub tag: String,
    pub name: String,
}

pub struct ClanStore {
    conn: Connection,
}

impl ClanStore {
    /// Open (or create) the archive database at `path`.
    pub fn open(path: &str) -> TrackResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> TrackResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> TrackResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../migrations/002_archives.sql"))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ── Clan settings ──────────────────────────────────────────

    pub fn upsert_clan(&self, tag: &str, name: &str) -> TrackResult<()> {
        self.conn.execute(
            "INSERT INTO clans (tag, name) VALUES (?1, ?2)
             ON CONFLICT(tag) DO UPDATE SET name = excluded.name",
            params![tag, name],
        )?;
        Ok(())
    }

    pub fn clans(&self) -> TrackResult<Vec<ClanRef>> {
        let mut stmt = self.conn.prepare("SELECT tag, name FROM clans ORDER BY name ASC")?;
        let clans = stmt
            .query_map([], |row| {
                Ok(ClanRef {
                    tag: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(clans)
    }
}

impl ArchiveReader for ClanStore {
    fn classic_war_rows(&self, clan_tag: &str) -> TrackResult<Vec<ClassicWarRow>> {
        self.read_classic_war_rows(clan_tag)
    }

    fn cwl_lines(&self, clan_tag: &str) -> TrackResult<Vec<CwlLine>> {
        self.read_cwl_lines(clan_tag)
    }

    fn war_log(&self, clan_tag: &str) -> TrackResult<Vec<WarLogEntry>> {
        self.read_war_log(clan_tag)
    }

    fn raid_rows(&self, clan_tag: &str) -> TrackResult<Vec<RaidRow>> {
        self.read_raid_rows(clan_tag)
    }
}

impl RosterProvider for ClanStore {
    fn members(&self, clan_tag: &str) -> TrackResult<Vec<RosterEntry>> {
        self.read_roster(clan_tag)
    }

    fn role_change_log(&self) -> TrackResult<Vec<RoleChange>> {
        self.read_role_change_log()
    }
}

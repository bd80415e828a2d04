//! Shared primitive types used across the tracker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A clan tag as stored in the archive (e.g. "#2Q8GLU8JC").
pub type ClanTag = String;

/// Unique identifier of one archived classic war.
/// Format: `{clan_tag}-{yyyymmdd}-{OPPONENT}` — see `rows::generate_war_id`.
pub type WarId = String;

/// Unique identifier of one archived CWL war-day block.
pub type BlockId = String;

/// A normalized player tag.
///
/// Construction is the only place tag text is cleaned up. Every map key
/// and every archive lookup goes through `PlayerTag::parse`, so a case or
/// whitespace mismatch between roster and archive can never silently drop
/// a member's history.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerTag(String);

impl PlayerTag {
    /// Parse a raw tag cell. Returns `None` unless the trimmed text is
    /// non-empty beyond the leading `#` sigil.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() < 2 || !trimmed.starts_with('#') {
            return None;
        }
        Some(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clan role, ordered by authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Leader,
    CoLeader,
    Elder,
    Member,
    /// Anything the roster carries that we don't recognize. The
    /// classifier treats these as monitored-only.
    Unknown,
}

impl Role {
    /// Accepts both display names ("Co-Leader") and the game API's raw
    /// role names ("leader", "coLeader", "admin", "member").
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Leader" | "leader" => Role::Leader,
            "Co-Leader" | "coLeader" => Role::CoLeader,
            "Elder" | "admin" => Role::Elder,
            "Member" | "member" => Role::Member,
            _ => Role::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Leader => "Leader",
            Role::CoLeader => "Co-Leader",
            Role::Elder => "Elder",
            Role::Member => "Member",
            Role::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

//! Participation report assembly — ordered rows ready for rendering.
//!
//! Downstream surfaces (dashboard, web page) consume these rows as-is;
//! nothing here formats for a particular display.

use crate::{
    classifier::{self, Tier},
    config::EvalConfig,
    participation::ParticipationRecord,
    types::{ClanTag, PlayerTag, Role},
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ParticipationReportRow {
    pub name: String,
    pub th_level: i64,
    pub role: Role,
    pub tag: PlayerTag,
    pub clan_name: String,
    pub clan_tag: ClanTag,
    pub cwl_attacks_used: u32,
    pub classic_wars_participated: u32,
    pub cwl_wars_failed: u32,
    pub classic_wars_failed: u32,
    pub tier: Tier,
    pub rationale: String,
}

/// Classify every record and order the report by TH level descending,
/// then name.
pub fn build_participation_report(
    records: &[ParticipationRecord],
    config: &EvalConfig,
) -> Vec<ParticipationReportRow> {
    let mut report: Vec<ParticipationReportRow> = records
        .iter()
        .map(|record| {
            let classification = classifier::classify(record, config);
            ParticipationReportRow {
                name: record.name.clone(),
                th_level: record.th_level,
                role: record.role,
                tag: record.tag.clone(),
                clan_name: record.clan_name.clone(),
                clan_tag: record.clan_tag.clone(),
                cwl_attacks_used: record.cwl_attacks_used,
                classic_wars_participated: record.classic_wars_participated,
                cwl_wars_failed: record.cwl_wars_failed,
                classic_wars_failed: record.classic_wars_failed,
                tier: classification.tier,
                rationale: classification.rationale,
            }
        })
        .collect();

    report.sort_by(|a, b| b.th_level.cmp(&a.th_level).then_with(|| a.name.cmp(&b.name)));
    report
}

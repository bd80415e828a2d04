//! clan-report: headless participation evaluation over the clan archive.
//!
//! Usage:
//!   clan-report --db clan.db
//!   clan-report --db clan.db --clan "#2Q8GLU8JC" --json
//!   clan-report --db clan.db --config eval.json

use anyhow::Result;
use clantrack_core::{
    config::EvalConfig,
    participation::ParticipationAggregator,
    report::{self, ParticipationReportRow},
    store::{ClanRef, ClanStore},
    summary,
};
use std::env;

#[derive(serde::Serialize)]
struct ClanReport {
    clan_tag: String,
    clan_name: String,
    rows: Vec<ParticipationReportRow>,
    metrics: summary::ClanMetrics,
    cwl_season: Option<summary::CwlSeasonSummary>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db").unwrap_or(":memory:");
    let clan_filter = flag_value(&args, "--clan");
    let config_path = flag_value(&args, "--config");
    let json_mode = args.iter().any(|a| a == "--json");

    let config = match config_path {
        Some(path) => EvalConfig::load(path)?,
        None => EvalConfig::default(),
    };

    let store = ClanStore::open(db)?;
    store.migrate()?;

    let clans: Vec<ClanRef> = match clan_filter {
        Some(tag) => vec![ClanRef {
            tag: tag.to_string(),
            name: tag.to_string(),
        }],
        None => store.clans()?,
    };
    if clans.is_empty() {
        println!("No clans configured. Seed the clans table or pass --clan.");
        return Ok(());
    }

    let aggregator = ParticipationAggregator::new(&store, &store, config.clone());
    let mut reports = Vec::with_capacity(clans.len());

    for clan in &clans {
        log::info!("aggregating participation for {} ({})", clan.name, clan.tag);
        let records = aggregator.aggregated_participation_data(&clan.tag)?;
        let rows = report::build_participation_report(&records, &config);
        let metrics = summary::clan_metrics(&store, &records, &config, &clan.tag)?;
        let cwl_season = summary::latest_cwl_summary(&store, &clan.tag)?;

        reports.push(ClanReport {
            clan_tag: clan.tag.clone(),
            clan_name: clan.name.clone(),
            rows,
            metrics,
            cwl_season,
        });
    }

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for clan_report in &reports {
            print_report(clan_report);
        }
    }
    Ok(())
}

fn print_report(clan_report: &ClanReport) {
    println!(
        "=== PARTICIPATION: {} ({}) ===",
        clan_report.clan_name, clan_report.clan_tag
    );
    println!(
        "  {:<20} {:>3} {:<10} {:>9} {:>13} {:>8} {:>12}  {}",
        "NAME", "TH", "ROLE", "CWL OK", "CLASSIC OK", "CWL X", "CLASSIC X", "STATUS"
    );
    for row in &clan_report.rows {
        println!(
            "  {:<20} {:>3} {:<10} {:>9} {:>13} {:>8} {:>12}  {}",
            row.name,
            row.th_level,
            row.role.to_string(),
            row.cwl_attacks_used,
            row.classic_wars_participated,
            row.cwl_wars_failed,
            row.classic_wars_failed,
            row.rationale,
        );
    }

    let m = &clan_report.metrics;
    println!();
    println!("  wars logged:          {}", m.wars_logged);
    println!("  wars won:             {}", m.wars_won);
    println!("  promotion candidates: {}", m.promotion_candidates);
    println!("  demotion risks:       {}", m.demotion_risks);
    match &m.top_raid_looter {
        Some(looter) => println!("  top raid looter:      {} ({})", looter.name, looter.loot),
        None => println!("  top raid looter:      n/a"),
    }

    match &clan_report.cwl_season {
        Some(season) => {
            println!();
            println!(
                "  last CWL season: {} — {} war days, {} stars",
                season.season_id, season.war_days, season.total_stars
            );
            for perf in season.performance.iter().take(5) {
                println!(
                    "    {:<20} {:>2}\u{2b50} over {} attacks ({:.1}% avg)",
                    perf.name, perf.stars, perf.attacks, perf.avg_destruction
                );
            }
        }
        None => {
            println!();
            println!("  last CWL season: none archived");
        }
    }
    println!();
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

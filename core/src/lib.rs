//! clantrack-core — clan war participation tracking and promotion review.
//!
//! The crate ingests archived war history (classic wars, CWL war-day
//! blocks, war log, raid seasons) for the clans it tracks, aggregates one
//! participation record per roster member, and classifies each member
//! into a promote / demote / safe recommendation.
//!
//! Layering, leaf first:
//!   - `types`, `rows`     — tags, roles, archive row shapes, status parsing
//!   - `store`             — SQLite archive (the only module that runs SQL)
//!   - `sources`           — collaborator traits the aggregator consumes
//!   - `participation`     — the aggregation pass
//!   - `classifier`        — pure promotion/demotion decision
//!   - `report`, `summary` — assembled output for downstream surfaces

pub mod classifier;
pub mod config;
pub mod error;
pub mod participation;
pub mod report;
pub mod rows;
pub mod sources;
pub mod store;
pub mod summary;
pub mod types;

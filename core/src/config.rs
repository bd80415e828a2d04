//! Evaluation thresholds and attack allowances.
//!
//! Defaults match the clan's standing rules: three successes earn a
//! promotion recommendation, three penalties a demotion recommendation.
//! A JSON file can override them per deployment.

use crate::error::{TrackError, TrackResult};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Combined CWL + classic successes required for a promotion
    /// recommendation.
    pub success_limit: u32,
    /// Combined CWL + classic penalties that trigger a demotion
    /// recommendation.
    pub penalty_limit: u32,
    /// Attacks allotted per member in a classic war. A status reporting
    /// this many used attacks counts as full participation.
    pub classic_attacks_allowed: u32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            success_limit: 3,
            penalty_limit: 3,
            classic_attacks_allowed: 2,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct EvalConfigFile {
    evaluation: EvalConfig,
}

impl EvalConfig {
    /// Load thresholds from a JSON file of the shape
    /// `{ "evaluation": { "success_limit": 3, ... } }`.
    pub fn load(path: &str) -> TrackResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| TrackError::ConfigRead {
            path: path.to_string(),
            source,
        })?;
        let file: EvalConfigFile = serde_json::from_str(&text)?;
        Ok(file.evaluation)
    }
}

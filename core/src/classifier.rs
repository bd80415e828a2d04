//! Promotion/demotion classification — a pure mapping from one
//! participation record to a recommendation.
//!
//! The classifier only recommends; no role transition happens here.
//! Leaders and Co-Leaders are exempt from automatic action regardless of
//! their counts. For a Member who clears both thresholds at once,
//! promotion wins — success is checked first, deliberately.

use crate::{config::EvalConfig, participation::ParticipationRecord, types::Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Promote,
    Demote,
    Safe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub tier: Tier,
    pub rationale: String,
}

impl Classification {
    fn safe(rationale: impl Into<String>) -> Self {
        Self {
            tier: Tier::Safe,
            rationale: rationale.into(),
        }
    }
}

/// Classify one aggregated record. Total over every valid record; never
/// mutates its input.
pub fn classify(record: &ParticipationRecord, config: &EvalConfig) -> Classification {
    let total_success = record.total_success();
    let total_penalty = record.total_penalty();

    match record.role {
        // Leadership is monitored only.
        Role::Leader | Role::CoLeader => Classification::safe("safe (Leader/Co-Leader, monitored only)"),

        Role::Elder => {
            if total_penalty >= config.penalty_limit {
                Classification {
                    tier: Tier::Demote,
                    rationale: format!("demote to Member (penalty {total_penalty}x)"),
                }
            } else if total_penalty > 0 {
                Classification::safe(format!("safe ({total_penalty}x penalty on record)"))
            } else {
                Classification::safe("safe")
            }
        }

        Role::Member => {
            // Priority order matters: promotion outranks penalty.
            if total_success >= config.success_limit {
                Classification {
                    tier: Tier::Promote,
                    rationale: format!("promote to Elder (success {total_success}x)"),
                }
            } else if total_penalty >= config.penalty_limit {
                Classification {
                    tier: Tier::Demote,
                    rationale: "violation (manual demotion/kick candidate)".to_string(),
                }
            } else if total_success > 0 {
                Classification::safe(format!("safe ({total_success}x success)"))
            } else if total_penalty > 0 {
                Classification::safe(format!("safe ({total_penalty}x penalty on record)"))
            } else {
                Classification::safe("safe (inactive or new member)")
            }
        }

        Role::Unknown => Classification::safe("safe"),
    }
}

use crate::constants::FALLBACK_HOLD_MINUTES;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    Hold,
    Proceed,
    Reroute,
    PriorityChange,
}

impl RecommendationType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationType::Hold => "hold",
            RecommendationType::Proceed => "proceed",
            RecommendationType::Reroute => "reroute",
            RecommendationType::PriorityChange => "priority_change",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EstimatedImpact {
    /// Minutes of delay the action is expected to save
    pub delay_reduction: f64,
    pub affected_trains: Vec<String>,
}

/// A single proposed corrective action for one conflict
///
/// Recommendations are produced fresh per conflict and pass; accepting or
/// rejecting them is bookkeeping for whoever consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub conflict_id: String,
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub train_id: String,
    pub action: String,
    pub reasoning: String,
    /// Designer trust in the heuristic, in `[0, 1]`
    pub confidence: f64,
    pub estimated_impact: EstimatedImpact,
}

fn hold_minutes_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)]
        Regex::new(r"(\d+)\s*minutes?\b").unwrap()
    })
}

impl Recommendation {
    /// Hold length read back from the action text, e.g. "Hold IC 12 for 6 minutes"
    ///
    /// Falls back to `FALLBACK_HOLD_MINUTES` when no minute count is present.
    #[must_use]
    pub fn hold_minutes(&self) -> u32 {
        hold_minutes_regex()
            .captures(&self.action)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(FALLBACK_HOLD_MINUTES)
    }
}

/// Format the action text for a hold so `Recommendation::hold_minutes` can read it back
#[must_use]
pub fn hold_action(train_number: &str, minutes: u32) -> String {
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Hold {train_number} for {minutes} {unit}")
}

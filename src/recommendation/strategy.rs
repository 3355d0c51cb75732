//! Pluggable resolution policies used by the multi-conflict resolver.

use super::{hold_duration, hold_recommendation, involved_trains};
use crate::conflict::{estimate_arrival_minutes, Conflict, ConflictType};
use crate::models::{EngineConfig, Recommendation, Train};

/// A named policy turning one conflict into candidate recommendations
///
/// Strategies are pure: they read the conflict and the train set and never
/// mutate either. The resolver unions the output of every strategy that
/// `applies_to` the conflict's type.
pub trait ResolutionStrategy {
    fn name(&self) -> &'static str;

    fn applies_to(&self, conflict_type: ConflictType) -> bool;

    fn recommend(&self, conflict: &Conflict, trains: &[Train], config: &EngineConfig) -> Vec<Recommendation>;
}

/// Hold whichever train is estimated to arrive later
pub struct FirstComeFirstServed;

impl FirstComeFirstServed {
    pub const CONFIDENCE: f64 = 0.70;
}

impl ResolutionStrategy for FirstComeFirstServed {
    fn name(&self) -> &'static str {
        "first_come_first_served"
    }

    fn applies_to(&self, conflict_type: ConflictType) -> bool {
        matches!(conflict_type, ConflictType::Crossing | ConflictType::Platform)
    }

    fn recommend(&self, conflict: &Conflict, trains: &[Train], config: &EngineConfig) -> Vec<Recommendation> {
        let Some([a, b]) = involved_trains(conflict, trains) else {
            return Vec::new();
        };

        let (first, later) = if estimate_arrival_minutes(b, config) >= estimate_arrival_minutes(a, config) {
            (a, b)
        } else {
            (b, a)
        };

        vec![hold_recommendation(
            conflict,
            later,
            hold_duration(conflict.estimated_delay, config.safety_buffer),
            Self::CONFIDENCE,
            format!("{} arrives first and keeps its slot; {} waits", first.number, later.number),
        )]
    }
}

/// Hold the train with the lower raw priority
pub struct PriorityBased;

impl PriorityBased {
    pub const CONFIDENCE: f64 = 0.85;
}

impl ResolutionStrategy for PriorityBased {
    fn name(&self) -> &'static str {
        "priority_based"
    }

    fn applies_to(&self, conflict_type: ConflictType) -> bool {
        matches!(
            conflict_type,
            ConflictType::Crossing | ConflictType::Platform | ConflictType::Track
        )
    }

    fn recommend(&self, conflict: &Conflict, trains: &[Train], config: &EngineConfig) -> Vec<Recommendation> {
        let Some([a, b]) = involved_trains(conflict, trains) else {
            return Vec::new();
        };

        let (high, low) = if b.priority > a.priority { (b, a) } else { (a, b) };

        vec![hold_recommendation(
            conflict,
            low,
            hold_duration(conflict.estimated_delay, config.safety_buffer),
            Self::CONFIDENCE,
            format!(
                "{} (priority {}) yields to {} (priority {})",
                low.number, low.priority, high.number, high.priority
            ),
        )]
    }
}

/// Consider holding each train and prefer the hold that costs the system least
///
/// A candidate's score is `max(0, sum of the other trains' priorities - 2 * held priority)`.
pub struct MinimumSystemDelay;

impl MinimumSystemDelay {
    pub const CONFIDENCE: f64 = 0.75;

    #[must_use]
    pub fn hold_score(held: &Train, others: &[&Train]) -> f64 {
        let others_priority: f64 = others.iter().map(|t| f64::from(t.priority)).sum();
        (others_priority - 2.0 * f64::from(held.priority)).max(0.0)
    }
}

impl ResolutionStrategy for MinimumSystemDelay {
    fn name(&self) -> &'static str {
        "minimum_system_delay"
    }

    fn applies_to(&self, _conflict_type: ConflictType) -> bool {
        true
    }

    fn recommend(&self, conflict: &Conflict, trains: &[Train], config: &EngineConfig) -> Vec<Recommendation> {
        let Some(pair) = involved_trains(conflict, trains) else {
            return Vec::new();
        };
        let minutes = hold_duration(conflict.estimated_delay, config.safety_buffer);

        let mut scored: Vec<(f64, Recommendation)> = pair
            .iter()
            .map(|&held| {
                let others: Vec<&Train> = pair.iter().copied().filter(|t| t.id != held.id).collect();
                let score = Self::hold_score(held, &others);
                let rec = hold_recommendation(
                    conflict,
                    held,
                    minutes,
                    Self::CONFIDENCE,
                    format!("Holding {} scores {score:.1} on system delay", held.number),
                );
                (score, rec)
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.into_iter().map(|(_, rec)| rec).collect()
    }
}

/// The three built-in strategies
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn ResolutionStrategy>> {
    vec![
        Box::new(FirstComeFirstServed),
        Box::new(PriorityBased),
        Box::new(MinimumSystemDelay),
    ]
}

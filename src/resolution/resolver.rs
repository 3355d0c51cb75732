//! Strategy-driven batch resolution with scored candidates.

use super::optimizer::prioritize_conflicts;
use super::simulator::{apply_recommendation, simulate_recommendation, SimulationOutcome};
use crate::conflict::{Conflict, Severity};
use crate::models::{EngineConfig, Recommendation, Station, Track, Train};
use crate::recommendation::{default_strategies, ResolutionStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const CONFIDENCE_POINTS: f64 = 40.0;
const MAX_REDUCTION_POINTS: f64 = 30.0;
const FEASIBLE_POINTS: f64 = 20.0;
const NEW_CONFLICT_PENALTY: f64 = 5.0;
const MAX_ALTERNATIVES: usize = 2;

/// Candidate score on a 0-100 scale
///
/// `confidence*40 + min(reduction*2, 30) + (feasible ? 20 : 0) - new_conflicts*5 + severity bonus`,
/// clamped to `[0, 100]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score_candidate(confidence: f64, outcome: &SimulationOutcome, severity: Severity) -> f64 {
    let feasible = if outcome.feasible { FEASIBLE_POINTS } else { 0.0 };
    let score = confidence * CONFIDENCE_POINTS
        + (outcome.total_delay_reduction * 2.0).min(MAX_REDUCTION_POINTS)
        + feasible
        - outcome.new_conflicts.len() as f64 * NEW_CONFLICT_PENALTY
        + severity.resolution_bonus();
    score.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRecommendation {
    pub strategy: String,
    pub recommendation: Recommendation,
    pub outcome: SimulationOutcome,
    /// Normalized to `[0, 1]`
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub conflict_id: String,
    pub primary: ScoredRecommendation,
    pub alternatives: Vec<ScoredRecommendation>,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiConflictResolution {
    pub resolutions: Vec<ConflictResolution>,
    /// Conflicts with no candidate, or whose best candidate scored too low
    pub unresolved: Vec<String>,
    pub optimized_trains: Vec<Train>,
    pub total_delay_reduction: f64,
    pub affected_trains: Vec<String>,
}

/// Runs every applicable strategy per conflict, scores the results and applies the best
pub struct ConflictResolver {
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl Default for ConflictResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConflictResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::with_strategies(default_strategies())
    }

    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ResolutionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn ResolutionStrategy>) {
        self.strategies.push(strategy);
    }

    /// Candidates for one conflict against the current trains, best first
    fn score_candidates(
        &self,
        conflict: &Conflict,
        trains: &[Train],
        stations: &[Station],
        tracks: &[Track],
        config: &EngineConfig,
    ) -> Vec<ScoredRecommendation> {
        let mut candidates: Vec<ScoredRecommendation> = self
            .strategies
            .iter()
            .filter(|s| s.applies_to(conflict.conflict_type))
            .flat_map(|strategy| {
                strategy
                    .recommend(conflict, trains, config)
                    .into_iter()
                    .map(move |rec| (strategy.name(), rec))
            })
            .map(|(strategy, recommendation)| {
                let outcome = simulate_recommendation(&recommendation, trains, stations, tracks, config);
                let score = score_candidate(recommendation.confidence, &outcome, conflict.severity) / 100.0;
                ScoredRecommendation {
                    strategy: strategy.to_string(),
                    recommendation,
                    outcome,
                    score,
                }
            })
            .collect();

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates
    }

    /// Resolve a batch of conflicts in priority order against one working copy
    ///
    /// A conflict's primary recommendation is applied only when its normalized
    /// score exceeds `acceptance_threshold`. Later conflicts are scored against
    /// the trains as modified by earlier ones.
    #[must_use]
    pub fn resolve(
        &self,
        trains: &[Train],
        conflicts: &[Conflict],
        stations: &[Station],
        tracks: &[Track],
        config: &EngineConfig,
    ) -> MultiConflictResolution {
        let mut working = trains.to_vec();
        let mut resolutions = Vec::new();
        let mut unresolved = Vec::new();
        let mut affected: BTreeSet<String> = BTreeSet::new();
        let mut total_delay_reduction = 0.0;

        for conflict in prioritize_conflicts(conflicts) {
            let mut candidates = self.score_candidates(conflict, &working, stations, tracks, config).into_iter();
            let Some(primary) = candidates.next() else {
                log::debug!("No applicable strategy produced a candidate for {}", conflict.id);
                unresolved.push(conflict.id.clone());
                continue;
            };
            let alternatives: Vec<_> = candidates.take(MAX_ALTERNATIVES).collect();

            let applied = primary.score > config.resolution.acceptance_threshold
                && apply_recommendation(&mut working, &primary.recommendation, config);

            if applied {
                total_delay_reduction += primary.outcome.total_delay_reduction;
                affected.extend(primary.outcome.affected_trains.iter().cloned());
            } else {
                log::debug!(
                    "Best candidate for {} scored {:.2}, below threshold {:.2}",
                    conflict.id,
                    primary.score,
                    config.resolution.acceptance_threshold
                );
                unresolved.push(conflict.id.clone());
            }

            resolutions.push(ConflictResolution {
                conflict_id: conflict.id.clone(),
                primary,
                alternatives,
                applied,
            });
        }

        MultiConflictResolution {
            resolutions,
            unresolved,
            optimized_trains: working,
            total_delay_reduction,
            affected_trains: affected.into_iter().collect(),
        }
    }
}

/// Resolve a batch with the built-in strategies
#[must_use]
pub fn resolve_multiple_conflicts(
    trains: &[Train],
    conflicts: &[Conflict],
    stations: &[Station],
    tracks: &[Track],
    config: &EngineConfig,
) -> MultiConflictResolution {
    ConflictResolver::new().resolve(trains, conflicts, stations, tracks, config)
}

//! Project the effect of one recommendation on a private copy of the train set.

use crate::conflict::{detect_conflicts, Conflict, ConflictKey};
use crate::constants::MIN_PRIORITY;
use crate::models::{total_delay, EngineConfig, Recommendation, RecommendationType, ReductionSource, Station, Track, Train};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub total_delay_reduction: f64,
    pub affected_trains: Vec<String>,
    /// Conflicts present after applying that were not present before
    pub new_conflicts: Vec<Conflict>,
    pub feasible: bool,
}

impl SimulationOutcome {
    fn infeasible() -> Self {
        Self::default()
    }
}

/// Apply a recommendation's effect to a train list in place
///
/// Returns `false` if the target train is not in the list, leaving it untouched.
pub fn apply_recommendation(trains: &mut [Train], recommendation: &Recommendation, config: &EngineConfig) -> bool {
    let Some(train) = trains.iter_mut().find(|t| t.id == recommendation.train_id) else {
        return false;
    };

    match recommendation.recommendation_type {
        RecommendationType::Hold => train.add_delay(f64::from(recommendation.hold_minutes())),
        RecommendationType::Reroute => train.add_delay(config.rerouting_delay),
        RecommendationType::PriorityChange => {
            train.set_priority(train.priority.saturating_sub(1).max(MIN_PRIORITY));
        }
        RecommendationType::Proceed => {}
    }
    true
}

/// Simulate a recommendation without touching the caller's trains
///
/// The recommendation is feasible only if it yields a positive delay
/// reduction and introduces no conflict that was not already present. Track
/// conflicts are only re-checked when `revalidate_tracks` is set.
#[must_use]
pub fn simulate_recommendation(
    recommendation: &Recommendation,
    trains: &[Train],
    stations: &[Station],
    tracks: &[Track],
    config: &EngineConfig,
) -> SimulationOutcome {
    let mut working = trains.to_vec();
    if !apply_recommendation(&mut working, recommendation, config) {
        log::debug!(
            "Recommendation {} targets unknown train {}",
            recommendation.id,
            recommendation.train_id
        );
        return SimulationOutcome::infeasible();
    }

    let accounting = &config.resolution.delay_accounting;
    let source = match recommendation.recommendation_type {
        RecommendationType::Hold => accounting.hold,
        RecommendationType::Reroute => accounting.reroute,
        RecommendationType::PriorityChange => accounting.priority_change,
        RecommendationType::Proceed => accounting.proceed,
    };
    let total_delay_reduction = match source {
        ReductionSource::Measured => total_delay(trains) - total_delay(&working),
        ReductionSource::Estimated => recommendation.estimated_impact.delay_reduction,
        ReductionSource::Zero => 0.0,
    };

    let checked_tracks: &[Track] = if config.resolution.revalidate_tracks { tracks } else { &[] };
    let before: HashSet<ConflictKey> = detect_conflicts(trains, stations, checked_tracks, config)
        .iter()
        .map(Conflict::key)
        .collect();
    let new_conflicts: Vec<Conflict> = detect_conflicts(&working, stations, checked_tracks, config)
        .into_iter()
        .filter(|c| !before.contains(&c.key()))
        .collect();

    let mut affected_trains = recommendation.estimated_impact.affected_trains.clone();
    if !affected_trains.contains(&recommendation.train_id) {
        affected_trains.push(recommendation.train_id.clone());
    }

    SimulationOutcome {
        feasible: total_delay_reduction > 0.0 && new_conflicts.is_empty(),
        total_delay_reduction,
        affected_trains,
        new_conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{stations, track, train_on};
    use crate::models::{hold_action, EstimatedImpact, TrainType};

    fn recommendation(kind: RecommendationType, train_id: &str, action: String, reduction: f64) -> Recommendation {
        Recommendation {
            id: "R1".to_string(),
            conflict_id: "C1".to_string(),
            recommendation_type: kind,
            train_id: train_id.to_string(),
            action,
            reasoning: String::new(),
            confidence: 0.85,
            estimated_impact: EstimatedImpact {
                delay_reduction: reduction,
                affected_trains: vec![train_id.to_string()],
            },
        }
    }

    fn estimated_holds() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.resolution.delay_accounting.hold = ReductionSource::Estimated;
        config
    }

    #[test]
    fn test_simulation_never_mutates_input() {
        let config = EngineConfig::default();
        let trains = vec![train_on("A", TrainType::Express, 5, None, Some("STN002"))];
        let before = trains.clone();
        let rec = recommendation(RecommendationType::Hold, "A", hold_action("A", 6), 2.0);

        let _ = simulate_recommendation(&rec, &trains, &stations(), &[], &config);
        assert_eq!(trains, before);
    }

    #[test]
    fn test_unknown_target_is_infeasible() {
        let config = EngineConfig::default();
        let trains = vec![train_on("A", TrainType::Express, 5, None, Some("STN002"))];
        let rec = recommendation(RecommendationType::Hold, "ZZZ", hold_action("ZZZ", 6), 2.0);

        let outcome = simulate_recommendation(&rec, &trains, &stations(), &[], &config);
        assert!(!outcome.feasible);
        assert_eq!(outcome.total_delay_reduction, 0.0);
        assert!(outcome.affected_trains.is_empty());
    }

    #[test]
    fn test_measured_hold_reduction_is_net_delay_change() {
        let config = EngineConfig::default();
        let trains = vec![
            train_on("X", TrainType::Express, 9, None, Some("STN002")),
            train_on("Y", TrainType::Freight, 3, None, Some("STN002")).with_delay(0.5),
        ];
        let rec = recommendation(RecommendationType::Hold, "Y", hold_action("Y", 6), 2.5);

        let outcome = simulate_recommendation(&rec, &trains, &stations(), &[], &config);
        assert_eq!(outcome.total_delay_reduction, -6.0);
        assert!(outcome.new_conflicts.is_empty());
        assert!(!outcome.feasible);
    }

    #[test]
    fn test_estimated_hold_clearing_conflict_is_feasible() {
        let config = estimated_holds();
        let trains = vec![
            train_on("X", TrainType::Express, 9, None, Some("STN002")),
            train_on("Y", TrainType::Freight, 3, None, Some("STN002")).with_delay(0.5),
        ];
        let rec = recommendation(RecommendationType::Hold, "Y", hold_action("Y", 6), 2.5);

        let outcome = simulate_recommendation(&rec, &trains, &stations(), &[], &config);
        assert_eq!(outcome.total_delay_reduction, 2.5);
        assert!(outcome.feasible);
    }

    #[test]
    fn test_hold_creating_new_conflict_is_infeasible() {
        // Holding A by 6 minutes moves its arrival estimate from 30 to 36, right next to C at 36.5
        let config = estimated_holds();
        let trains = vec![
            train_on("A", TrainType::Freight, 2, None, Some("STN002")),
            train_on("B", TrainType::Express, 9, None, Some("STN002")).with_delay(0.5),
            train_on("C", TrainType::Suburban, 5, None, Some("STN002")).with_delay(6.5),
        ];
        let rec = recommendation(RecommendationType::Hold, "A", hold_action("A", 6), 2.5);

        let outcome = simulate_recommendation(&rec, &trains, &stations(), &[], &config);
        assert!(outcome.total_delay_reduction > 0.0);
        assert_eq!(outcome.new_conflicts.len(), 1);
        assert!(outcome.new_conflicts[0].involves("A"));
        assert!(outcome.new_conflicts[0].involves("C"));
        assert!(!outcome.feasible);
    }

    #[test]
    fn test_reroute_uses_estimated_impact_and_adds_delay() {
        let config = EngineConfig::default();
        let mut trains = vec![train_on("A", TrainType::Freight, 2, Some("STN001"), Some("STN002"))];
        let rec = recommendation(RecommendationType::Reroute, "A", "Reroute A".to_string(), 1.5);

        let outcome = simulate_recommendation(&rec, &trains, &stations(), &[], &config);
        assert_eq!(outcome.total_delay_reduction, 1.5);
        assert!(outcome.feasible);

        assert!(apply_recommendation(&mut trains, &rec, &config));
        assert_eq!(trains[0].delay, config.rerouting_delay);
    }

    #[test]
    fn test_priority_change_floor_and_zero_reduction() {
        let config = EngineConfig::default();
        let mut trains = vec![train_on("A", TrainType::Express, 1, None, None)];
        let rec = recommendation(RecommendationType::PriorityChange, "A", "Lower A".to_string(), 1.0);

        let outcome = simulate_recommendation(&rec, &trains, &stations(), &[], &config);
        assert_eq!(outcome.total_delay_reduction, 0.0);
        assert!(!outcome.feasible);

        apply_recommendation(&mut trains, &rec, &config);
        assert_eq!(trains[0].priority, 1);
    }

    #[test]
    fn test_priority_change_decrements() {
        let config = EngineConfig::default();
        let mut trains = vec![train_on("A", TrainType::Express, 7, None, None)];
        let rec = recommendation(RecommendationType::PriorityChange, "A", "Lower A".to_string(), 1.0);
        apply_recommendation(&mut trains, &rec, &config);
        assert_eq!(trains[0].priority, 6);
    }

    #[test]
    fn test_hold_without_minutes_uses_fallback() {
        let config = EngineConfig::default();
        let mut trains = vec![train_on("A", TrainType::Express, 7, None, None)];
        let rec = recommendation(RecommendationType::Hold, "A", "Hold A at the platform".to_string(), 1.0);
        apply_recommendation(&mut trains, &rec, &config);
        assert_eq!(trains[0].delay, 5.0);
    }

    #[test]
    fn test_existing_track_conflict_is_not_new() {
        let mut config = EngineConfig::default();
        config.resolution.revalidate_tracks = true;
        let tracks = vec![track("TRK1", "STN001", "STN002")];
        let trains = vec![
            train_on("A", TrainType::Freight, 2, Some("STN001"), Some("STN002")),
            train_on("B", TrainType::Express, 8, Some("STN002"), Some("STN001")).with_delay(40.0),
        ];
        let rec = recommendation(RecommendationType::Reroute, "A", "Reroute A".to_string(), 1.0);

        let outcome = simulate_recommendation(&rec, &trains, &stations(), &tracks, &config);
        assert!(outcome.new_conflicts.is_empty());
        assert!(outcome.feasible);
    }
}

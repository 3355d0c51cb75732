//! Single-shot batch optimization over a shared working copy.

use super::simulator::{apply_recommendation, simulate_recommendation};
use crate::conflict::Conflict;
use crate::models::{EngineConfig, Station, Track, Train};
use crate::recommendation::generate_recommendations;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimized_trains: Vec<Train>,
    /// Ids of conflicts whose top recommendation was feasible and applied
    pub resolved_conflicts: Vec<String>,
    pub total_delay_reduction: f64,
}

/// Order conflicts by severity weight times estimated delay, largest first
///
/// Both danger and cost count, so a low-severity conflict with a long delay
/// can come before a critical one with a trivial delay. Ties keep input order.
#[must_use]
pub fn prioritize_conflicts(conflicts: &[Conflict]) -> Vec<&Conflict> {
    let mut ordered: Vec<&Conflict> = conflicts.iter().collect();
    ordered.sort_by(|a, b| b.priority_weight().total_cmp(&a.priority_weight()));
    ordered
}

/// Resolve conflicts one by one against a shared working copy of the trains
///
/// Each conflict gets recommendations generated against the working copy as
/// it stands, so earlier resolutions shape later ones. Only the top-ranked
/// recommendation is simulated; conflicts without a feasible one are skipped
/// and simply missing from `resolved_conflicts`.
///
/// The top recommendation is normally a hold. Under the default
/// `DelayAccounting` a hold's reduction is measured as net delay change,
/// which is always negative, so with a default config no conflict is
/// resolved and `resolved_conflicts` comes back empty even when conflicts
/// remain. Set `resolution.delay_accounting.hold` to `Estimated` to let
/// holds through.
#[must_use]
pub fn optimize_schedule(
    trains: &[Train],
    conflicts: &[Conflict],
    stations: &[Station],
    tracks: &[Track],
    config: &EngineConfig,
) -> OptimizationResult {
    let mut working = trains.to_vec();
    let mut resolved_conflicts = Vec::new();
    let mut total_delay_reduction = 0.0;

    for conflict in prioritize_conflicts(conflicts) {
        let recommendations = generate_recommendations(conflict, &working, config);
        let Some(top) = recommendations.first() else {
            log::debug!("No recommendations for conflict {}, skipping", conflict.id);
            continue;
        };

        let outcome = simulate_recommendation(top, &working, stations, tracks, config);
        if !outcome.feasible {
            log::debug!(
                "Top recommendation for {} is infeasible (reduction {:.1}, {} new conflicts), skipping",
                conflict.id,
                outcome.total_delay_reduction,
                outcome.new_conflicts.len()
            );
            continue;
        }

        apply_recommendation(&mut working, top, config);
        resolved_conflicts.push(conflict.id.clone());
        total_delay_reduction += outcome.total_delay_reduction;
    }

    log::debug!(
        "Optimized schedule: {}/{} conflicts resolved, {:.1} minutes saved",
        resolved_conflicts.len(),
        conflicts.len(),
        total_delay_reduction
    );

    OptimizationResult {
        optimized_trains: working,
        resolved_conflicts,
        total_delay_reduction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{detect_conflicts, ConflictLocation, ConflictType, Severity};
    use crate::models::fixtures::{stations, train_on};
    use crate::models::{ReductionSource, TrainType};

    fn conflict(id: &str, severity: Severity, delay: f64) -> Conflict {
        let mut conflict = Conflict::new(
            ConflictType::Crossing,
            "A",
            "B",
            ConflictLocation::Station("STN002".to_string()),
            severity,
            delay,
        );
        conflict.id = id.to_string();
        conflict
    }

    #[test]
    fn test_low_severity_long_delay_goes_first() {
        let conflicts = vec![
            conflict("critical", Severity::Critical, 5.0),
            conflict("low", Severity::Low, 30.0),
        ];
        let ordered: Vec<_> = prioritize_conflicts(&conflicts).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ordered, vec!["low", "critical"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let conflicts = vec![
            conflict("first", Severity::Medium, 3.0),
            conflict("second", Severity::High, 2.0),
        ];
        let ordered: Vec<_> = prioritize_conflicts(&conflicts).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ordered, vec!["first", "second"]);
    }

    #[test]
    fn test_optimizer_does_not_touch_input() {
        let mut config = EngineConfig::default();
        config.resolution.delay_accounting.hold = ReductionSource::Estimated;
        let trains = vec![
            train_on("X", TrainType::Express, 9, None, Some("STN002")),
            train_on("Y", TrainType::Freight, 3, None, Some("STN002")).with_delay(0.5),
        ];
        let before = trains.clone();
        let conflicts = detect_conflicts(&trains, &stations(), &[], &config);

        let result = optimize_schedule(&trains, &conflicts, &stations(), &[], &config);

        assert_eq!(trains, before);
        assert_eq!(result.resolved_conflicts, vec![conflicts[0].id.clone()]);
        assert_eq!(result.total_delay_reduction, 2.5);
        let y = result.optimized_trains.iter().find(|t| t.id == "Y").expect("Y kept");
        assert_eq!(y.delay, 6.5);
        assert!(detect_conflicts(&result.optimized_trains, &stations(), &[], &config).is_empty());
    }

    #[test]
    fn test_measured_holds_are_skipped() {
        let config = EngineConfig::default();
        let trains = vec![
            train_on("X", TrainType::Express, 9, None, Some("STN002")),
            train_on("Y", TrainType::Freight, 3, None, Some("STN002")).with_delay(0.5),
        ];
        let conflicts = detect_conflicts(&trains, &stations(), &[], &config);

        let result = optimize_schedule(&trains, &conflicts, &stations(), &[], &config);

        assert!(result.resolved_conflicts.is_empty());
        assert_eq!(result.total_delay_reduction, 0.0);
        assert_eq!(result.optimized_trains, trains);
    }

    #[test]
    fn test_resolves_conflicts_in_priority_order() {
        let mut config = EngineConfig::default();
        config.resolution.delay_accounting.hold = ReductionSource::Estimated;
        let trains = vec![
            train_on("X", TrainType::Express, 9, None, Some("STN002")),
            train_on("Y", TrainType::Freight, 3, None, Some("STN002")).with_delay(0.5),
            train_on("Z", TrainType::Suburban, 6, None, Some("STN002")).with_delay(10.0),
            train_on("W", TrainType::Freight, 2, None, Some("STN002")).with_delay(11.5),
        ];
        let conflicts = detect_conflicts(&trains, &stations(), &[], &config);
        assert_eq!(conflicts.len(), 2);
        let zw = conflicts.iter().find(|c| c.involves("Z")).expect("Z/W conflict");
        let xy = conflicts.iter().find(|c| c.involves("X")).expect("X/Y conflict");

        let result = optimize_schedule(&trains, &conflicts, &stations(), &[], &config);

        assert_eq!(result.resolved_conflicts, vec![xy.id.clone(), zw.id.clone()]);
        assert_eq!(result.total_delay_reduction, 4.0);
        let delay_of = |id: &str| result.optimized_trains.iter().find(|t| t.id == id).map(|t| t.delay);
        assert_eq!(delay_of("Y"), Some(6.5));
        assert_eq!(delay_of("W"), Some(16.5));
    }

    #[test]
    fn test_unknown_trains_are_skipped() {
        let config = EngineConfig::default();
        let conflicts = vec![conflict("ghost", Severity::Critical, 4.0)];
        let result = optimize_schedule(&[], &conflicts, &stations(), &[], &config);
        assert!(result.resolved_conflicts.is_empty());
    }
}

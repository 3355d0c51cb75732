//! Rule-based recommendation generation for a single conflict.
//!
//! Confidence values encode how much the heuristic class is trusted
//! (hold > reroute > priority change); they are not calibrated probabilities.

mod strategy;

pub use strategy::{
    default_strategies, FirstComeFirstServed, MinimumSystemDelay, PriorityBased, ResolutionStrategy,
};

use crate::conflict::{Conflict, Severity};
use crate::constants::MIN_HOLD_MINUTES;
use crate::models::{
    hold_action, id, EngineConfig, EstimatedImpact, Recommendation, RecommendationType, Train,
};

pub const HOLD_CONFIDENCE: f64 = 0.85;
pub const REROUTE_CONFIDENCE: f64 = 0.72;
pub const PRIORITY_CHANGE_CONFIDENCE: f64 = 0.65;

const REROUTE_REDUCTION_SHARE: f64 = 0.6;
const PRIORITY_CHANGE_REDUCTION_SHARE: f64 = 0.4;

/// Whole minutes a train is held to clear a conflict
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hold_duration(estimated_delay: f64, safety_buffer: f64) -> u32 {
    (estimated_delay + safety_buffer).max(MIN_HOLD_MINUTES).ceil() as u32
}

/// Find the two trains named by a conflict, in the conflict's order
pub(crate) fn involved_trains<'t>(conflict: &Conflict, trains: &'t [Train]) -> Option<[&'t Train; 2]> {
    let find = |id: &str| trains.iter().find(|t| t.id == id);
    Some([find(conflict.trains[0].as_str())?, find(conflict.trains[1].as_str())?])
}

pub(crate) fn hold_recommendation(
    conflict: &Conflict,
    target: &Train,
    minutes: u32,
    confidence: f64,
    reasoning: String,
) -> Recommendation {
    Recommendation {
        id: id::recommendation_id(RecommendationType::Hold.as_str()),
        conflict_id: conflict.id.clone(),
        recommendation_type: RecommendationType::Hold,
        train_id: target.id.clone(),
        action: hold_action(&target.number, minutes),
        reasoning,
        confidence,
        estimated_impact: EstimatedImpact {
            delay_reduction: conflict.estimated_delay,
            affected_trains: vec![target.id.clone()],
        },
    }
}

/// Candidate resolutions for one conflict, highest confidence first
///
/// Returns an empty list when either train cannot be found. Otherwise a hold
/// on the lower weighted-priority train is always present; a reroute and a
/// priority change are added when the configuration and the conflict allow.
#[must_use]
pub fn generate_recommendations(
    conflict: &Conflict,
    trains: &[Train],
    config: &EngineConfig,
) -> Vec<Recommendation> {
    let Some(pair) = involved_trains(conflict, trains) else {
        log::debug!("Conflict {} refers to unknown trains, no recommendations", conflict.id);
        return Vec::new();
    };

    let mut ranked: Vec<(&Train, f64)> = pair
        .iter()
        .map(|&t| (t, f64::from(t.priority) * config.priority_weight(t.train_type)))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (high, high_weight) = ranked[0];
    let (low, low_weight) = ranked[1];

    let mut recommendations = Vec::with_capacity(3);

    let minutes = hold_duration(conflict.estimated_delay, config.safety_buffer);
    recommendations.push(hold_recommendation(
        conflict,
        low,
        minutes,
        HOLD_CONFIDENCE,
        format!(
            "{} has lower weighted priority ({low_weight:.1} vs {high_weight:.1}); holding it lets {} pass",
            low.number, high.number
        ),
    ));

    if config.resolution.allow_rerouting {
        if let Some((current, next)) = low.leg() {
            recommendations.push(Recommendation {
                id: id::recommendation_id(RecommendationType::Reroute.as_str()),
                conflict_id: conflict.id.clone(),
                recommendation_type: RecommendationType::Reroute,
                train_id: low.id.clone(),
                action: format!("Reroute {} via an alternate path from {current} to {next}", low.number),
                reasoning: format!(
                    "An alternate path keeps {} moving at the cost of {:.0} extra minutes",
                    low.number, config.rerouting_delay
                ),
                confidence: REROUTE_CONFIDENCE,
                estimated_impact: EstimatedImpact {
                    delay_reduction: conflict.estimated_delay * REROUTE_REDUCTION_SHARE,
                    affected_trains: vec![low.id.clone()],
                },
            });
        }
    }

    if config.resolution.allow_priority_override && conflict.severity == Severity::Critical {
        recommendations.push(Recommendation {
            id: id::recommendation_id(RecommendationType::PriorityChange.as_str()),
            conflict_id: conflict.id.clone(),
            recommendation_type: RecommendationType::PriorityChange,
            train_id: high.id.clone(),
            action: format!("Temporarily lower the priority of {}", high.number),
            reasoning: format!(
                "Critical conflict: demoting {} lets the network sequence both trains",
                high.number
            ),
            confidence: PRIORITY_CHANGE_CONFIDENCE,
            estimated_impact: EstimatedImpact {
                delay_reduction: conflict.estimated_delay * PRIORITY_CHANGE_REDUCTION_SHARE,
                affected_trains: vec![high.id.clone(), low.id.clone()],
            },
        });
    }

    recommendations.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{detect_conflicts, ConflictLocation, ConflictType};
    use crate::models::fixtures::{stations, train_on};
    use crate::models::TrainType;

    fn conflict(severity: Severity, delay: f64) -> Conflict {
        Conflict::new(
            ConflictType::Crossing,
            "X",
            "Y",
            ConflictLocation::Station("STN002".to_string()),
            severity,
            delay,
        )
    }

    fn pair() -> Vec<Train> {
        vec![
            train_on("X", TrainType::Express, 9, Some("STN001"), Some("STN002")),
            train_on("Y", TrainType::Freight, 3, Some("STN003"), Some("STN002")),
        ]
    }

    #[test]
    fn test_hold_duration_rounds_up_with_floor() {
        assert_eq!(hold_duration(2.5, 3.0), 6);
        assert_eq!(hold_duration(0.0, 1.0), 3);
        assert_eq!(hold_duration(5.0, 3.0), 8);
    }

    #[test]
    fn test_end_to_end_hold_targets_low_priority_train() {
        let config = EngineConfig::default();
        let trains = vec![
            train_on("X", TrainType::Express, 9, None, Some("STN002")),
            train_on("Y", TrainType::Freight, 3, None, Some("STN002")).with_delay(0.5),
        ];
        let conflicts = detect_conflicts(&trains, &stations(), &[], &config);
        assert_eq!(conflicts.len(), 1);

        let recs = generate_recommendations(&conflicts[0], &trains, &config);
        let hold = &recs[0];
        assert_eq!(hold.recommendation_type, RecommendationType::Hold);
        assert_eq!(hold.train_id, "Y");
        assert_eq!(hold.confidence, HOLD_CONFIDENCE);
        assert_eq!(hold.hold_minutes(), 6);
        assert_eq!(hold.estimated_impact.delay_reduction, 2.5);
        assert_eq!(hold.conflict_id, conflicts[0].id);
    }

    #[test]
    fn test_all_three_for_critical_conflict() {
        let config = EngineConfig::default();
        let recs = generate_recommendations(&conflict(Severity::Critical, 2.5), &pair(), &config);

        let types: Vec<_> = recs.iter().map(|r| r.recommendation_type).collect();
        assert_eq!(
            types,
            vec![
                RecommendationType::Hold,
                RecommendationType::Reroute,
                RecommendationType::PriorityChange
            ]
        );
        assert_eq!(recs[1].train_id, "Y");
        assert_eq!(recs[1].estimated_impact.delay_reduction, 2.5 * 0.6);
        assert_eq!(recs[2].train_id, "X");
        assert_eq!(recs[2].estimated_impact.delay_reduction, 2.5 * 0.4);
    }

    #[test]
    fn test_confidence_non_increasing() {
        let config = EngineConfig::default();
        for severity in [Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
            let recs = generate_recommendations(&conflict(severity, 4.0), &pair(), &config);
            assert!(recs.windows(2).all(|w| w[0].confidence >= w[1].confidence));
            assert!(recs.iter().any(|r| r.recommendation_type == RecommendationType::Hold));
        }
    }

    #[test]
    fn test_priority_change_only_for_critical() {
        let config = EngineConfig::default();
        let recs = generate_recommendations(&conflict(Severity::High, 4.0), &pair(), &config);
        assert!(recs
            .iter()
            .all(|r| r.recommendation_type != RecommendationType::PriorityChange));
    }

    #[test]
    fn test_options_disable_reroute_and_priority_change() {
        let mut config = EngineConfig::default();
        config.resolution.allow_rerouting = false;
        config.resolution.allow_priority_override = false;

        let recs = generate_recommendations(&conflict(Severity::Critical, 2.5), &pair(), &config);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].recommendation_type, RecommendationType::Hold);
    }

    #[test]
    fn test_no_reroute_without_full_leg() {
        let config = EngineConfig::default();
        let trains = vec![
            train_on("X", TrainType::Express, 9, None, Some("STN002")),
            train_on("Y", TrainType::Freight, 3, None, Some("STN002")),
        ];
        let recs = generate_recommendations(&conflict(Severity::Medium, 2.0), &trains, &config);
        assert_eq!(recs.len(), 1);
    }

    #[test]
    fn test_weights_can_flip_raw_priority() {
        // Maintenance 9 * 0.2 = 1.8 ranks below Suburban 3 * 0.8 = 2.4
        let config = EngineConfig::default();
        let trains = vec![
            train_on("X", TrainType::Maintenance, 9, None, Some("STN002")),
            train_on("Y", TrainType::Suburban, 3, None, Some("STN002")),
        ];
        let recs = generate_recommendations(&conflict(Severity::Medium, 2.0), &trains, &config);
        assert_eq!(recs[0].train_id, "X");
    }

    #[test]
    fn test_unknown_train_yields_nothing() {
        let config = EngineConfig::default();
        let trains = vec![train_on("X", TrainType::Express, 9, None, Some("STN002"))];
        assert!(generate_recommendations(&conflict(Severity::Critical, 2.5), &trains, &config).is_empty());
    }
}

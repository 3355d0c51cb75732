//! Compare alternative modification lists against one baseline state.

use super::{Scenario, ScenarioEngine, ScheduledModification, SimulationResult};
use crate::error::{AdvisorError, Result};
use crate::models::KpiImprovement;
use serde::{Deserialize, Serialize};

const PUNCTUALITY_WEIGHT: f64 = 0.4;
const DELAY_WEIGHT: f64 = 0.3;
const THROUGHPUT_WEIGHT: f64 = 0.2;
const RESOLVED_WEIGHT: f64 = 0.1;

/// Score spread at which confidence sits halfway between 0.5 and 1
const CONFIDENCE_SPREAD_SCALE: f64 = 10.0;

/// Weighted sum of a KPI improvement, higher is better
#[must_use]
pub fn improvement_score(improvement: &KpiImprovement) -> f64 {
    improvement.punctuality * PUNCTUALITY_WEIGHT
        + improvement.average_delay * DELAY_WEIGHT
        + improvement.throughput * THROUGHPUT_WEIGHT
        + improvement.conflicts_resolved * RESOLVED_WEIGHT
}

/// A named replacement for the scenario's modification list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfAlternative {
    pub name: String,
    pub modifications: Vec<ScheduledModification>,
}

impl WhatIfAlternative {
    #[must_use]
    pub fn new(name: impl Into<String>, modifications: Vec<ScheduledModification>) -> Self {
        Self {
            name: name.into(),
            modifications,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfOutcome {
    pub name: String,
    pub score: f64,
    pub result: SimulationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatIfAnalysis {
    /// The scenario run with no modifications at all
    pub baseline: WhatIfOutcome,
    pub alternatives: Vec<WhatIfOutcome>,
    /// Index into `alternatives` of the best-scoring one
    pub recommended: Option<usize>,
    /// 0.5 when the best alternative is no better than average, approaching 1 as it pulls ahead
    pub confidence: f64,
}

impl WhatIfAnalysis {
    #[must_use]
    pub fn recommended_outcome(&self) -> Option<&WhatIfOutcome> {
        self.recommended.and_then(|i| self.alternatives.get(i))
    }
}

impl ScenarioEngine {
    fn run_variant(&self, scenario: &Scenario, name: &str, modifications: Vec<ScheduledModification>) -> WhatIfOutcome {
        let variant = Scenario {
            name: format!("{} / {name}", scenario.name),
            modifications,
            ..scenario.clone()
        };
        let result = self.simulate(&variant);
        WhatIfOutcome {
            name: name.to_string(),
            score: improvement_score(&result.comparison.improvement),
            result,
        }
    }

    /// Run the unmodified baseline and every alternative, then pick the best alternative
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn run_what_if(&self, scenario: &Scenario, alternatives: &[WhatIfAlternative]) -> WhatIfAnalysis {
        let baseline = self.run_variant(scenario, "baseline", Vec::new());
        let alternatives: Vec<WhatIfOutcome> = alternatives
            .iter()
            .map(|alt| self.run_variant(scenario, &alt.name, alt.modifications.clone()))
            .collect();

        let mut recommended: Option<usize> = None;
        for (i, outcome) in alternatives.iter().enumerate() {
            if recommended.map_or(true, |best| outcome.score > alternatives[best].score) {
                recommended = Some(i);
            }
        }

        let confidence = recommended.map_or(0.0, |best| {
            let scores: Vec<f64> = std::iter::once(baseline.score)
                .chain(alternatives.iter().map(|o| o.score))
                .collect();
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            let spread = (alternatives[best].score - mean).max(0.0);
            0.5 + 0.5 * spread / (spread + CONFIDENCE_SPREAD_SCALE)
        });

        if let Some(best) = recommended {
            log::info!(
                "What-if on '{}': '{}' scores best ({:.2}), confidence {confidence:.2}",
                scenario.name,
                alternatives[best].name,
                alternatives[best].score
            );
        }

        WhatIfAnalysis {
            baseline,
            alternatives,
            recommended,
            confidence,
        }
    }

    /// [`run_what_if`](Self::run_what_if) on a registered scenario
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::ScenarioNotFound`] for an unknown id.
    pub fn run_what_if_for(&self, scenario_id: &str, alternatives: &[WhatIfAlternative]) -> Result<WhatIfAnalysis> {
        let scenario = self
            .scenario(scenario_id)
            .ok_or_else(|| AdvisorError::ScenarioNotFound(scenario_id.to_string()))?;
        Ok(self.run_what_if(scenario, alternatives))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::{stations, train_on};
    use crate::models::{EngineConfig, Snapshot, TrainType};
    use crate::scenario::Modification;

    fn scenario() -> Scenario {
        let trains = vec![
            train_on("A", TrainType::Express, 9, None, Some("STN002")),
            train_on("B", TrainType::Freight, 3, None, Some("STN002")).with_delay(0.5),
        ];
        Scenario::new("junction", Snapshot::new(trains, stations(), Vec::new()), 10)
    }

    fn delay_b(minutes: f64) -> Vec<ScheduledModification> {
        vec![ScheduledModification::new(
            0,
            Modification::DelayInjection {
                train_id: "B".to_string(),
                minutes,
            },
        )]
    }

    #[test]
    fn test_improvement_score_weights() {
        let improvement = KpiImprovement {
            punctuality: 10.0,
            average_delay: 2.0,
            throughput: 1.0,
            conflicts_resolved: 3.0,
        };
        assert!((improvement_score(&improvement) - 5.1).abs() < 1e-9);
    }

    #[test]
    fn test_picks_best_alternative() {
        let engine = ScenarioEngine::new(EngineConfig::default());
        let alternatives = vec![
            WhatIfAlternative::new("small gap", delay_b(3.0)),
            WhatIfAlternative::new("long wait", delay_b(20.0)),
        ];

        let analysis = engine.run_what_if(&scenario(), &alternatives);

        // Baseline auto-holds B by 6 and loses half its punctuality
        assert!((analysis.baseline.score + 20.8).abs() < 1e-9);
        assert!((analysis.alternatives[0].score + 0.45).abs() < 1e-9);
        assert!((analysis.alternatives[1].score + 23.0).abs() < 1e-9);
        assert_eq!(analysis.recommended, Some(0));
        assert_eq!(analysis.recommended_outcome().map(|o| o.name.as_str()), Some("small gap"));
        assert!(analysis.confidence > 0.75 && analysis.confidence < 1.0);
    }

    #[test]
    fn test_no_alternatives_means_no_recommendation() {
        let engine = ScenarioEngine::new(EngineConfig::default());
        let analysis = engine.run_what_if(&scenario(), &[]);
        assert_eq!(analysis.recommended, None);
        assert_eq!(analysis.confidence, 0.0);
        assert!(!analysis.baseline.result.timeline.is_empty());
    }

    #[test]
    fn test_registered_lookup() {
        let mut engine = ScenarioEngine::new(EngineConfig::default());
        assert!(matches!(
            engine.run_what_if_for("nope", &[]),
            Err(AdvisorError::ScenarioNotFound(_))
        ));

        let id = engine.register(scenario());
        let analysis = engine
            .run_what_if_for(&id, &[WhatIfAlternative::new("small gap", delay_b(3.0))])
            .expect("registered scenario");
        assert_eq!(analysis.recommended, Some(0));
    }
}

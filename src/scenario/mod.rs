//! Minute-by-minute scenario simulation and what-if comparison.
//!
//! Each run works on its own copy of the scenario's baseline trains. Every
//! tick applies due modifications, nudges trains toward their next station,
//! detects conflicts, auto-applies high-confidence recommendations for
//! conflicts not seen before in the run, and periodically samples KPIs.

mod modification;
mod timeline;
mod what_if;

pub use modification::{Modification, ModificationEffect, ScheduledModification};
pub use timeline::{Timeline, TimelineEvent, TimelineEventKind};
pub use what_if::{improvement_score, WhatIfAlternative, WhatIfAnalysis, WhatIfOutcome};

use crate::conflict::{detect_conflicts, Conflict, ConflictKey};
use crate::constants::{DEFAULT_SCENARIO_START, KM_PER_DEGREE};
use crate::error::{AdvisorError, Result};
use crate::kpi::compute_kpis;
use crate::models::{id, EngineConfig, Kpi, KpiComparison, Recommendation, Snapshot, Station, Train};
use crate::recommendation::generate_recommendations;
use crate::resolution::apply_recommendation;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

fn default_start_time() -> NaiveDateTime {
    DEFAULT_SCENARIO_START
}

/// A baseline network state plus timed disruptions, run for a fixed number of minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub baseline: Snapshot,
    #[serde(default)]
    pub modifications: Vec<ScheduledModification>,
    pub duration_minutes: u32,
    #[serde(default = "default_start_time")]
    pub start_time: NaiveDateTime,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>, baseline: Snapshot, duration_minutes: u32) -> Self {
        Self {
            id: id::generate_scenario_id(),
            name: name.into(),
            description: String::new(),
            baseline,
            modifications: Vec::new(),
            duration_minutes,
            start_time: DEFAULT_SCENARIO_START,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_start_time(mut self, start_time: NaiveDateTime) -> Self {
        self.start_time = start_time;
        self
    }

    #[must_use]
    pub fn with_modification(mut self, applied_at: u32, modification: Modification) -> Self {
        self.modifications.push(ScheduledModification::new(applied_at, modification));
        self
    }
}

/// KPIs sampled at one scenario minute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSample {
    pub minute: u32,
    pub kpi: Kpi,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub scenario_id: String,
    pub timeline: Timeline,
    pub kpi_history: Vec<KpiSample>,
    /// Baseline KPIs against the final state
    pub comparison: KpiComparison,
    pub residual_conflicts: Vec<Conflict>,
    pub applied_recommendations: Vec<Recommendation>,
    pub final_trains: Vec<Train>,
    /// No residual conflicts, or punctuality improved over the baseline
    pub success: bool,
}

/// Move each active train a minute's travel toward its next station
///
/// A straight-line nudge on the coordinates; stations are never advanced.
fn advance_positions(trains: &mut [Train], stations: &HashMap<&str, &Station>, config: &EngineConfig) {
    for train in trains.iter_mut().filter(|t| t.is_active()) {
        let Some(target) = train.next_station.as_deref().and_then(|id| stations.get(id)) else {
            continue;
        };
        let target = target.coordinates;
        let distance = train.coordinates.distance_to(&target);
        if distance == 0.0 {
            continue;
        }

        let step = train.effective_speed(config.min_train_speed) / 60.0 / KM_PER_DEGREE;
        if step >= distance {
            train.coordinates = target;
        } else {
            let ratio = step / distance;
            train.coordinates.lat += (target.lat - train.coordinates.lat) * ratio;
            train.coordinates.lng += (target.lng - train.coordinates.lng) * ratio;
        }
    }
}

/// Registry and runner for scenarios
pub struct ScenarioEngine {
    config: EngineConfig,
    scenarios: IndexMap<String, Scenario>,
}

impl ScenarioEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scenarios: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Store a scenario, replacing any with the same id, and return its id
    pub fn register(&mut self, scenario: Scenario) -> String {
        let id = scenario.id.clone();
        self.scenarios.insert(id.clone(), scenario);
        id
    }

    #[must_use]
    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.values()
    }

    pub fn remove(&mut self, id: &str) -> Option<Scenario> {
        self.scenarios.shift_remove(id)
    }

    /// Run a registered scenario
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::ScenarioNotFound`] for an unknown id.
    pub fn run_simulation(&self, scenario_id: &str) -> Result<SimulationResult> {
        let scenario = self
            .scenarios
            .get(scenario_id)
            .ok_or_else(|| AdvisorError::ScenarioNotFound(scenario_id.to_string()))?;
        Ok(self.simulate(scenario))
    }

    /// Run a scenario for `duration_minutes + 1` ticks
    #[must_use]
    pub fn simulate(&self, scenario: &Scenario) -> SimulationResult {
        let config = &self.config;
        let baseline = &scenario.baseline;
        let stations: HashMap<&str, &Station> = baseline.stations.iter().map(|s| (s.id.as_str(), s)).collect();

        log::info!(
            "Running scenario '{}' ({}) for {} minutes with {} modifications",
            scenario.name,
            scenario.id,
            scenario.duration_minutes,
            scenario.modifications.len()
        );

        let baseline_conflicts = detect_conflicts(&baseline.trains, &baseline.stations, &baseline.tracks, config);
        let baseline_kpi = compute_kpis(&baseline.trains, baseline_conflicts.len(), 0, config);

        let mut trains = baseline.trains.clone();
        let mut timeline = Timeline::new(scenario.start_time);
        let mut kpi_history = Vec::new();
        let mut known: HashSet<ConflictKey> = HashSet::new();
        let mut applied_recommendations = Vec::new();
        let mut conflicts_resolved: u32 = 0;

        for minute in 0..=scenario.duration_minutes {
            for scheduled in scenario.modifications.iter().filter(|m| m.applied_at == minute) {
                let effect = scheduled.modification.apply(&mut trains, &baseline.tracks);
                if !effect.is_empty() {
                    timeline.record(
                        minute,
                        TimelineEventKind::ModificationApplied,
                        scheduled.modification.describe(),
                        effect.train_ids,
                        effect.added_delay,
                    );
                }
            }

            advance_positions(&mut trains, &stations, config);

            for conflict in detect_conflicts(&trains, &baseline.stations, &baseline.tracks, config) {
                if !known.insert(conflict.key()) {
                    continue;
                }
                let recommendations = generate_recommendations(&conflict, &trains, config);
                timeline.record(
                    minute,
                    TimelineEventKind::ConflictDetected,
                    conflict.describe(),
                    conflict.trains.to_vec(),
                    conflict.estimated_delay,
                );

                let mut resolved = false;
                for rec in recommendations
                    .into_iter()
                    .filter(|r| r.confidence > config.auto_apply_confidence)
                {
                    if !apply_recommendation(&mut trains, &rec, config) {
                        continue;
                    }
                    log::info!("Minute {minute}: auto-applied '{}' for {}", rec.action, conflict.id);
                    timeline.record(
                        minute,
                        TimelineEventKind::RecommendationApplied,
                        rec.action.clone(),
                        vec![rec.train_id.clone()],
                        -rec.estimated_impact.delay_reduction,
                    );
                    applied_recommendations.push(rec);
                    resolved = true;
                }
                if resolved {
                    conflicts_resolved += 1;
                }
            }

            if minute % config.kpi_interval_minutes.max(1) == 0 {
                let active = detect_conflicts(&trains, &baseline.stations, &baseline.tracks, config).len();
                let kpi = compute_kpis(&trains, active, conflicts_resolved, config);
                timeline.record(
                    minute,
                    TimelineEventKind::KpiSnapshot,
                    format!(
                        "Punctuality {:.1}%, average delay {:.1} min, {active} active conflicts",
                        kpi.punctuality, kpi.average_delay
                    ),
                    Vec::new(),
                    0.0,
                );
                kpi_history.push(KpiSample { minute, kpi });
            }
        }

        let residual_conflicts = detect_conflicts(&trains, &baseline.stations, &baseline.tracks, config);
        let final_kpi = compute_kpis(&trains, residual_conflicts.len(), conflicts_resolved, config);
        let comparison = KpiComparison::new(baseline_kpi, final_kpi);
        let success = residual_conflicts.is_empty() || comparison.improvement.punctuality > 0.0;

        log::info!(
            "Scenario '{}' finished: {} recommendations applied, {} residual conflicts, success={success}",
            scenario.name,
            applied_recommendations.len(),
            residual_conflicts.len()
        );

        SimulationResult {
            scenario_id: scenario.id.clone(),
            timeline,
            kpi_history,
            comparison,
            residual_conflicts,
            applied_recommendations,
            final_trains: trains,
            success,
        }
    }
}

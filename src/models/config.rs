use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use super::TrainType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationObjective {
    MinimizeDelay,
    MaximizeThroughput,
    #[default]
    Balanced,
}

/// Where the simulator takes a recommendation's delay-reduction figure from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionSource {
    /// Sum of delays before applying minus sum of delays after
    Measured,
    /// The recommendation's own `estimated_impact.delay_reduction`
    Estimated,
    /// Always zero
    Zero,
}

/// Per-type choice of delay-reduction source used by the resolution simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayAccounting {
    pub hold: ReductionSource,
    pub reroute: ReductionSource,
    pub priority_change: ReductionSource,
    pub proceed: ReductionSource,
}

impl Default for DelayAccounting {
    fn default() -> Self {
        Self {
            hold: ReductionSource::Measured,
            reroute: ReductionSource::Estimated,
            priority_change: ReductionSource::Zero,
            proceed: ReductionSource::Zero,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionOptions {
    pub allow_rerouting: bool,
    pub allow_priority_override: bool,
    /// Accepted for compatibility, not read by any algorithm
    pub max_simulation_depth: u32,
    /// Accepted for compatibility, not read by any algorithm
    pub optimization_objective: OptimizationObjective,
    /// Minimum normalized score (0-1) before the multi-conflict resolver applies a recommendation
    pub acceptance_threshold: f64,
    /// Include track conflicts when re-detecting after a simulated recommendation
    pub revalidate_tracks: bool,
    pub delay_accounting: DelayAccounting,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            allow_rerouting: true,
            allow_priority_override: true,
            max_simulation_depth: 3,
            optimization_objective: OptimizationObjective::Balanced,
            acceptance_threshold: 0.5,
            revalidate_tracks: false,
            delay_accounting: DelayAccounting::default(),
        }
    }
}

/// Tunables shared by detection, recommendation, simulation and KPIs
///
/// All durations are minutes and all speeds km/h.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_delay: f64,
    /// Entries given in JSON override the defaults; types left out keep theirs
    #[serde(deserialize_with = "merge_priority_weights")]
    pub priority_weights: HashMap<TrainType, f64>,
    pub safety_buffer: f64,
    /// Platform count overrides by station id
    pub platform_capacity: HashMap<String, u32>,
    pub rerouting_delay: f64,
    pub min_train_speed: f64,
    pub single_platform_delay: f64,
    pub multi_platform_delay: f64,
    pub track_conflict_delay: f64,
    /// Travel time assumed for the coarse arrival estimate
    pub nominal_travel_minutes: f64,
    pub on_time_threshold: f64,
    /// Recommendations above this confidence are applied without review during scenarios
    pub auto_apply_confidence: f64,
    pub kpi_interval_minutes: u32,
    pub throughput_scale: f64,
    pub resolution: ResolutionOptions,
}

fn default_priority_weights() -> HashMap<TrainType, f64> {
    HashMap::from([
        (TrainType::Express, 1.0),
        (TrainType::Suburban, 0.8),
        (TrainType::Freight, 0.4),
        (TrainType::Special, 1.2),
        (TrainType::Maintenance, 0.2),
    ])
}

fn merge_priority_weights<'de, D>(deserializer: D) -> std::result::Result<HashMap<TrainType, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = HashMap::<TrainType, f64>::deserialize(deserializer)?;
    let mut weights = default_priority_weights();
    weights.extend(overrides);
    Ok(weights)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_delay: 30.0,
            priority_weights: default_priority_weights(),
            safety_buffer: 3.0,
            platform_capacity: HashMap::new(),
            rerouting_delay: 8.0,
            min_train_speed: 10.0,
            single_platform_delay: 5.0,
            multi_platform_delay: 2.0,
            track_conflict_delay: 10.0,
            nominal_travel_minutes: 30.0,
            on_time_threshold: 5.0,
            auto_apply_confidence: 0.8,
            kpi_interval_minutes: 10,
            throughput_scale: 1.0,
            resolution: ResolutionOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config, filling unspecified fields with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AdvisorError::InvalidConfig(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in a range the algorithms can work with
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.min_train_speed <= 0.0 {
            return Err(AdvisorError::InvalidConfig("min_train_speed must be positive".to_string()));
        }
        if self.nominal_travel_minutes <= 0.0 {
            return Err(AdvisorError::InvalidConfig("nominal_travel_minutes must be positive".to_string()));
        }
        let non_negative = [
            ("max_delay", self.max_delay),
            ("safety_buffer", self.safety_buffer),
            ("rerouting_delay", self.rerouting_delay),
            ("single_platform_delay", self.single_platform_delay),
            ("multi_platform_delay", self.multi_platform_delay),
            ("track_conflict_delay", self.track_conflict_delay),
            ("on_time_threshold", self.on_time_threshold),
            ("throughput_scale", self.throughput_scale),
        ];
        if let Some((name, _)) = non_negative.iter().find(|(_, value)| *value < 0.0) {
            return Err(AdvisorError::InvalidConfig(format!("{name} must not be negative")));
        }
        if let Some((train_type, _)) = self.priority_weights.iter().find(|(_, w)| **w < 0.0) {
            return Err(AdvisorError::InvalidConfig(format!("priority weight for {train_type:?} must not be negative")));
        }
        if !(0.0..=1.0).contains(&self.resolution.acceptance_threshold) {
            return Err(AdvisorError::InvalidConfig("acceptance_threshold must be within [0, 1]".to_string()));
        }
        if self.kpi_interval_minutes == 0 {
            return Err(AdvisorError::InvalidConfig("kpi_interval_minutes must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Weight for a train type, 1.0 when the table has no entry
    #[must_use]
    pub fn priority_weight(&self, train_type: TrainType) -> f64 {
        self.priority_weights.get(&train_type).copied().unwrap_or(1.0)
    }
}

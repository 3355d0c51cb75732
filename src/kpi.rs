//! KPI aggregation over a train and conflict snapshot.
//!
//! Every function here is pure and total: empty inputs yield zeros rather
//! than dividing by zero.

use crate::constants::CONFLICT_EFFICIENCY_PENALTY;
use crate::models::{EngineConfig, Kpi, Train};

/// Percentage of trains whose delay is within `on_time_threshold`
///
/// An empty list has a punctuality of 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn punctuality(trains: &[Train], on_time_threshold: f64) -> f64 {
    if trains.is_empty() {
        return 0.0;
    }
    let on_time = trains.iter().filter(|t| t.delay <= on_time_threshold).count();
    on_time as f64 / trains.len() as f64 * 100.0
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_delay(trains: &[Train]) -> f64 {
    if trains.is_empty() {
        return 0.0;
    }
    trains.iter().map(|t| t.delay).sum::<f64>() / trains.len() as f64
}

/// Number of trains that are not cancelled
#[must_use]
pub fn throughput(trains: &[Train]) -> usize {
    trains.iter().filter(|t| t.is_active()).count()
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn scaled_throughput(trains: &[Train], scale: f64) -> f64 {
    throughput(trains) as f64 * scale
}

/// Punctuality less a fixed penalty per active conflict, floored at 0
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn system_efficiency(punctuality: f64, active_conflicts: usize) -> f64 {
    (punctuality - active_conflicts as f64 * CONFLICT_EFFICIENCY_PENALTY).max(0.0)
}

/// All KPIs for one snapshot
///
/// `ai_acceptance_rate` is not derivable from a snapshot and is left at 0
/// for the caller to fill in.
#[must_use]
pub fn compute_kpis(trains: &[Train], active_conflicts: usize, conflicts_resolved: u32, config: &EngineConfig) -> Kpi {
    let punctuality = punctuality(trains, config.on_time_threshold);
    Kpi {
        punctuality,
        average_delay: average_delay(trains),
        throughput: scaled_throughput(trains, config.throughput_scale),
        conflicts_resolved,
        ai_acceptance_rate: 0.0,
        system_efficiency: system_efficiency(punctuality, active_conflicts),
    }
}

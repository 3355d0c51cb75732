mod config;
mod kpi;
mod recommendation;
mod snapshot;
mod station;
mod track;
mod train;

pub mod id;

#[cfg(test)]
pub(crate) mod fixtures;

pub use config::{DelayAccounting, EngineConfig, OptimizationObjective, ReductionSource, ResolutionOptions};
pub use kpi::{Kpi, KpiComparison, KpiImprovement};
pub use recommendation::{hold_action, EstimatedImpact, Recommendation, RecommendationType};
pub use snapshot::Snapshot;
pub use station::{Coordinates, Station};
pub use track::{Track, TrackStatus};
pub use train::{total_delay, ScheduleStop, Train, TrainStatus, TrainType};

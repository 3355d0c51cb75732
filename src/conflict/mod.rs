mod station;
mod track;
mod types;

pub use types::{Conflict, ConflictKey, ConflictLocation, ConflictType, Severity};

use crate::models::{EngineConfig, Station, Track, Train};
use crate::network::TrackIndex;
use crate::perf_log;
use std::collections::HashMap;

pub(crate) struct DetectionContext<'a> {
    config: &'a EngineConfig,
    platforms: HashMap<&'a str, u32>,
    track_index: TrackIndex<'a>,
}

impl<'a> DetectionContext<'a> {
    fn new(stations: &'a [Station], tracks: &'a [Track], config: &'a EngineConfig) -> Self {
        Self {
            config,
            platforms: stations.iter().map(|s| (s.id.as_str(), s.platforms)).collect(),
            track_index: TrackIndex::new(tracks),
        }
    }

    /// Platform count from the config override, else the station record, else 1
    fn platform_capacity(&self, station_id: &str) -> u32 {
        self.config
            .platform_capacity
            .get(station_id)
            .or_else(|| self.platforms.get(station_id))
            .copied()
            .unwrap_or(1)
    }
}

/// Coarse arrival estimate in minutes
///
/// A fixed nominal travel time scaled by the train's speed, plus its current
/// delay. This is a known approximation and not a routing calculation; it
/// only serves to compare two trains heading for the same station.
#[must_use]
pub fn estimate_arrival_minutes(train: &Train, config: &EngineConfig) -> f64 {
    let speed = train.effective_speed(config.min_train_speed);
    config.nominal_travel_minutes / (speed / 60.0) + train.delay
}

/// Scan a train set for pairwise conflicts
///
/// Cancelled trains are ignored. Station-local checks (crossing, platform) run
/// within station buckets, track checks across all active trains. Pass an
/// empty `tracks` slice to skip track conflicts.
#[must_use]
pub fn detect_conflicts(
    trains: &[Train],
    stations: &[Station],
    tracks: &[Track],
    config: &EngineConfig,
) -> Vec<Conflict> {
    #[cfg(feature = "perf_timing")]
    let total_start = std::time::Instant::now();

    let active: Vec<&Train> = trains.iter().filter(|t| t.is_active()).collect();
    let ctx = DetectionContext::new(stations, tracks, config);
    let mut conflicts = Vec::new();

    station::detect_station_conflicts(&active, &ctx, &mut conflicts);
    let station_conflicts = conflicts.len();
    track::detect_track_conflicts(&active, &ctx, &mut conflicts);

    perf_log!(
        "detect_conflicts: {:?} for {} active trains",
        total_start.elapsed(),
        active.len()
    );
    log::trace!(
        "Found {} station and {} track conflicts among {} active trains",
        station_conflicts,
        conflicts.len() - station_conflicts,
        active.len()
    );

    conflicts
}

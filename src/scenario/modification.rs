//! Scheduled disruptions applied to a running scenario.

use crate::models::{Track, Train};
use crate::network::TrackIndex;
use serde::{Deserialize, Serialize};

/// One disruption, carrying only the fields its kind needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modification {
    DelayInjection { train_id: String, minutes: f64 },
    TrainHold { train_id: String, minutes: f64 },
    PriorityChange { train_id: String, priority: u8 },
    /// Delays every active train heading into the station
    SignalFailure { station_id: String, delay_minutes: f64 },
    /// Delays every active train running on the track
    TrackBlockage { track_id: String, delay_minutes: f64 },
}

/// A modification and the scenario minute it fires at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledModification {
    pub applied_at: u32,
    #[serde(flatten)]
    pub modification: Modification,
}

impl ScheduledModification {
    #[must_use]
    pub fn new(applied_at: u32, modification: Modification) -> Self {
        Self {
            applied_at,
            modification,
        }
    }
}

/// What a modification actually changed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModificationEffect {
    pub train_ids: Vec<String>,
    /// Delay minutes added across all affected trains
    pub added_delay: f64,
}

impl ModificationEffect {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.train_ids.is_empty()
    }
}

fn delay_where(trains: &mut [Train], minutes: f64, mut matches: impl FnMut(&Train) -> bool) -> ModificationEffect {
    let mut effect = ModificationEffect::default();
    for train in trains.iter_mut().filter(|t| t.is_active()) {
        if matches(train) {
            let before = train.delay;
            train.add_delay(minutes);
            effect.added_delay += train.delay - before;
            effect.train_ids.push(train.id.clone());
        }
    }
    effect
}

impl Modification {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Modification::DelayInjection { .. } => "delay_injection",
            Modification::TrainHold { .. } => "train_hold",
            Modification::PriorityChange { .. } => "priority_change",
            Modification::SignalFailure { .. } => "signal_failure",
            Modification::TrackBlockage { .. } => "track_blockage",
        }
    }

    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Modification::DelayInjection { train_id, minutes } => {
                format!("Delay of {minutes:.0} minutes injected on {train_id}")
            }
            Modification::TrainHold { train_id, minutes } => format!("{train_id} held for {minutes:.0} minutes"),
            Modification::PriorityChange { train_id, priority } => {
                format!("Priority of {train_id} set to {priority}")
            }
            Modification::SignalFailure {
                station_id,
                delay_minutes,
            } => format!("Signal failure at {station_id} ({delay_minutes:.0} minutes)"),
            Modification::TrackBlockage {
                track_id,
                delay_minutes,
            } => format!("Track {track_id} blocked ({delay_minutes:.0} minutes)"),
        }
    }

    /// Mutate the live train list
    ///
    /// Unknown ids are logged and leave the trains untouched; the returned
    /// effect is then empty.
    pub fn apply(&self, trains: &mut [Train], tracks: &[Track]) -> ModificationEffect {
        let effect = match self {
            Modification::DelayInjection { train_id, minutes } | Modification::TrainHold { train_id, minutes } => {
                delay_where(trains, *minutes, |t| t.id == *train_id)
            }
            Modification::PriorityChange { train_id, priority } => {
                let mut effect = ModificationEffect::default();
                if let Some(train) = trains.iter_mut().find(|t| t.id == *train_id) {
                    train.set_priority(*priority);
                    effect.train_ids.push(train.id.clone());
                }
                effect
            }
            Modification::SignalFailure {
                station_id,
                delay_minutes,
            } => delay_where(trains, *delay_minutes, |t| t.next_station.as_deref() == Some(station_id.as_str())),
            Modification::TrackBlockage {
                track_id,
                delay_minutes,
            } => {
                let index = TrackIndex::new(tracks);
                delay_where(trains, *delay_minutes, |t| {
                    index.track_of(t).is_some_and(|track| track.id == *track_id)
                })
            }
        };

        if effect.is_empty() {
            log::warn!("{} matched no active train: {}", self.kind(), self.describe());
        }
        effect
    }
}

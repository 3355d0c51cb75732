use serde::{Deserialize, Serialize};

use super::{Station, Track, Train};

/// Trains, stations and tracks as seen at one instant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub trains: Vec<Train>,
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Snapshot {
    #[must_use]
    pub fn new(trains: Vec<Train>, stations: Vec<Station>, tracks: Vec<Track>) -> Self {
        Self {
            trains,
            stations,
            tracks,
        }
    }
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrackStatus {
    #[default]
    Operational,
    Maintenance,
    Blocked,
}

/// An undirected connection between two stations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub from_station: String,
    pub to_station: String,
    /// km
    #[serde(default)]
    pub length: f64,
    /// km/h
    #[serde(default)]
    pub max_speed: f64,
    #[serde(default)]
    pub status: TrackStatus,
}

impl Track {
    #[must_use]
    pub fn new(id: impl Into<String>, from_station: impl Into<String>, to_station: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from_station: from_station.into(),
            to_station: to_station.into(),
            length: 0.0,
            max_speed: 0.0,
            status: TrackStatus::Operational,
        }
    }
}

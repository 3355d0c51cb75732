//! Builders shared by unit tests across the crate.

use super::{Station, Track, Train, TrainType};

/// A train at speed 60 km/h, so its nominal arrival estimate is exactly 30 minutes plus delay
pub fn train(id: &str, train_type: TrainType, priority: u8) -> Train {
    Train::new(id, format!("{id} service"), train_type)
        .with_priority(priority)
        .with_speed(60.0)
}

/// A train heading to `next`, currently at `current`
pub fn train_on(id: &str, train_type: TrainType, priority: u8, current: Option<&str>, next: Option<&str>) -> Train {
    train(id, train_type, priority).with_stations(current, next)
}

pub fn station(id: &str, platforms: u32) -> Station {
    Station::new(id, format!("{id} Central"), platforms)
}

pub fn track(id: &str, from: &str, to: &str) -> Track {
    Track::new(id, from, to)
}

pub fn stations() -> Vec<Station> {
    vec![station("STN001", 1), station("STN002", 2), station("STN003", 1)]
}

use crate::constants::{MAX_PRIORITY, MIN_PRIORITY};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainType {
    Express,
    Freight,
    Suburban,
    Special,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainStatus {
    #[default]
    OnTime,
    Delayed,
    Cancelled,
    Diverted,
}

/// One stop of a train's timetable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStop {
    pub station_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_arrival: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_departure: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_arrival: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_departure: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Train {
    pub id: String,
    pub number: String,
    pub name: String,
    #[serde(rename = "type")]
    pub train_type: TrainType,
    pub priority: u8,
    #[serde(default)]
    pub current_station: Option<String>,
    #[serde(default)]
    pub next_station: Option<String>,
    #[serde(default)]
    pub status: TrainStatus,
    /// Minutes behind schedule, never negative
    #[serde(default)]
    pub delay: f64,
    /// km/h
    pub speed: f64,
    #[serde(default)]
    pub coordinates: Coordinates,
    #[serde(default)]
    pub schedule: Vec<ScheduleStop>,
}

impl Train {
    #[must_use]
    pub fn new(id: impl Into<String>, number: impl Into<String>, train_type: TrainType) -> Self {
        let number = number.into();
        Self {
            id: id.into(),
            name: number.clone(),
            number,
            train_type,
            priority: 5,
            current_station: None,
            next_station: None,
            status: TrainStatus::OnTime,
            delay: 0.0,
            speed: 80.0,
            coordinates: Coordinates::default(),
            schedule: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.set_priority(priority);
        self
    }

    #[must_use]
    pub fn with_stations(mut self, current: Option<&str>, next: Option<&str>) -> Self {
        self.current_station = current.map(str::to_string);
        self.next_station = next.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = 0.0;
        self.add_delay(delay);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: TrainStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != TrainStatus::Cancelled
    }

    /// Speed used as a divisor, floored so it can never reach zero
    #[must_use]
    pub fn effective_speed(&self, min_speed: f64) -> f64 {
        self.speed.max(min_speed).max(1.0)
    }

    /// Add (or with a negative value, remove) delay, keeping it non-negative
    pub fn add_delay(&mut self, minutes: f64) {
        self.delay = (self.delay + minutes).max(0.0);
        if self.delay > 0.0 && self.status == TrainStatus::OnTime {
            self.status = TrainStatus::Delayed;
        }
    }

    pub fn set_priority(&mut self, priority: u8) {
        self.priority = priority.clamp(MIN_PRIORITY, MAX_PRIORITY);
    }

    /// The `(current, next)` station pair, when both are known
    #[must_use]
    pub fn leg(&self) -> Option<(&str, &str)> {
        match (&self.current_station, &self.next_station) {
            (Some(current), Some(next)) => Some((current.as_str(), next.as_str())),
            _ => None,
        }
    }
}

/// Sum of delays over a train list
#[must_use]
pub fn total_delay(trains: &[Train]) -> f64 {
    trains.iter().map(|t| t.delay).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_is_clamped() {
        let train = Train::new("T1", "IC 1", TrainType::Express).with_priority(42);
        assert_eq!(train.priority, MAX_PRIORITY);

        let train = Train::new("T2", "IC 2", TrainType::Express).with_priority(0);
        assert_eq!(train.priority, MIN_PRIORITY);
    }

    #[test]
    fn test_delay_never_negative() {
        let mut train = Train::new("T1", "IC 1", TrainType::Express).with_delay(4.0);
        train.add_delay(-10.0);
        assert_eq!(train.delay, 0.0);
    }

    #[test]
    fn test_adding_delay_marks_train_delayed() {
        let mut train = Train::new("T1", "IC 1", TrainType::Express);
        assert_eq!(train.status, TrainStatus::OnTime);
        train.add_delay(2.0);
        assert_eq!(train.status, TrainStatus::Delayed);
    }

    #[test]
    fn test_effective_speed_floor() {
        let train = Train::new("T1", "F 1", TrainType::Freight).with_speed(0.0);
        assert_eq!(train.effective_speed(10.0), 10.0);
        assert_eq!(train.effective_speed(0.0), 1.0);
    }

    #[test]
    fn test_leg_requires_both_stations() {
        let train = Train::new("T1", "S 1", TrainType::Suburban).with_stations(Some("A"), None);
        assert_eq!(train.leg(), None);

        let train = train.with_stations(Some("A"), Some("B"));
        assert_eq!(train.leg(), Some(("A", "B")));
    }

    #[test]
    fn test_deserialize_train_json() {
        let json = r#"{
            "id": "T9",
            "number": "EX 9",
            "name": "Coastal Express",
            "type": "express",
            "priority": 8,
            "next_station": "STN002",
            "status": "on_time",
            "speed": 120.0
        }"#;
        let train: Train = serde_json::from_str(json).expect("valid train json");
        assert_eq!(train.train_type, TrainType::Express);
        assert_eq!(train.current_station, None);
        assert_eq!(train.next_station.as_deref(), Some("STN002"));
        assert_eq!(train.delay, 0.0);
    }
}

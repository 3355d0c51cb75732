use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Straight-line distance in degrees
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        (other.lat - self.lat).hypot(other.lng - self.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub coordinates: Coordinates,
    /// Number of platforms, used as the station's capacity
    #[serde(default = "default_platforms")]
    pub platforms: u32,
}

fn default_platforms() -> u32 {
    1
}

impl Station {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, platforms: u32) -> Self {
        let id = id.into();
        Self {
            code: id.clone(),
            id,
            name: name.into(),
            coordinates: Coordinates::default(),
            platforms,
        }
    }

    #[must_use]
    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.coordinates = Coordinates::new(lat, lng);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_defaults_to_single_platform() {
        let station: Station = serde_json::from_str(r#"{"id":"S1","name":"Halt","code":"HLT"}"#)
            .expect("valid station json");
        assert_eq!(station.platforms, 1);
    }

    #[test]
    fn test_coordinates_distance() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
    }
}

//! Core types for conflict detection.

use crate::models::{id, Recommendation};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    Crossing, // Two trains arriving at the same station too close together
    Platform, // Two trains standing at the same station
    Signal,   // Contention on a signal, only produced by external sources
    Track,    // Two trains running on the same track
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Rank used to order conflicts for batch processing
    #[must_use]
    pub fn weight(self) -> u32 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    /// Score bonus awarded by the multi-conflict resolver
    #[must_use]
    pub fn resolution_bonus(self) -> f64 {
        match self {
            Severity::Low => 0.0,
            Severity::Medium => 5.0,
            Severity::High => 10.0,
            Severity::Critical => 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConflictLocation {
    Station(String),
    Track(String),
    Unknown,
}

impl fmt::Display for ConflictLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictLocation::Station(id) | ConflictLocation::Track(id) => write!(f, "{id}"),
            ConflictLocation::Unknown => write!(f, "unknown"),
        }
    }
}

/// Identity of a conflict independent of its synthesized id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConflictKey {
    pub conflict_type: ConflictType,
    pub trains: [String; 2],
    pub location: ConflictLocation,
}

/// A pairwise resource contention found by one detection pass
///
/// Conflicts are recomputed on every pass and never merged; two passes over
/// the same input produce conflicts with equal keys but different ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub id: String,
    #[serde(rename = "type")]
    pub conflict_type: ConflictType,
    /// Involved trains, sorted by id
    pub trains: [String; 2],
    pub location: ConflictLocation,
    pub severity: Severity,
    /// Minutes
    pub estimated_delay: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<Recommendation>,
}

impl Conflict {
    #[must_use]
    pub fn new(
        conflict_type: ConflictType,
        train_a: &str,
        train_b: &str,
        location: ConflictLocation,
        severity: Severity,
        estimated_delay: f64,
    ) -> Self {
        let trains = if train_a <= train_b {
            [train_a.to_string(), train_b.to_string()]
        } else {
            [train_b.to_string(), train_a.to_string()]
        };
        Self {
            id: id::conflict_id(&trains[0], &trains[1]),
            conflict_type,
            trains,
            location,
            severity,
            estimated_delay,
            recommendation: None,
        }
    }

    #[must_use]
    pub fn key(&self) -> ConflictKey {
        ConflictKey {
            conflict_type: self.conflict_type,
            trains: self.trains.clone(),
            location: self.location.clone(),
        }
    }

    #[must_use]
    pub fn involves(&self, train_id: &str) -> bool {
        self.trains.iter().any(|t| t == train_id)
    }

    /// Severity weight times estimated delay; larger is handled first
    #[must_use]
    pub fn priority_weight(&self) -> f64 {
        f64::from(self.severity.weight()) * self.estimated_delay
    }

    /// Format a human-readable message describing the conflict
    #[must_use]
    pub fn describe(&self) -> String {
        let [a, b] = &self.trains;
        match self.conflict_type {
            ConflictType::Crossing => format!(
                "{a} and {b} arrive at {} within the safety buffer",
                self.location
            ),
            ConflictType::Platform => format!("{a} and {b} both occupy {}", self.location),
            ConflictType::Signal => format!("{a} and {b} contend for a signal at {}", self.location),
            ConflictType::Track => format!("{a} and {b} share track {}", self.location),
        }
    }

    /// Get a short name for the conflict type
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self.conflict_type {
            ConflictType::Crossing => "Crossing Conflict",
            ConflictType::Platform => "Platform Conflict",
            ConflictType::Signal => "Signal Conflict",
            ConflictType::Track => "Track Conflict",
        }
    }
}

//! Snapshot sources feeding the advisor, and the commit boundary for applied changes.
//!
//! The advisor never persists anything itself: a caller takes a snapshot,
//! runs detection or optimization on copies, and hands the trains it wants
//! to keep back through [`SnapshotSource::commit_trains`].

use crate::constants::{MAX_PRIORITY, MIN_PRIORITY};
use crate::error::{AdvisorError, Result};
use crate::models::{Snapshot, Station, Track, Train};
use std::collections::HashSet;

/// Source of network state
pub trait SnapshotSource {
    /// Current trains
    fn trains(&self) -> &[Train];

    /// Stations, assumed static between snapshots
    fn stations(&self) -> &[Station];

    /// Tracks, assumed static between snapshots
    fn tracks(&self) -> &[Track];

    /// Replace the stored trains with a caller-approved list
    fn commit_trains(&mut self, trains: Vec<Train>);

    /// Owned copy of everything, safe to mutate
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.trains().to_vec(), self.stations().to_vec(), self.tracks().to_vec())
    }
}

/// Reject trains whose delay or priority the builders would never produce
fn check_train(train: &Train) -> Result<()> {
    if !(train.delay >= 0.0 && train.delay.is_finite()) {
        return Err(AdvisorError::InvalidSnapshot(format!(
            "Train {} has invalid delay {}",
            train.id, train.delay
        )));
    }
    if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&train.priority) {
        return Err(AdvisorError::InvalidSnapshot(format!(
            "Train {} has priority {} outside {MIN_PRIORITY}..={MAX_PRIORITY}",
            train.id, train.priority
        )));
    }
    Ok(())
}

/// Snapshot source held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    snapshot: Snapshot,
    revision: u64,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot, revision: 0 }
    }

    /// Load a snapshot from JSON with `trains`, `stations` and `tracks` arrays
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::InvalidSnapshot`] if the JSON does not parse,
    /// train ids are not unique, a delay is negative or a priority is outside
    /// `MIN_PRIORITY..=MAX_PRIORITY`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)
            .map_err(|e| AdvisorError::InvalidSnapshot(format!("Failed to parse snapshot: {e}")))?;

        let mut seen = HashSet::new();
        for train in &snapshot.trains {
            if !seen.insert(train.id.as_str()) {
                return Err(AdvisorError::InvalidSnapshot(format!("Duplicate train id {}", train.id)));
            }
            check_train(train)?;
        }

        log::debug!(
            "Loaded snapshot with {} trains, {} stations, {} tracks",
            snapshot.trains.len(),
            snapshot.stations.len(),
            snapshot.tracks.len()
        );
        Ok(Self::new(snapshot))
    }

    /// Number of commits since construction
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl SnapshotSource for InMemoryRepository {
    fn trains(&self) -> &[Train] {
        &self.snapshot.trains
    }

    fn stations(&self) -> &[Station] {
        &self.snapshot.stations
    }

    fn tracks(&self) -> &[Track] {
        &self.snapshot.tracks
    }

    fn commit_trains(&mut self, trains: Vec<Train>) {
        self.snapshot.trains = trains;
        self.revision += 1;
    }
}

//! Real-time advisory service over a snapshot source.
//!
//! The engine is constructed explicitly and only does work between `start`
//! and `stop`. Each `tick` pulls the current state from its source and
//! pushes results to subscribers over unbounded channels, so a slow
//! subscriber never blocks the engine. Subscribers whose receiver has been
//! dropped are forgotten on the next send.

use crate::conflict::{detect_conflicts, Conflict};
use crate::error::{AdvisorError, Result};
use crate::kpi::compute_kpis;
use crate::models::{EngineConfig, Kpi, Recommendation, Train};
use crate::recommendation::generate_recommendations;
use crate::repository::SnapshotSource;
use crate::resolution::apply_recommendation;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// Every conflict found this tick, each carrying its top recommendation
    ConflictsDetected(Vec<Conflict>),
    RecommendationsReady(Vec<Recommendation>),
    KpisUpdated(Kpi),
    /// The source's trains after a recommendation was committed
    TrainsUpdated(Vec<Train>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    pub conflicts: usize,
    pub recommendations: usize,
    pub kpi: Kpi,
}

pub struct AdvisoryEngine<S: SnapshotSource> {
    config: EngineConfig,
    source: S,
    running: bool,
    subscribers: Vec<Sender<EngineEvent>>,
    conflicts_resolved: u32,
}

impl<S: SnapshotSource> AdvisoryEngine<S> {
    #[must_use]
    pub fn new(config: EngineConfig, source: S) -> Self {
        Self {
            config,
            source,
            running: false,
            subscribers: Vec::new(),
            conflicts_resolved: 0,
        }
    }

    pub fn start(&mut self) {
        if !self.running {
            log::info!("Advisory engine started");
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("Advisory engine stopped");
            self.running = false;
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Register a new listener; events are only delivered while the receiver is alive
    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn broadcast(&mut self, event: &EngineEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            log::debug!("Dropped {dropped} disconnected subscribers");
        }
    }

    fn ensure_running(&self) -> Result<()> {
        if self.running {
            Ok(())
        } else {
            Err(AdvisorError::EngineNotRunning)
        }
    }

    /// One detection, recommendation and KPI pass over the source's current state
    ///
    /// Emits `ConflictsDetected`, `RecommendationsReady` and `KpisUpdated` in that order.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::EngineNotRunning`] if the engine is stopped.
    pub fn tick(&mut self) -> Result<TickSummary> {
        self.ensure_running()?;

        let trains = self.source.trains();
        let mut conflicts = detect_conflicts(trains, self.source.stations(), self.source.tracks(), &self.config);

        let mut recommendations = Vec::new();
        for conflict in &mut conflicts {
            let generated = generate_recommendations(conflict, trains, &self.config);
            conflict.recommendation = generated.first().cloned();
            recommendations.extend(generated);
        }
        let kpi = compute_kpis(trains, conflicts.len(), self.conflicts_resolved, &self.config);

        log::debug!(
            "Tick: {} conflicts, {} recommendations, punctuality {:.1}%",
            conflicts.len(),
            recommendations.len(),
            kpi.punctuality
        );

        let summary = TickSummary {
            conflicts: conflicts.len(),
            recommendations: recommendations.len(),
            kpi: kpi.clone(),
        };
        self.broadcast(&EngineEvent::ConflictsDetected(conflicts));
        self.broadcast(&EngineEvent::RecommendationsReady(recommendations));
        self.broadcast(&EngineEvent::KpisUpdated(kpi));
        Ok(summary)
    }

    /// Apply a recommendation to a copy of the source's trains and commit it
    ///
    /// Returns `Ok(false)` without committing if the target train is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`AdvisorError::EngineNotRunning`] if the engine is stopped.
    pub fn apply(&mut self, recommendation: &Recommendation) -> Result<bool> {
        self.ensure_running()?;

        let mut trains = self.source.trains().to_vec();
        if !apply_recommendation(&mut trains, recommendation, &self.config) {
            log::warn!(
                "Recommendation {} targets unknown train {}",
                recommendation.id,
                recommendation.train_id
            );
            return Ok(false);
        }

        log::info!("Applied '{}' for conflict {}", recommendation.action, recommendation.conflict_id);
        self.source.commit_trains(trains.clone());
        self.conflicts_resolved += 1;
        self.broadcast(&EngineEvent::TrainsUpdated(trains));
        Ok(true)
    }
}

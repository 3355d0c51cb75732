use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    ModificationApplied,
    ConflictDetected,
    RecommendationApplied,
    KpiSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Minutes since scenario start
    pub minute: u32,
    pub timestamp: NaiveDateTime,
    pub kind: TimelineEventKind,
    pub description: String,
    pub train_ids: Vec<String>,
    /// Signed delay effect in minutes; negative means delay removed
    pub impact: f64,
}

/// Ordered record of everything that happened during a scenario run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    start: NaiveDateTime,
    events: Vec<TimelineEvent>,
}

impl Timeline {
    #[must_use]
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            start,
            events: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        minute: u32,
        kind: TimelineEventKind,
        description: impl Into<String>,
        train_ids: Vec<String>,
        impact: f64,
    ) {
        self.events.push(TimelineEvent {
            minute,
            timestamp: self.start + Duration::minutes(i64::from(minute)),
            kind,
            description: description.into(),
            train_ids,
            impact,
        });
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn of_kind(&self, kind: TimelineEventKind) -> impl Iterator<Item = &TimelineEvent> {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

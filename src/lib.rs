#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod constants;
pub mod logging;
pub mod error;
pub mod models;
pub mod network;
pub mod conflict;
pub mod recommendation;
pub mod resolution;
pub mod scenario;
pub mod kpi;
pub mod repository;
pub mod engine;

pub use conflict::{detect_conflicts, Conflict, ConflictType, Severity};
pub use engine::{AdvisoryEngine, EngineEvent};
pub use error::{AdvisorError, Result};
pub use kpi::compute_kpis;
pub use models::{EngineConfig, Recommendation, Snapshot, Station, Track, Train};
pub use recommendation::generate_recommendations;
pub use repository::{InMemoryRepository, SnapshotSource};
pub use resolution::{optimize_schedule, resolve_multiple_conflicts, simulate_recommendation};
pub use scenario::{Scenario, ScenarioEngine, SimulationResult};

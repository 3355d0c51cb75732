mod optimizer;
mod resolver;
mod simulator;

pub use optimizer::{optimize_schedule, prioritize_conflicts, OptimizationResult};
pub use resolver::{
    resolve_multiple_conflicts, score_candidate, ConflictResolution, ConflictResolver, MultiConflictResolution,
    ScoredRecommendation,
};
pub use simulator::{apply_recommendation, simulate_recommendation, SimulationOutcome};

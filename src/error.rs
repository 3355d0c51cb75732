use thiserror::Error;

/// Failures surfaced by the hard-error paths of the advisor
///
/// Detection, recommendation, simulation and KPI computation never fail;
/// they report "nothing found" through empty or infeasible results instead.
#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("advisory engine is not running")]
    EngineNotRunning,

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

use serde::{Deserialize, Serialize};

/// Scalar health metrics for one snapshot of the network
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Kpi {
    /// Percentage of trains within the on-time threshold
    pub punctuality: f64,
    /// Mean delay in minutes
    pub average_delay: f64,
    /// Active trains, scaled by `EngineConfig::throughput_scale`
    pub throughput: f64,
    pub conflicts_resolved: u32,
    /// Fed in from outside; the advisor never computes it
    pub ai_acceptance_rate: f64,
    pub system_efficiency: f64,
}

/// Change between two KPI snapshots, signed so that positive is better
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KpiImprovement {
    pub punctuality: f64,
    pub average_delay: f64,
    pub throughput: f64,
    pub conflicts_resolved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiComparison {
    pub baseline: Kpi,
    pub result: Kpi,
    pub improvement: KpiImprovement,
}

impl KpiComparison {
    #[must_use]
    pub fn new(baseline: Kpi, result: Kpi) -> Self {
        let improvement = KpiImprovement {
            punctuality: result.punctuality - baseline.punctuality,
            average_delay: baseline.average_delay - result.average_delay,
            throughput: result.throughput - baseline.throughput,
            conflicts_resolved: f64::from(result.conflicts_resolved) - f64::from(baseline.conflicts_resolved),
        };
        Self {
            baseline,
            result,
            improvement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_improvement_signs() {
        let baseline = Kpi {
            punctuality: 50.0,
            average_delay: 8.0,
            throughput: 4.0,
            conflicts_resolved: 0,
            ..Kpi::default()
        };
        let result = Kpi {
            punctuality: 75.0,
            average_delay: 3.0,
            throughput: 4.0,
            conflicts_resolved: 2,
            ..Kpi::default()
        };

        let comparison = KpiComparison::new(baseline, result);
        assert_eq!(comparison.improvement.punctuality, 25.0);
        assert_eq!(comparison.improvement.average_delay, 5.0);
        assert_eq!(comparison.improvement.throughput, 0.0);
        assert_eq!(comparison.improvement.conflicts_resolved, 2.0);
    }
}

//! Orchestration configuration.

use crate::cp::SolverConfig;

/// Configuration for solving a batch of machines.
///
/// # Examples
///
/// ```
/// use u_cpsearch::machine::SolveConfig;
///
/// let config = SolveConfig::default().with_prune_by_bound(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveConfig {
    /// Per-machine search settings.
    pub solver: SolverConfig,

    /// Solve independent machines concurrently. Each search stays
    /// single-threaded. Requires the `parallel` feature.
    pub parallel: bool,
}

impl SolveConfig {
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_prune_by_bound(mut self, prune: bool) -> Self {
        self.solver.prune_by_bound = prune;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.solver.upper_bound.is_some() {
            return Err("upper_bound is derived per machine and cannot be set for a batch".into());
        }
        if self.parallel && !cfg!(feature = "parallel") {
            return Err("parallel solving requires the `parallel` feature".into());
        }
        self.solver.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SolveConfig::default();
        assert!(!config.parallel);
        assert!(config.solver.prune_by_bound);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_batch_rejects_fixed_bound() {
        let config =
            SolveConfig::default().with_solver(SolverConfig::default().with_upper_bound(10));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parallel_needs_feature() {
        let config = SolveConfig::default().with_parallel(true);
        assert_eq!(config.validate().is_ok(), cfg!(feature = "parallel"));
    }
}

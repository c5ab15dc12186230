//! Per-machine solve loop.

use super::builder::build;
use super::config::SolveConfig;
use super::lights::{fewest_toggles, MAX_LIGHTS};
use super::types::MachineSpec;
use crate::cp::{BranchAndBoundSolver, CpSolver, SearchStats, SolverConfig, SolverStatus};
use crate::error::{Error, Result};

/// Answer for one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MachineAnswer {
    /// Minimum total number of presses.
    Optimal(i64),
    /// No press counts reach every target exactly.
    Infeasible,
}

impl MachineAnswer {
    /// The press total, if the machine is solvable.
    pub fn presses(&self) -> Option<i64> {
        match *self {
            MachineAnswer::Optimal(n) => Some(n),
            MachineAnswer::Infeasible => None,
        }
    }
}

/// Result of solving one machine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineOutcome {
    /// Position of the machine in the input.
    pub index: usize,
    pub answer: MachineAnswer,
    /// Presses per button of an optimal solution (empty if infeasible).
    pub presses: Vec<i64>,
    pub stats: SearchStats,
    pub solve_time_ms: i64,
}

/// Result of solving a batch of machines.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolveReport {
    /// One outcome per machine, in input order.
    pub machines: Vec<MachineOutcome>,
    /// Sum of the optimal answers.
    pub total: i64,
    /// Number of machines without a solution.
    pub infeasible: usize,
}

impl SolveReport {
    fn from_outcomes(machines: Vec<MachineOutcome>) -> Self {
        let total = machines.iter().filter_map(|m| m.answer.presses()).sum();
        let infeasible = machines
            .iter()
            .filter(|m| m.answer == MachineAnswer::Infeasible)
            .count();
        Self {
            machines,
            total,
            infeasible,
        }
    }
}

/// Solves machines one by one and sums their answers.
pub struct MachineRunner;

impl MachineRunner {
    /// Solves every machine and totals the optimal answers.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_cpsearch::machine::{parse_machines, MachineRunner, SolveConfig};
    ///
    /// let machines = parse_machines("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}").unwrap();
    /// let report = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap();
    /// assert_eq!(report.total, 10);
    /// ```
    pub fn solve_all(specs: &[MachineSpec], config: &SolveConfig) -> Result<SolveReport> {
        config.validate().map_err(Error::InvalidConfig)?;
        for (index, spec) in specs.iter().enumerate() {
            spec.validate().map_err(|reason| Error::InvalidMachine { index, reason })?;
        }

        let outcomes = if config.parallel {
            solve_parallel(specs, &config.solver)
        } else {
            specs
                .iter()
                .enumerate()
                .map(|(index, spec)| solve_validated(index, spec, &config.solver))
                .collect()
        };

        let report = SolveReport::from_outcomes(outcomes);
        log::debug!(
            "solved {} machines: total={} infeasible={}",
            report.machines.len(),
            report.total,
            report.infeasible
        );
        Ok(report)
    }

    /// Solves a single machine.
    pub fn solve_machine(
        index: usize,
        spec: &MachineSpec,
        config: &SolverConfig,
    ) -> Result<MachineOutcome> {
        config.validate().map_err(Error::InvalidConfig)?;
        spec.validate().map_err(|reason| Error::InvalidMachine { index, reason })?;
        Ok(solve_validated(index, spec, config))
    }

    /// Fewest toggling presses per machine to match its indicator pattern.
    pub fn toggle_all(specs: &[MachineSpec]) -> Result<Vec<Option<usize>>> {
        specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                if spec.lights.len() > MAX_LIGHTS {
                    return Err(Error::TooManyLights {
                        index,
                        lights: spec.lights.len(),
                        max: MAX_LIGHTS,
                    });
                }
                fewest_toggles(spec).map_err(|reason| Error::InvalidMachine { index, reason })
            })
            .collect()
    }
}

fn solve_validated(index: usize, spec: &MachineSpec, config: &SolverConfig) -> MachineOutcome {
    let problem = build(spec);
    let solution = BranchAndBoundSolver::new().solve(&problem, config);

    let answer = match (solution.status, solution.objective_value) {
        (SolverStatus::Optimal, Some(presses)) => MachineAnswer::Optimal(presses),
        _ => {
            log::warn!("machine {index} has no solution");
            MachineAnswer::Infeasible
        }
    };
    log::debug!(
        "machine {index}: {answer:?} ({} nodes, {} ms)",
        solution.stats.nodes,
        solution.solve_time_ms
    );

    MachineOutcome {
        index,
        answer,
        presses: solution.assignment,
        stats: solution.stats,
        solve_time_ms: solution.solve_time_ms,
    }
}

#[cfg(feature = "parallel")]
fn solve_parallel(specs: &[MachineSpec], config: &SolverConfig) -> Vec<MachineOutcome> {
    use rayon::prelude::*;

    specs
        .par_iter()
        .enumerate()
        .map(|(index, spec)| solve_validated(index, spec, config))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn solve_parallel(specs: &[MachineSpec], config: &SolverConfig) -> Vec<MachineOutcome> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| solve_validated(index, spec, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{parse_machines, Button};

    const SAMPLE: &str = "\
[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}
[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}
";

    #[test]
    fn test_sample_total() {
        let machines = parse_machines(SAMPLE).unwrap();
        let report = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap();

        let answers: Vec<_> = report.machines.iter().map(|m| m.answer).collect();
        assert_eq!(
            answers,
            vec![
                MachineAnswer::Optimal(10),
                MachineAnswer::Optimal(12),
                MachineAnswer::Optimal(11),
            ]
        );
        assert_eq!(report.total, 33);
        assert_eq!(report.infeasible, 0);
    }

    #[test]
    fn test_presses_reach_targets() {
        let machines = parse_machines(SAMPLE).unwrap();
        let report = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap();

        for (spec, outcome) in machines.iter().zip(&report.machines) {
            let mut reached = vec![0i64; spec.targets.len()];
            for (button, &n) in spec.buttons.iter().zip(&outcome.presses) {
                for effect in &button.effects {
                    reached[effect.accumulator] += effect.amount * n;
                }
            }
            assert_eq!(reached, spec.targets);
            assert_eq!(outcome.presses.iter().sum::<i64>(), outcome.answer.presses().unwrap());
        }
    }

    #[test]
    fn test_infeasible_machine_is_reported() {
        let machines = vec![
            MachineSpec::new(vec![6], vec![Button::weighted([(0, 2)])]),
            MachineSpec::new(vec![5], vec![Button::weighted([(0, 2)])]),
            MachineSpec::new(vec![1, 2], vec![Button::unit([0, 1])]),
        ];
        let report = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap();

        assert_eq!(report.machines[0].answer, MachineAnswer::Optimal(3));
        assert_eq!(report.machines[1].answer, MachineAnswer::Infeasible);
        assert_eq!(report.machines[2].answer, MachineAnswer::Infeasible);
        assert!(report.machines[1].presses.is_empty());
        assert_eq!(report.total, 3);
        assert_eq!(report.infeasible, 2);
    }

    #[test]
    fn test_invalid_machine_is_rejected() {
        let machines = vec![
            MachineSpec::new(vec![1], vec![Button::unit([0])]),
            MachineSpec::new(vec![1], vec![Button::unit([1])]),
        ];
        let err = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidMachine { index: 1, .. }));
    }

    #[test]
    fn test_oversized_targets_are_rejected() {
        let machines = vec![
            MachineSpec::new(vec![i64::MAX], vec![Button::unit([0])]),
            MachineSpec::new(vec![5_000_000_000_000_000_000; 2], vec![Button::unit([0, 1])]),
        ];
        for (index, spec) in machines.iter().enumerate() {
            let err =
                MachineRunner::solve_machine(index, spec, &SolverConfig::default()).unwrap_err();
            assert!(matches!(err, Error::InvalidMachine { index: i, .. } if i == index));
        }

        let err = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidMachine { index: 0, .. }));
    }

    #[test]
    fn test_solve_machine_with_zero_targets() {
        let spec = MachineSpec::new(vec![0, 0], vec![Button::unit([0, 1])]);
        let outcome = MachineRunner::solve_machine(4, &spec, &SolverConfig::default()).unwrap();
        assert_eq!(outcome.index, 4);
        assert_eq!(outcome.answer, MachineAnswer::Optimal(0));
    }

    #[test]
    fn test_toggle_all() {
        let machines = parse_machines(SAMPLE).unwrap();
        let toggles = MachineRunner::toggle_all(&machines).unwrap();
        assert_eq!(toggles, vec![Some(2), Some(3), Some(2)]);
    }

    #[test]
    fn test_toggle_all_too_many_lights() {
        let machines = vec![MachineSpec::default().with_lights(vec![false; MAX_LIGHTS + 1])];
        let err = MachineRunner::toggle_all(&machines).unwrap_err();
        assert!(matches!(err, Error::TooManyLights { index: 0, .. }));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let machines = parse_machines(SAMPLE).unwrap();
        let sequential = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap();
        let parallel =
            MachineRunner::solve_all(&machines, &SolveConfig::default().with_parallel(true))
                .unwrap();
        assert_eq!(sequential.total, parallel.total);
    }
}

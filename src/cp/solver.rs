//! Branch-and-bound search over propagated problems.
//!
//! # Algorithm
//!
//! 1. Propagate the node to a fixed point; a contradiction ends the branch
//! 2. A node with every variable fixed is a leaf costing the sum of values
//! 3. Prune when the node's cost lower bound reaches the current bound
//! 4. Pick the most constrained constraint (fewest unresolved members, then
//!    least wiggle room) and within it the unfixed variable with the
//!    smallest domain (then highest degree)
//! 5. Try every value of that variable in ascending order on a private
//!    copy of the node, threading the improving bound across siblings
//!
//! Each level fixes one more variable, so recursion depth is bounded by
//! the number of variables.

use std::cmp::Reverse;

use super::model::Problem;
use super::propagator::BoundsPropagator;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No assignment satisfies every constraint.
    Infeasible,
    /// A caller-supplied bound was not beaten.
    NoImprovement,
}

/// Counters collected during a search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    /// Search nodes visited.
    pub nodes: u64,
    /// Propagation passes that changed something.
    pub propagation_rounds: u64,
    /// Nodes cut by the cost lower bound.
    pub pruned: u64,
    /// Nodes that propagation proved unviable.
    pub dead_ends: u64,
    /// Leaves that improved the bound.
    pub solutions: u64,
}

/// Solution from a CP solver.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Minimum total, when one was found.
    pub objective_value: Option<i64>,
    /// Value per variable of the best leaf (empty if none).
    pub assignment: Vec<i64>,
    /// Search counters.
    pub stats: SearchStats,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl CpSolution {
    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        self.status == SolverStatus::Optimal
    }
}

/// Solver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Exclusive upper bound on the objective. `None` uses the problem's
    /// sentinel bound, which no feasible assignment reaches.
    pub upper_bound: Option<i64>,
    /// Cut nodes whose cost lower bound reaches the current bound.
    pub prune_by_bound: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            upper_bound: None,
            prune_by_bound: true,
        }
    }
}

impl SolverConfig {
    pub fn with_upper_bound(mut self, bound: i64) -> Self {
        self.upper_bound = Some(bound);
        self
    }

    pub fn with_prune_by_bound(mut self, prune: bool) -> Self {
        self.prune_by_bound = prune;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(bound) = self.upper_bound {
            if bound < 0 {
                return Err(format!("upper_bound must be non-negative, got {bound}"));
            }
        }
        Ok(())
    }
}

/// Trait for CP solver implementations.
pub trait CpSolver {
    /// Solves the problem and returns a solution.
    fn solve(&self, problem: &Problem, config: &SolverConfig) -> CpSolution;
}

/// Depth-first branch-and-bound minimising the sum of all variables.
///
/// # Examples
///
/// ```
/// use u_cpsearch::cp::{BranchAndBound, Constraint, Problem, Term, Variable};
///
/// // one button adding 2 per press to a counter that must reach 6
/// let problem = Problem::new(
///     vec![Variable::new(0, 3, 1)],
///     vec![Constraint::new(vec![Term::new(0, 2)], 6)],
/// );
/// let mut search = BranchAndBound::new();
/// assert_eq!(search.solve(problem, 7), 3);
/// assert_eq!(search.best_assignment(), Some(&[3][..]));
/// ```
#[derive(Debug, Clone)]
pub struct BranchAndBound {
    prune_by_bound: bool,
    stats: SearchStats,
    best: Option<Vec<i64>>,
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self::new()
    }
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self {
            prune_by_bound: true,
            stats: SearchStats::default(),
            best: None,
        }
    }

    /// Disables or enables cost-bound pruning.
    pub fn with_prune_by_bound(mut self, prune: bool) -> Self {
        self.prune_by_bound = prune;
        self
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Assignment of the best leaf found so far.
    pub fn best_assignment(&self) -> Option<&[i64]> {
        self.best.as_deref()
    }

    /// Returns the minimum total strictly below `upper_bound`, or
    /// `upper_bound` unchanged if this subtree holds nothing better.
    pub fn solve(&mut self, mut problem: Problem, upper_bound: i64) -> i64 {
        self.stats.nodes += 1;

        let fixpoint = BoundsPropagator::fixpoint(&mut problem);
        self.stats.propagation_rounds += fixpoint.rounds as u64;
        if !fixpoint.viable {
            self.stats.dead_ends += 1;
            return upper_bound;
        }

        let branch = if problem.is_solved() {
            None
        } else {
            choose_branch_variable(&problem)
        };

        let Some(var) = branch else {
            // Every remaining variable is unconstrained, so its minimum is optimal.
            return self.record_leaf(&problem, upper_bound);
        };

        if self.prune_by_bound {
            let lower = problem.cost_lower_bound();
            if lower >= upper_bound {
                self.stats.pruned += 1;
                log::trace!("pruned node: lower bound {lower} >= {upper_bound}");
                return upper_bound;
            }
        }

        let (lo, hi) = {
            let v = &problem.variables()[var];
            (v.min, v.max)
        };

        let mut best = upper_bound;
        for value in lo..=hi {
            let mut child = problem.clone();
            child.fix(var, value);
            best = best.min(self.solve(child, best));
        }
        best
    }

    fn record_leaf(&mut self, problem: &Problem, upper_bound: i64) -> i64 {
        let cost = problem.current_minimum();
        if cost < upper_bound {
            self.stats.solutions += 1;
            self.best = Some(problem.assignment());
            cost
        } else {
            upper_bound
        }
    }
}

/// Picks the variable to branch on, or `None` if no active constraint has
/// an unfixed member.
fn choose_branch_variable(problem: &Problem) -> Option<usize> {
    let variables = problem.variables();

    let constraint = problem
        .active_constraints()
        .filter(|c| c.active_terms().any(|t| !variables[t.var].is_fixed()))
        .min_by_key(|c| (c.active_len(), c.wiggle_room(variables)))?;

    constraint
        .active_terms()
        .map(|t| t.var)
        .filter(|&var| !variables[var].is_fixed())
        .min_by_key(|&var| {
            let v = &variables[var];
            (v.domain_size(), Reverse(v.degree), var)
        })
}

/// [`CpSolver`] backed by [`BranchAndBound`].
pub struct BranchAndBoundSolver;

impl BranchAndBoundSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BranchAndBoundSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CpSolver for BranchAndBoundSolver {
    fn solve(&self, problem: &Problem, config: &SolverConfig) -> CpSolution {
        let start_time = std::time::Instant::now();

        let sentinel = problem.sentinel_bound();
        let bound = config.upper_bound.unwrap_or(sentinel);

        let mut search = BranchAndBound::new().with_prune_by_bound(config.prune_by_bound);
        let result = search.solve(problem.clone(), bound);
        let stats = search.stats();

        let (status, objective_value, assignment) = match search.best.take() {
            Some(assignment) if result < bound => (SolverStatus::Optimal, Some(result), assignment),
            _ if config.upper_bound.is_some() => (SolverStatus::NoImprovement, None, Vec::new()),
            _ => (SolverStatus::Infeasible, None, Vec::new()),
        };

        log::debug!(
            "search finished: {:?} objective={:?} nodes={} pruned={} dead_ends={}",
            status,
            objective_value,
            stats.nodes,
            stats.pruned,
            stats.dead_ends
        );

        CpSolution {
            status,
            objective_value,
            assignment,
            stats,
            solve_time_ms: start_time.elapsed().as_millis() as i64,
        }
    }
}

//! CP model definition.

use super::variables::Variable;

/// One member of a linear equality: `coefficient * variables[var]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    /// Index into the problem's variables.
    pub var: usize,
    /// Positive amount contributed per unit of the variable.
    pub coefficient: i64,
    /// Set once the variable's value has been folded into `remaining`.
    pub resolved: bool,
}

impl Term {
    /// Creates an unresolved term.
    ///
    /// # Panics
    ///
    /// Panics if `coefficient` is not positive.
    pub fn new(var: usize, coefficient: i64) -> Self {
        assert!(coefficient > 0, "coefficient must be positive, got {coefficient}");
        Self {
            var,
            coefficient,
            resolved: false,
        }
    }
}

/// Lifecycle of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintStatus {
    /// Still has unresolved members or a non-zero remainder.
    Active,
    /// Every member resolved and the remainder reached zero.
    Satisfied,
    /// The remainder can no longer be met.
    Violated,
}

/// A linear equality `Σ coefficient·x = target` over press-count variables.
///
/// Resolved members stay in `terms` with their `resolved` flag set; their
/// contribution has already been subtracted from `remaining`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    terms: Vec<Term>,
    target: i64,
    remaining: i64,
    status: ConstraintStatus,
}

impl Constraint {
    /// Creates an active constraint requiring the terms to sum to `target`.
    pub fn new(terms: Vec<Term>, target: i64) -> Self {
        Self {
            terms,
            target,
            remaining: target,
            status: ConstraintStatus::Active,
        }
    }

    /// Original right-hand side.
    pub fn target(&self) -> i64 {
        self.target
    }

    /// Amount still to be covered by the unresolved members.
    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    /// Current status.
    pub fn status(&self) -> ConstraintStatus {
        self.status
    }

    /// Whether the constraint still takes part in propagation.
    pub fn is_active(&self) -> bool {
        self.status == ConstraintStatus::Active
    }

    /// All terms, resolved or not.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Unresolved terms.
    pub fn active_terms(&self) -> impl Iterator<Item = &Term> + '_ {
        self.terms.iter().filter(|t| !t.resolved)
    }

    /// Number of unresolved terms.
    pub fn active_len(&self) -> usize {
        self.active_terms().count()
    }

    /// Largest coefficient among the unresolved terms (0 if none).
    pub fn max_coefficient(&self) -> i64 {
        self.active_terms().map(|t| t.coefficient).max().unwrap_or(0)
    }

    /// `(minSum, maxSum)` of the unresolved terms under `variables`.
    pub fn available_range(&self, variables: &[Variable]) -> (i64, i64) {
        self.active_terms().fold((0, 0), |(lo, hi), t| {
            let v = &variables[t.var];
            (lo + t.coefficient * v.min, hi + t.coefficient * v.max)
        })
    }

    /// How far the maximum achievable sum overshoots `remaining`.
    pub fn wiggle_room(&self, variables: &[Variable]) -> i64 {
        let (_, hi) = self.available_range(variables);
        hi - self.remaining
    }

    /// How much must still be added on top of the members' minimums.
    pub fn required_extra(&self, variables: &[Variable]) -> i64 {
        let (lo, _) = self.available_range(variables);
        self.remaining - lo
    }

    /// Sum of `coefficient·value` over resolved terms.
    pub fn resolved_sum(&self, variables: &[Variable]) -> i64 {
        self.terms
            .iter()
            .filter(|t| t.resolved)
            .map(|t| t.coefficient * variables[t.var].min)
            .sum()
    }

    pub(crate) fn terms_mut(&mut self) -> &mut [Term] {
        &mut self.terms
    }

    pub(crate) fn set_remaining(&mut self, remaining: i64) {
        self.remaining = remaining;
    }

    pub(crate) fn set_status(&mut self, status: ConstraintStatus) {
        self.status = status;
    }
}

/// One search node: every variable's domain plus every constraint.
///
/// Cloning a problem yields a fully independent branch; nothing is shared
/// between parent and child.
///
/// # Examples
///
/// ```
/// use u_cpsearch::cp::{Constraint, Problem, Term, Variable};
///
/// // x + y = 4, x + 2y = 6
/// let problem = Problem::new(
///     vec![Variable::new(0, 4, 2), Variable::new(0, 3, 2)],
///     vec![
///         Constraint::new(vec![Term::new(0, 1), Term::new(1, 1)], 4),
///         Constraint::new(vec![Term::new(0, 1), Term::new(1, 2)], 6),
///     ],
/// );
/// assert_eq!(problem.variable_count(), 2);
/// assert_eq!(problem.sentinel_bound(), 11);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl Problem {
    /// Creates a problem from its variables and constraints.
    pub fn new(variables: Vec<Variable>, constraints: Vec<Constraint>) -> Self {
        Self {
            variables,
            constraints,
        }
    }

    /// All variables.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// All constraints, including retired ones.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraints still taking part in propagation.
    pub fn active_constraints(&self) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints.iter().filter(|c| c.is_active())
    }

    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints, including retired ones.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Fixes variable `var` to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `var` is out of range.
    pub fn fix(&mut self, var: usize, value: i64) {
        self.variables[var].fix(value);
    }

    /// Whether every variable is fixed.
    pub fn is_solved(&self) -> bool {
        self.variables.iter().all(Variable::is_fixed)
    }

    /// Whether a constraint has been marked violated.
    pub fn has_contradiction(&self) -> bool {
        self.constraints
            .iter()
            .any(|c| c.status() == ConstraintStatus::Violated)
    }

    /// Sum of all lower bounds; a floor on any completion's cost.
    pub fn current_minimum(&self) -> i64 {
        self.variables.iter().map(|v| v.min).sum()
    }

    /// Lower bound on the cost of any completion of this node.
    ///
    /// Each constraint still needs `required_extra` on top of its members'
    /// minimums, and one unit of any member adds at most
    /// `max_coefficient` towards it.
    pub fn cost_lower_bound(&self) -> i64 {
        let extra = self
            .active_constraints()
            .map(|c| {
                let need = c.required_extra(&self.variables).max(0);
                let step = c.max_coefficient().max(1);
                (need + step - 1) / step
            })
            .max()
            .unwrap_or(0);
        self.current_minimum() + extra
    }

    /// Exclusive upper bound no feasible assignment can reach.
    ///
    /// Every unit of a wired variable adds at least one to some target, so
    /// no solution costs more than the sum of targets. Saturates at
    /// `i64::MAX`.
    pub fn sentinel_bound(&self) -> i64 {
        let targets = self.constraints.iter().map(Constraint::target);
        targets.fold(1, i64::saturating_add)
    }

    /// Current value of every variable's lower bound.
    pub fn assignment(&self) -> Vec<i64> {
        self.variables.iter().map(|v| v.min).collect()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut [Variable], &mut [Constraint]) {
        (self.variables.as_mut_slice(), self.constraints.as_mut_slice())
    }
}

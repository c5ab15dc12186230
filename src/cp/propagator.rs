//! Bounds-consistency propagation for linear equalities.
//!
//! Each pass visits the active constraints in order and applies, per
//! constraint:
//!
//! 1. cap every member's `max` by what the remainder allows,
//! 2. fold fixed members into the remainder,
//! 3. force the last unresolved member to the remainder,
//! 4. otherwise tighten both bounds of every member against the
//!    achievable `[minSum, maxSum]` range of the others.
//!
//! A constraint whose remainder cannot be met is tagged
//! [`ConstraintStatus::Violated`] and the pass stops there. Bounds only
//! shrink, so repeated passes reach a fixed point.

use super::model::{Constraint, ConstraintStatus, Problem, Term};
use super::variables::Variable;

/// Result of running propagation to a fixed point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixpoint {
    /// Number of passes that changed something.
    pub rounds: usize,
    /// Whether the problem is still viable afterwards.
    pub viable: bool,
}

enum Outcome {
    Consistent { changed: bool },
    Contradiction,
}

/// Bounds propagator over a [`Problem`].
pub struct BoundsPropagator;

impl BoundsPropagator {
    /// Runs one propagation pass. Returns `true` if anything changed.
    ///
    /// Discovering a contradiction counts as a change; once a constraint is
    /// violated, further passes report no change.
    pub fn propagate(problem: &mut Problem) -> bool {
        if problem.has_contradiction() {
            return false;
        }

        let (variables, constraints) = problem.parts_mut();
        let mut changed = false;

        for constraint in constraints.iter_mut().filter(|c| c.is_active()) {
            match propagate_constraint(constraint, variables) {
                Outcome::Consistent { changed: c } => changed |= c,
                Outcome::Contradiction => {
                    constraint.set_status(ConstraintStatus::Violated);
                    return true;
                }
            }
        }

        changed
    }

    /// Whether no domain is empty and every constraint can still be met.
    pub fn is_viable(problem: &Problem) -> bool {
        let variables = problem.variables();
        if variables.iter().any(Variable::is_empty) {
            return false;
        }
        problem.constraints().iter().all(|c| match c.status() {
            ConstraintStatus::Violated => false,
            ConstraintStatus::Satisfied => true,
            ConstraintStatus::Active => {
                let (lo, hi) = c.available_range(variables);
                c.remaining() >= 0 && lo <= c.remaining() && c.remaining() <= hi
            }
        })
    }

    /// Propagates until nothing changes or a contradiction is found.
    pub fn fixpoint(problem: &mut Problem) -> Fixpoint {
        let mut rounds = 0;
        while Self::propagate(problem) {
            rounds += 1;
            if problem.has_contradiction() {
                break;
            }
        }
        Fixpoint {
            rounds,
            viable: Self::is_viable(problem),
        }
    }
}

fn propagate_constraint(constraint: &mut Constraint, variables: &mut [Variable]) -> Outcome {
    let mut changed = false;
    let mut remaining = constraint.remaining();
    if remaining < 0 {
        return Outcome::Contradiction;
    }

    // Cap from total.
    for term in constraint.active_terms() {
        let var = &mut variables[term.var];
        if var.tighten_max(remaining / term.coefficient) {
            changed = true;
            if var.is_empty() {
                return Outcome::Contradiction;
            }
        }
    }

    // Fixed-variable elimination.
    for term in constraint.terms_mut().iter_mut().filter(|t| !t.resolved) {
        if let Some(value) = variables[term.var].value() {
            term.resolved = true;
            remaining -= term.coefficient * value;
            changed = true;
        }
    }
    constraint.set_remaining(remaining);
    if remaining < 0 {
        return Outcome::Contradiction;
    }

    let active: Vec<Term> = constraint.active_terms().copied().collect();
    match active.as_slice() {
        [] if remaining == 0 => {
            constraint.set_status(ConstraintStatus::Satisfied);
            Outcome::Consistent { changed: true }
        }
        [] => Outcome::Contradiction,
        [last] => resolve_last(constraint, *last, variables),
        _ => prune_bounds(constraint, &active, variables, changed),
    }
}

fn resolve_last(constraint: &mut Constraint, last: Term, variables: &mut [Variable]) -> Outcome {
    let remaining = constraint.remaining();
    let var = &mut variables[last.var];

    let forced = (remaining % last.coefficient == 0)
        .then(|| remaining / last.coefficient)
        .filter(|value| (var.min..=var.max).contains(value));

    match forced {
        Some(value) => {
            var.fix(value);
            if let Some(term) = constraint
                .terms_mut()
                .iter_mut()
                .find(|t| t.var == last.var && !t.resolved)
            {
                term.resolved = true;
            }
            constraint.set_remaining(0);
            constraint.set_status(ConstraintStatus::Satisfied);
            Outcome::Consistent { changed: true }
        }
        None => {
            var.tighten_max(var.min - 1);
            Outcome::Contradiction
        }
    }
}

fn prune_bounds(
    constraint: &Constraint,
    active: &[Term],
    variables: &mut [Variable],
    mut changed: bool,
) -> Outcome {
    let remaining = constraint.remaining();
    let (min_sum, max_sum) = constraint.available_range(variables);
    if min_sum > remaining || max_sum < remaining {
        return Outcome::Contradiction;
    }

    for term in active {
        let w = term.coefficient;
        let var = &mut variables[term.var];
        let (lo, hi) = (var.min, var.max);

        // Everyone else at their minimum leaves this much room.
        let upper = lo + (remaining - min_sum) / w;
        // Everyone else at their maximum still leaves this much to cover.
        let need = remaining - (max_sum - w * hi);

        changed |= var.tighten_max(upper);
        if need > 0 {
            changed |= var.tighten_min((need + w - 1) / w);
        }
        if var.is_empty() {
            return Outcome::Contradiction;
        }
    }

    Outcome::Consistent { changed }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(vars: &[usize], target: i64) -> Constraint {
        Constraint::new(vars.iter().map(|&v| Term::new(v, 1)).collect(), target)
    }

    fn bounds(p: &Problem) -> Vec<(i64, i64)> {
        p.variables().iter().map(|v| (v.min, v.max)).collect()
    }

    #[test]
    fn test_cap_from_total() {
        let mut p = Problem::new(
            vec![Variable::new(0, 10, 1), Variable::new(0, 10, 1)],
            vec![unit(&[0, 1], 3)],
        );
        assert!(BoundsPropagator::propagate(&mut p));
        assert_eq!(bounds(&p), vec![(0, 3), (0, 3)]);
        assert!(BoundsPropagator::is_viable(&p));
    }

    #[test]
    fn test_fixed_elimination() {
        let mut p = Problem::new(
            vec![
                Variable::fixed(2, 1),
                Variable::new(0, 5, 1),
                Variable::new(0, 5, 1),
            ],
            vec![unit(&[0, 1, 2], 4)],
        );
        BoundsPropagator::propagate(&mut p);

        let c = &p.constraints()[0];
        assert_eq!(c.remaining(), 2);
        assert_eq!(c.active_len(), 2);
        assert_eq!(c.resolved_sum(p.variables()), 2);
        assert_eq!(bounds(&p)[1..].to_vec(), vec![(0, 2), (0, 2)]);
    }

    #[test]
    fn test_last_variable_resolution() {
        let mut p = Problem::new(
            vec![Variable::new(0, 5, 1), Variable::fixed(1, 1)],
            vec![unit(&[0, 1], 3)],
        );
        assert!(BoundsPropagator::propagate(&mut p));
        assert_eq!(p.variables()[0].value(), Some(2));
        assert_eq!(p.constraints()[0].status(), ConstraintStatus::Satisfied);
        assert_eq!(p.active_constraints().count(), 0);
    }

    #[test]
    fn test_last_variable_out_of_range() {
        let mut p = Problem::new(
            vec![Variable::new(0, 1, 1), Variable::fixed(0, 1)],
            vec![unit(&[0, 1], 3)],
        );
        assert!(BoundsPropagator::propagate(&mut p));
        assert!(p.variables()[0].is_empty());
        assert!(p.has_contradiction());
        assert!(!BoundsPropagator::is_viable(&p));
    }

    #[test]
    fn test_range_excludes_remaining() {
        let mut p = Problem::new(
            vec![Variable::new(0, 1, 1), Variable::new(0, 1, 1)],
            vec![unit(&[0, 1], 3)],
        );
        let fp = BoundsPropagator::fixpoint(&mut p);
        assert!(!fp.viable);
        assert_eq!(p.constraints()[0].status(), ConstraintStatus::Violated);
    }

    #[test]
    fn test_coefficient_divisibility() {
        let mut p = Problem::new(
            vec![Variable::new(0, 2, 1)],
            vec![Constraint::new(vec![Term::new(0, 2)], 5)],
        );
        let fp = BoundsPropagator::fixpoint(&mut p);
        assert!(!fp.viable);
    }

    #[test]
    fn test_min_tightening_forces_values() {
        let mut p = Problem::new(
            vec![Variable::new(0, 2, 1), Variable::new(0, 2, 1)],
            vec![unit(&[0, 1], 4)],
        );
        let fp = BoundsPropagator::fixpoint(&mut p);
        assert!(fp.viable);
        assert!(p.is_solved());
        assert_eq!(p.assignment(), vec![2, 2]);
        assert_eq!(p.active_constraints().count(), 0);
    }

    #[test]
    fn test_weighted_bounds() {
        // x + 2y = 4 with x in [1, 4], y in [0, 2]
        let mut p = Problem::new(
            vec![Variable::new(1, 4, 1), Variable::new(0, 2, 1)],
            vec![Constraint::new(vec![Term::new(0, 1), Term::new(1, 2)], 4)],
        );
        BoundsPropagator::propagate(&mut p);
        // with x >= 1 only 3 is left for 2y
        assert_eq!(bounds(&p), vec![(1, 4), (0, 1)]);

        let fp = BoundsPropagator::fixpoint(&mut p);
        assert!(fp.viable);
        // 2y covers at most 2, so x >= 2
        assert_eq!(bounds(&p), vec![(2, 4), (0, 1)]);
    }

    #[test]
    fn test_fixpoint_idempotent() {
        let mut p = Problem::new(
            vec![
                Variable::new(0, 9, 2),
                Variable::new(0, 9, 1),
                Variable::new(0, 9, 1),
            ],
            vec![unit(&[0, 1], 3), unit(&[0, 2], 2)],
        );
        let fp = BoundsPropagator::fixpoint(&mut p);
        assert!(fp.viable);
        assert!(fp.rounds >= 1);

        let snapshot = p.clone();
        assert!(!BoundsPropagator::propagate(&mut p));
        assert!(!BoundsPropagator::propagate(&mut p));
        assert_eq!(p, snapshot);
    }

    #[test]
    fn test_contradiction_is_sticky() {
        let mut p = Problem::new(vec![Variable::new(0, 1, 1)], vec![unit(&[0], 2)]);
        BoundsPropagator::fixpoint(&mut p);
        assert!(!BoundsPropagator::propagate(&mut p));
        assert!(!BoundsPropagator::is_viable(&p));
    }
}

//! Converts a machine specification into a search problem.

use std::collections::BTreeMap;

use super::types::MachineSpec;
use crate::cp::{Constraint, Problem, Term, Variable};

/// Builds the initial [`Problem`] for a machine.
///
/// One constraint per accumulator (`Σ amount·presses = target`) and one
/// variable per button with domain `[0, min ⌊target / amount⌋]` over the
/// accumulators it touches. A button wired to nothing is fixed to zero.
/// Repeated wiring of a button to the same accumulator is merged.
///
/// The spec must have passed [`MachineSpec::validate`].
///
/// # Panics
///
/// Panics if a button references an accumulator that does not exist.
pub fn build(spec: &MachineSpec) -> Problem {
    let mut terms: Vec<Vec<Term>> = vec![Vec::new(); spec.targets.len()];
    let mut variables = Vec::with_capacity(spec.buttons.len());

    for (index, button) in spec.buttons.iter().enumerate() {
        let mut wiring: BTreeMap<usize, i64> = BTreeMap::new();
        for effect in &button.effects {
            *wiring.entry(effect.accumulator).or_default() += effect.amount;
        }

        let max = wiring
            .iter()
            .map(|(&acc, &amount)| spec.targets[acc] / amount)
            .min()
            .unwrap_or(0);

        for (&acc, &amount) in &wiring {
            terms[acc].push(Term::new(index, amount));
        }
        variables.push(Variable::new(0, max, wiring.len()));
    }

    let constraints = terms
        .into_iter()
        .zip(&spec.targets)
        .map(|(terms, &target)| Constraint::new(terms, target))
        .collect();

    Problem::new(variables, constraints)
}

//! Constraint Programming (CP) core.
//!
//! Bounded integer variables linked by linear equalities with positive
//! coefficients, a bounds-consistency propagator, and a branch-and-bound
//! search minimising the sum of all variables.
//!
//! # Key Components
//!
//! - **Variables**: [`Variable`] — press-count domain `[min, max]`
//! - **Model**: [`Problem`], [`Constraint`], [`Term`] — one search node
//! - **Propagation**: [`BoundsPropagator`] — shrink-only tightening to a
//!   fixed point with contradiction detection
//! - **Solver**: [`BranchAndBound`], [`CpSolver`] — depth-first search
//!   with admissible cost pruning
//!
//! # Design
//!
//! Branches never share mutable state: every child is a deep copy of its
//! parent [`Problem`]. Retired constraints and resolved members are tagged
//! in place rather than removed.
//!
//! # References
//!
//! Rossi, van Beek & Walsh (2006), "Handbook of Constraint Programming"

mod model;
mod propagator;
mod solver;
mod variables;

pub use model::{Constraint, ConstraintStatus, Problem, Term};
pub use propagator::{BoundsPropagator, Fixpoint};
pub use solver::{
    BranchAndBound, BranchAndBoundSolver, CpSolution, CpSolver, SearchStats, SolverConfig,
    SolverStatus,
};
pub use variables::Variable;

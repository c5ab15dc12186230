//! Constraint propagation and branch-and-bound search for exact integer
//! accumulator systems.
//!
//! Given buttons that each add a fixed amount to one or more accumulators
//! per press, find the fewest total presses bringing every accumulator to
//! its target exactly.
//!
//! - **CP core** ([`cp`]): bounded integer variables, linear equalities,
//!   a shrink-only bounds propagator, and cost-bounded depth-first search.
//! - **Machines** ([`machine`]): input specifications, the problem builder,
//!   the text parser, and the per-machine solve loop.
//!
//! Infeasible machines are reported explicitly rather than as a sentinel
//! press count.
//!
//! # Example
//!
//! ```
//! use u_cpsearch::machine::{Button, MachineAnswer, MachineRunner, MachineSpec, SolveConfig};
//!
//! let machines = vec![
//!     MachineSpec::new(vec![6], vec![Button::weighted([(0, 2)])]),
//!     MachineSpec::new(vec![5], vec![Button::weighted([(0, 2)])]),
//! ];
//! let report = MachineRunner::solve_all(&machines, &SolveConfig::default()).unwrap();
//! assert_eq!(report.machines[0].answer, MachineAnswer::Optimal(3));
//! assert_eq!(report.machines[1].answer, MachineAnswer::Infeasible);
//! assert_eq!(report.total, 3);
//! ```

pub mod cp;
pub mod error;
pub mod machine;

pub use error::{Error, Result};

//! Button machines: accumulator targets reached by pressing buttons.
//!
//! Each machine becomes one [`Problem`](crate::cp::Problem): a variable per
//! button (its press count) and an equality per accumulator. The
//! [`MachineRunner`] builds, searches, and totals the answers.
//!
//! # Key Components
//!
//! - **Input**: [`MachineSpec`], [`Button`], [`Effect`], [`parse_machines`]
//! - **Builder**: [`build`] — machine to initial problem
//! - **Orchestration**: [`MachineRunner`], [`SolveConfig`], [`SolveReport`]
//! - **Indicator lights**: [`fewest_toggles`]
//! - **Instances**: [`GeneratorConfig`] — seeded machines with a planted
//!   solution

mod builder;
mod config;
mod generator;
mod lights;
mod parser;
mod runner;
mod types;

pub use builder::build;
pub use config::SolveConfig;
pub use generator::{GeneratedMachine, GeneratorConfig};
pub use lights::{fewest_toggles, MAX_LIGHTS};
pub use parser::{parse_line, parse_machines};
pub use runner::{MachineAnswer, MachineOutcome, MachineRunner, SolveReport};
pub use types::{Button, Effect, MachineSpec};

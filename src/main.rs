use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use u_cpsearch::machine::{parse_machines, MachineAnswer, MachineRunner, SolveConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Fewest presses reaching every accumulator target.
    Counters,
    /// Fewest toggling presses matching the indicator lights.
    Lights,
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Path to the machine list. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Which answer to compute per machine.
    #[arg(long, value_enum, default_value_t = Mode::Counters)]
    mode: Mode,

    /// Solve machines concurrently (requires the `parallel` feature).
    #[arg(long)]
    parallel: bool,

    /// Disable cost-bound pruning.
    #[arg(long)]
    no_prune: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let source = match &cli.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            let _ = std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let machines = parse_machines(&source)?;

    match cli.mode {
        Mode::Counters => {
            let config = SolveConfig::default()
                .with_parallel(cli.parallel)
                .with_prune_by_bound(!cli.no_prune);
            let report = MachineRunner::solve_all(&machines, &config)?;

            for outcome in &report.machines {
                match outcome.answer {
                    MachineAnswer::Optimal(presses) => println!("{presses}"),
                    MachineAnswer::Infeasible => println!("infeasible"),
                }
            }
            println!("{}", report.total);
        }
        Mode::Lights => {
            let toggles = MachineRunner::toggle_all(&machines)?;
            for answer in &toggles {
                match answer {
                    Some(presses) => println!("{presses}"),
                    None => println!("infeasible"),
                }
            }
            println!("{}", toggles.iter().flatten().sum::<usize>());
        }
    }

    Ok(())
}

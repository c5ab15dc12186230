//! Parser for the one-machine-per-line text format.
//!
//! ```text
//! [.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}
//! ```
//!
//! The bracketed indicator pattern is optional (`#` on, `.` off). Each
//! parenthesised group lists the accumulators one button adds 1 to; the
//! braces hold the accumulator targets. Blank lines are skipped.

use std::fmt::Display;
use std::str::FromStr;

use super::types::{Button, MachineSpec};
use crate::error::{Error, Result};

/// Parses every non-blank line of `input` into a machine.
pub fn parse_machines(input: &str) -> Result<Vec<MachineSpec>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse_line(line)
                .and_then(|spec| spec.validate().map(|()| spec))
                .map_err(|reason| Error::Parse {
                    line: i + 1,
                    reason,
                })
        })
        .collect()
}

/// Parses a single machine line.
pub fn parse_line(line: &str) -> std::result::Result<MachineSpec, String> {
    let mut rest = line.trim();

    let mut lights = Vec::new();
    if let Some(after) = rest.strip_prefix('[') {
        let end = after.find(']').ok_or("unterminated indicator pattern")?;
        lights = after[..end]
            .chars()
            .map(|c| match c {
                '#' => Ok(true),
                '.' => Ok(false),
                other => Err(format!("unexpected indicator character {other:?}")),
            })
            .collect::<std::result::Result<_, _>>()?;
        rest = after[end + 1..].trim_start();
    }

    let mut buttons = Vec::new();
    while let Some(after) = rest.strip_prefix('(') {
        let end = after.find(')').ok_or("unterminated button wiring")?;
        buttons.push(Button::unit(parse_list::<usize>(&after[..end])?));
        rest = after[end + 1..].trim_start();
    }

    let after = rest
        .strip_prefix('{')
        .ok_or_else(|| format!("expected '{{' but found {rest:?}"))?;
    let end = after.find('}').ok_or("unterminated joltage targets")?;
    let targets = parse_list::<i64>(&after[..end])?;

    let trailing = after[end + 1..].trim();
    if !trailing.is_empty() {
        return Err(format!("unexpected trailing input {trailing:?}"));
    }

    Ok(MachineSpec {
        lights,
        targets,
        buttons,
    })
}

fn parse_list<T>(list: &str) -> std::result::Result<Vec<T>, String>
where
    T: FromStr,
    T::Err: Display,
{
    if list.trim().is_empty() {
        return Ok(Vec::new());
    }
    list.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<T>().map_err(|e| format!("invalid number {item:?}: {e}"))
        })
        .collect()
}

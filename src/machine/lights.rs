//! Indicator lights: each press toggles the lights a button is wired to.

use std::collections::VecDeque;

use super::types::MachineSpec;

/// Largest indicator pattern accepted by [`fewest_toggles`].
pub const MAX_LIGHTS: usize = 20;

/// Fewest presses turning all-off lights into the machine's indicator
/// pattern, or `None` if the pattern cannot be reached.
///
/// Pressing a button twice cancels out, so this is a breadth-first search
/// over the `2^n` light masks.
///
/// # Examples
///
/// ```
/// use u_cpsearch::machine::{fewest_toggles, parse_line};
///
/// let spec = parse_line("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}").unwrap();
/// assert_eq!(fewest_toggles(&spec), Ok(Some(2)));
/// ```
pub fn fewest_toggles(spec: &MachineSpec) -> Result<Option<usize>, String> {
    let n = spec.lights.len();
    if n > MAX_LIGHTS {
        return Err(format!("{n} lights exceed the supported {MAX_LIGHTS}"));
    }

    let target = to_mask(spec.lights.iter().copied());
    let mut toggles = Vec::with_capacity(spec.buttons.len());
    for (b, button) in spec.buttons.iter().enumerate() {
        let mut mask = 0u32;
        for acc in button.accumulators() {
            if acc >= n {
                return Err(format!("button {b} toggles light {acc} but only {n} exist"));
            }
            mask ^= 1 << acc;
        }
        toggles.push(mask);
    }

    if target == 0 {
        return Ok(Some(0));
    }

    let mut presses: Vec<Option<usize>> = vec![None; 1 << n];
    presses[0] = Some(0);
    let mut queue = VecDeque::from([0u32]);

    while let Some(state) = queue.pop_front() {
        let depth = presses[state as usize].unwrap_or(0);
        for &mask in &toggles {
            let next = state ^ mask;
            if presses[next as usize].is_none() {
                presses[next as usize] = Some(depth + 1);
                if next == target {
                    return Ok(Some(depth + 1));
                }
                queue.push_back(next);
            }
        }
    }

    Ok(None)
}

fn to_mask(lights: impl Iterator<Item = bool>) -> u32 {
    lights
        .enumerate()
        .filter(|&(_, on)| on)
        .fold(0, |mask, (i, _)| mask | 1 << i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{parse_line, Button};

    #[test]
    fn test_sample_machines() {
        let cases = [
            ("[.##.] (3) (1,3) (2) (2,3) (0,2) (0,1) {3,5,4,7}", 2),
            ("[...#.] (0,2,3,4) (2,3) (0,4) (0,1,2) (1,2,3,4) {7,5,12,7,2}", 3),
            ("[.###.#] (0,1,2,3,4) (0,3,4) (0,1,2,4,5) (1,2) {10,11,11,5,10,5}", 2),
        ];
        for (line, expected) in cases {
            let spec = parse_line(line).unwrap();
            assert_eq!(fewest_toggles(&spec), Ok(Some(expected)), "{line}");
        }
    }

    #[test]
    fn test_all_off_needs_no_presses() {
        let spec = MachineSpec::new(vec![], vec![Button::unit([0])]).with_lights(vec![false]);
        assert_eq!(fewest_toggles(&spec), Ok(Some(0)));
    }

    #[test]
    fn test_unreachable_pattern() {
        // the only button flips both lights together
        let spec =
            MachineSpec::new(vec![], vec![Button::unit([0, 1])]).with_lights(vec![true, false]);
        assert_eq!(fewest_toggles(&spec), Ok(None));
    }

    #[test]
    fn test_too_many_lights() {
        let spec = MachineSpec::new(vec![], vec![]).with_lights(vec![true; MAX_LIGHTS + 1]);
        assert!(fewest_toggles(&spec).is_err());
    }

    #[test]
    fn test_button_outside_pattern() {
        let spec = MachineSpec::new(vec![], vec![Button::unit([3])]).with_lights(vec![true]);
        assert!(fewest_toggles(&spec).is_err());
    }
}

//! Seeded random machines with a planted solution.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::types::{Button, MachineSpec};

/// Shape of generated machines.
///
/// # Examples
///
/// ```
/// use u_cpsearch::machine::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_counters(4)
///     .with_buttons(6)
///     .with_max_presses(5);
/// let generated = config.generate(7).unwrap();
/// assert_eq!(generated.spec.targets.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of accumulators.
    pub counters: usize,
    /// Number of buttons.
    pub buttons: usize,
    /// Largest planted press count per button.
    pub max_presses: i64,
    /// Largest per-press amount. 1 gives the unit puzzle format.
    pub max_amount: i64,
    /// Probability that a button is wired to a given accumulator.
    pub wiring_density: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            counters: 5,
            buttons: 7,
            max_presses: 10,
            max_amount: 1,
            wiring_density: 0.4,
        }
    }
}

/// A generated machine and the press counts used to derive its targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMachine {
    pub spec: MachineSpec,
    /// Presses per button; a feasible assignment by construction.
    pub planted: Vec<i64>,
}

impl GeneratedMachine {
    /// Total of the planted presses, an upper bound on the optimum.
    pub fn planted_cost(&self) -> i64 {
        self.planted.iter().sum()
    }
}

impl GeneratorConfig {
    pub fn with_counters(mut self, n: usize) -> Self {
        self.counters = n;
        self
    }

    pub fn with_buttons(mut self, n: usize) -> Self {
        self.buttons = n;
        self
    }

    pub fn with_max_presses(mut self, n: i64) -> Self {
        self.max_presses = n;
        self
    }

    pub fn with_max_amount(mut self, n: i64) -> Self {
        self.max_amount = n;
        self
    }

    pub fn with_wiring_density(mut self, p: f64) -> Self {
        self.wiring_density = p;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.counters == 0 {
            return Err("counters must be at least 1".into());
        }
        if self.buttons == 0 {
            return Err("buttons must be at least 1".into());
        }
        if self.max_presses < 0 {
            return Err(format!(
                "max_presses must be non-negative, got {}",
                self.max_presses
            ));
        }
        if self.max_amount < 1 {
            return Err(format!("max_amount must be positive, got {}", self.max_amount));
        }
        if !(0.0..=1.0).contains(&self.wiring_density) {
            return Err(format!(
                "wiring_density must be in [0, 1], got {}",
                self.wiring_density
            ));
        }
        Ok(())
    }

    /// Generates one machine from `seed`.
    pub fn generate(&self, seed: u64) -> Result<GeneratedMachine, String> {
        self.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(self.generate_with(&mut rng))
    }

    /// Generates one machine from an existing random source.
    ///
    /// Every button touches at least one accumulator.
    ///
    /// # Panics
    ///
    /// Panics if the configuration does not pass [`validate`](Self::validate).
    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> GeneratedMachine {
        let mut targets = vec![0i64; self.counters];
        let mut buttons = Vec::with_capacity(self.buttons);
        let mut planted = Vec::with_capacity(self.buttons);

        for _ in 0..self.buttons {
            let mut wiring: Vec<usize> = (0..self.counters)
                .filter(|_| rng.random_bool(self.wiring_density))
                .collect();
            if wiring.is_empty() {
                wiring.push(rng.random_range(0..self.counters));
            }

            let presses = rng.random_range(0..=self.max_presses);
            let button = Button::weighted(
                wiring
                    .into_iter()
                    .map(|acc| (acc, rng.random_range(1..=self.max_amount))),
            );
            for effect in &button.effects {
                targets[effect.accumulator] += effect.amount * presses;
            }

            buttons.push(button);
            planted.push(presses);
        }

        GeneratedMachine {
            spec: MachineSpec::new(targets, buttons),
            planted,
        }
    }
}

//! Machine specifications handed to the solver.

/// What one press of a button adds to one accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effect {
    /// Index of the accumulator.
    pub accumulator: usize,
    /// Amount added per press. Must be positive.
    pub amount: i64,
}

/// A button wired to one or more accumulators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Button {
    /// Per-accumulator effects of one press.
    pub effects: Vec<Effect>,
}

impl Button {
    /// A button adding one to each listed accumulator.
    pub fn unit(accumulators: impl IntoIterator<Item = usize>) -> Self {
        Self {
            effects: accumulators
                .into_iter()
                .map(|accumulator| Effect {
                    accumulator,
                    amount: 1,
                })
                .collect(),
        }
    }

    /// A button adding a given amount to each listed accumulator.
    pub fn weighted(effects: impl IntoIterator<Item = (usize, i64)>) -> Self {
        Self {
            effects: effects
                .into_iter()
                .map(|(accumulator, amount)| Effect {
                    accumulator,
                    amount,
                })
                .collect(),
        }
    }

    /// Indices of the accumulators this button touches.
    pub fn accumulators(&self) -> impl Iterator<Item = usize> + '_ {
        self.effects.iter().map(|e| e.accumulator)
    }
}

/// One machine: accumulator targets, buttons, and an optional indicator
/// light pattern.
///
/// # Examples
///
/// ```
/// use u_cpsearch::machine::{Button, MachineSpec};
///
/// let spec = MachineSpec::new(vec![3, 5], vec![Button::unit([0]), Button::unit([0, 1])]);
/// assert!(spec.validate().is_ok());
/// assert_eq!(spec.target_sum(), 8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineSpec {
    /// Indicator pattern; `true` means the light must end up on.
    pub lights: Vec<bool>,
    /// Target value per accumulator.
    pub targets: Vec<i64>,
    /// Available buttons.
    pub buttons: Vec<Button>,
}

impl MachineSpec {
    /// Creates a machine without an indicator pattern.
    pub fn new(targets: Vec<i64>, buttons: Vec<Button>) -> Self {
        Self {
            lights: Vec::new(),
            targets,
            buttons,
        }
    }

    /// Sets the indicator pattern.
    pub fn with_lights(mut self, lights: Vec<bool>) -> Self {
        self.lights = lights;
        self
    }

    /// Sum of all targets. Only meaningful once [`validate`](Self::validate)
    /// has accepted the spec.
    pub fn target_sum(&self) -> i64 {
        self.targets.iter().sum()
    }

    /// Validates targets and wiring.
    ///
    /// Also rejects machines whose totals would not fit the solver's `i64`
    /// arithmetic: `(buttons + 1) · (Σ targets + 1)` and every button's
    /// summed amounts must be representable.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.targets.iter().find(|&&t| t < 0) {
            return Err(format!("targets must be non-negative, got {t}"));
        }
        for (b, button) in self.buttons.iter().enumerate() {
            for effect in &button.effects {
                if effect.accumulator >= self.targets.len() {
                    return Err(format!(
                        "button {b} references accumulator {} but only {} exist",
                        effect.accumulator,
                        self.targets.len()
                    ));
                }
                if effect.amount <= 0 {
                    return Err(format!("button {b} has non-positive amount {}", effect.amount));
                }
            }
            let mut amounts = button.effects.iter().map(|e| e.amount);
            if amounts.try_fold(0i64, i64::checked_add).is_none() {
                return Err(format!("button {b} amounts overflow"));
            }
        }

        let capacity = self
            .targets
            .iter()
            .try_fold(1i64, |acc, &t| acc.checked_add(t))
            .and_then(|sum| {
                let factor = i64::try_from(self.buttons.len()).ok()?.checked_add(1)?;
                sum.checked_mul(factor)
            });
        if capacity.is_none() {
            return Err("targets are too large to search without overflow".into());
        }
        Ok(())
    }
}

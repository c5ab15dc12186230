//! CP variable types.

/// A press-count variable with an inclusive domain `[min, max]`.
///
/// Bounds only ever shrink once the variable is part of a problem:
/// `min` never decreases and `max` never increases. A domain with
/// `max < min` is empty and marks the owning problem as unviable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Variable {
    /// Lower bound.
    pub min: i64,
    /// Upper bound.
    pub max: i64,
    /// Number of constraints referencing this variable.
    pub degree: usize,
}

impl Variable {
    /// Creates a variable with the given bounds and degree.
    pub fn new(min: i64, max: i64, degree: usize) -> Self {
        Self { min, max, degree }
    }

    /// Creates a variable fixed to a single value.
    pub fn fixed(value: i64, degree: usize) -> Self {
        Self {
            min: value,
            max: value,
            degree,
        }
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// The fixed value, if any.
    pub fn value(&self) -> Option<i64> {
        self.is_fixed().then_some(self.min)
    }

    /// Whether the domain is empty.
    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    /// Domain width (max - min).
    pub fn width(&self) -> i64 {
        self.max - self.min
    }

    /// Domain size (max - min + 1). Zero or negative when empty.
    pub fn domain_size(&self) -> i64 {
        self.width() + 1
    }

    /// Collapses the domain to `value`.
    pub fn fix(&mut self, value: i64) {
        self.min = value;
        self.max = value;
    }

    /// Lowers `max` to `bound`. Returns `true` if the domain shrank.
    pub fn tighten_max(&mut self, bound: i64) -> bool {
        if bound < self.max {
            self.max = bound;
            true
        } else {
            false
        }
    }

    /// Raises `min` to `bound`. Returns `true` if the domain shrank.
    pub fn tighten_min(&mut self, bound: i64) -> bool {
        if bound > self.min {
            self.min = bound;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable() {
        let v = Variable::new(0, 10, 2);
        assert_eq!(v.domain_size(), 11);
        assert_eq!(v.width(), 10);
        assert!(!v.is_fixed());
        assert_eq!(v.value(), None);

        let f = Variable::fixed(5, 1);
        assert!(f.is_fixed());
        assert_eq!(f.domain_size(), 1);
        assert_eq!(f.value(), Some(5));
    }

    #[test]
    fn test_tighten_only_shrinks() {
        let mut v = Variable::new(2, 8, 1);
        assert!(!v.tighten_max(9));
        assert!(!v.tighten_min(1));
        assert_eq!((v.min, v.max), (2, 8));

        assert!(v.tighten_max(6));
        assert!(v.tighten_min(3));
        assert_eq!((v.min, v.max), (3, 6));
    }

    #[test]
    fn test_empty_domain() {
        let mut v = Variable::new(4, 6, 1);
        v.tighten_max(3);
        assert!(v.is_empty());
        assert!(v.domain_size() <= 0);
    }

    #[test]
    fn test_fix() {
        let mut v = Variable::new(0, 7, 3);
        v.fix(4);
        assert_eq!(v.value(), Some(4));
        assert_eq!(v.degree, 3);
    }
}

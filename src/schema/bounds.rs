//! Box bounds on the decision variables.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// A bound as supplied by the caller: one value for every variable, or one per variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Scalar(f64),
    PerVariable(Vec<f64>),
}

impl Bound {
    /// Broadcast to exactly `n_var` entries.
    fn resolve(&self, which: &'static str, n_var: usize) -> Result<Vec<f64>, ConfigError> {
        match self {
            Bound::Scalar(value) => Ok(vec![*value; n_var]),
            Bound::PerVariable(values) if values.len() == n_var => Ok(values.clone()),
            Bound::PerVariable(values) => Err(ConfigError::BoundLength {
                which,
                expected: n_var,
                found: values.len(),
            }),
        }
    }
}

impl From<f64> for Bound {
    fn from(value: f64) -> Self {
        Bound::Scalar(value)
    }
}

impl From<Vec<f64>> for Bound {
    fn from(values: Vec<f64>) -> Self {
        Bound::PerVariable(values)
    }
}

impl From<&[f64]> for Bound {
    fn from(values: &[f64]) -> Self {
        Bound::PerVariable(values.to_vec())
    }
}

/// Per-variable lower and upper bounds with `lower[i] <= upper[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Normalize caller-supplied bounds for `n_var` variables.
    pub fn resolve(n_var: usize, lower: &Bound, upper: &Bound) -> Result<Self, ConfigError> {
        if n_var == 0 {
            return Err(ConfigError::InvalidVariableCount);
        }
        let lower = lower.resolve("lower", n_var)?;
        let upper = upper.resolve("upper", n_var)?;

        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(ConfigError::NonFiniteBound { index });
            }
            if lo > hi {
                return Err(ConfigError::InvertedBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }

        Ok(Self { lower, upper })
    }

    /// Number of variables.
    #[inline]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    #[inline]
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Clamp `value` into the range of variable `index`.
    #[inline]
    pub fn clamp(&self, index: usize, value: f64) -> f64 {
        value.clamp(self.lower[index], self.upper[index])
    }

    /// Whether every entry of `values` lies inside its range.
    pub fn contains(&self, values: &[f64]) -> bool {
        values.len() == self.len()
            && values
                .iter()
                .enumerate()
                .all(|(i, v)| (self.lower[i]..=self.upper[i]).contains(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_broadcast() {
        let bounds = Bounds::resolve(3, &Bound::from(-1.0), &Bound::from(2.0)).unwrap();
        assert_eq!(bounds.lower(), &[-1.0, -1.0, -1.0]);
        assert_eq!(bounds.upper(), &[2.0, 2.0, 2.0]);
        assert_eq!(bounds.len(), 3);
    }

    #[test]
    fn test_mixed_bounds() {
        let bounds = Bounds::resolve(2, &0.0.into(), &vec![1.0, 5.0].into()).unwrap();
        assert_eq!(bounds.upper(), &[1.0, 5.0]);
        assert!(bounds.contains(&[0.5, 4.0]));
        assert!(!bounds.contains(&[0.5, 6.0]));
        assert!(!bounds.contains(&[0.5]));
        assert_eq!(bounds.clamp(1, 7.0), 5.0);
    }

    #[test]
    fn test_length_mismatch() {
        let err = Bounds::resolve(3, &vec![0.0, 0.0].into(), &1.0.into()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::BoundLength {
                which: "lower",
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn test_inverted_and_non_finite() {
        let err = Bounds::resolve(2, &vec![0.0, 2.0].into(), &1.0.into()).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvertedBounds {
                index: 1,
                lower: 2.0,
                upper: 1.0
            }
        );

        let err = Bounds::resolve(1, &f64::NAN.into(), &1.0.into()).unwrap_err();
        assert_eq!(err, ConfigError::NonFiniteBound { index: 0 });
    }

    #[test]
    fn test_degenerate_range_allowed() {
        let bounds = Bounds::resolve(1, &0.5.into(), &0.5.into()).unwrap();
        assert!(bounds.contains(&[0.5]));
    }
}

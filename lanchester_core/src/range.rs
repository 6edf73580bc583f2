//! Dimension ranges: the `(low, high, step)` triples of a scenario template.

use crate::error::{LanchesterError, Result};
use lanchester_env::RandomSource;
use serde::Deserialize;

/// Tolerance, in steps, applied when counting real-valued sequences so that
/// `(1.0 - 0.1) / 0.1` counts as nine whole steps.
const STEP_TOLERANCE: f64 = 1e-9;

/// Generated real values are rounded to this many decimal places.
const SNAP_SCALE: f64 = 1e12;

/// A scalar that can be swept and sampled.
pub trait RangeValue: Copy + PartialOrd + std::fmt::Debug {
    fn is_zero(self) -> bool;

    fn is_negative(self) -> bool;

    fn is_finite(self) -> bool {
        true
    }

    /// Whole steps from `low` to `high`. Only called with `step > 0` and
    /// `high >= low`; saturates at `u64::MAX`.
    fn whole_steps(low: Self, high: Self, step: Self) -> u64;

    /// `low + index * step`.
    fn nth(low: Self, step: Self, index: u64) -> Self;

    /// Uniform draw between `low` and `high`.
    fn sample<R: RandomSource + ?Sized>(low: Self, high: Self, rng: &mut R) -> Result<Self>;
}

impl RangeValue for u32 {
    fn is_zero(self) -> bool {
        self == 0
    }

    fn is_negative(self) -> bool {
        false
    }

    fn whole_steps(low: Self, high: Self, step: Self) -> u64 {
        u64::from(high.saturating_sub(low) / step)
    }

    fn nth(low: Self, step: Self, index: u64) -> Self {
        (u64::from(low) + u64::from(step) * index) as u32
    }

    /// Inclusive of both endpoints.
    fn sample<R: RandomSource + ?Sized>(low: Self, high: Self, rng: &mut R) -> Result<Self> {
        let v = rng.int_inclusive(u64::from(low), u64::from(high))?;
        Ok(v as u32)
    }
}

impl RangeValue for f64 {
    fn is_zero(self) -> bool {
        self == 0.0
    }

    fn is_negative(self) -> bool {
        self < 0.0
    }

    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }

    fn whole_steps(low: Self, high: Self, step: Self) -> u64 {
        // `as` saturates, which the checked count turns into an overflow error
        ((high - low) / step + STEP_TOLERANCE).floor() as u64
    }

    fn nth(low: Self, step: Self, index: u64) -> Self {
        let v = low + step * index as f64;
        (v * SNAP_SCALE).round() / SNAP_SCALE
    }

    /// Half-open `[low, high)`.
    fn sample<R: RandomSource + ?Sized>(low: Self, high: Self, rng: &mut R) -> Result<Self> {
        Ok(rng.real(low, high)?)
    }
}

/// A `(low, high, step)` triple.
///
/// `step == 0` pins the dimension at `low`; otherwise it spans the inclusive
/// sequence `low, low + step, ..., <= high`. Deserializes from a three-element
/// JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "[T; 3]")]
pub struct DimensionRange<T> {
    pub low: T,
    pub high: T,
    pub step: T,
}

impl<T> From<[T; 3]> for DimensionRange<T> {
    fn from([low, high, step]: [T; 3]) -> Self {
        Self { low, high, step }
    }
}

impl<T: RangeValue> DimensionRange<T> {
    pub fn new(low: T, high: T, step: T) -> Self {
        Self { low, high, step }
    }

    /// Returns true when the dimension is pinned at `low`.
    pub fn is_fixed(&self) -> bool {
        self.step.is_zero()
    }

    /// Checks the triple is well formed.
    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.low.is_finite() || !self.high.is_finite() || !self.step.is_finite() {
            return Err(LanchesterError::config(format!("{}: values must be finite", name)));
        }
        if self.step.is_negative() {
            return Err(LanchesterError::config(format!(
                "{}: step {:?} is negative",
                name, self.step
            )));
        }
        if !self.is_fixed() && self.high < self.low {
            return Err(LanchesterError::config(format!(
                "{}: high {:?} is below low {:?}",
                name, self.high, self.low
            )));
        }
        Ok(())
    }

    /// Number of values: `floor((high - low) / step) + 1`, or 1 when fixed.
    pub fn count(&self) -> Result<u64> {
        if self.is_fixed() {
            return Ok(1);
        }
        T::whole_steps(self.low, self.high, self.step)
            .checked_add(1)
            .ok_or(LanchesterError::SweepTooLarge)
    }

    /// The `index`-th value of the sequence, never above `high`.
    pub fn value_at(&self, index: u64) -> T {
        if self.is_fixed() {
            return self.low;
        }
        let v = T::nth(self.low, self.step, index);
        if v > self.high {
            self.high
        } else {
            v
        }
    }

    /// The full expanded sequence.
    pub fn values(&self) -> Result<Vec<T>> {
        let count = self.count()?;
        Ok((0..count).map(|i| self.value_at(i)).collect())
    }

    /// Uniform draw over `[low, high]` (integers) or `[low, high)` (reals).
    /// The step is ignored; a pinned range with `high < low` yields `low`.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Result<T> {
        if self.high < self.low {
            return Ok(self.low);
        }
        T::sample(self.low, self.high, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lanchester_env::SeededSource;
    use proptest::prelude::*;

    #[test]
    fn test_integer_expansion_matches_formula() {
        let range = DimensionRange::new(2u32, 10, 2);
        assert_eq!(range.values().unwrap(), vec![2, 4, 6, 8, 10]);
        assert_eq!(range.count().unwrap(), (10 - 2) / 2 + 1);
    }

    #[test]
    fn test_partial_last_step_is_dropped() {
        let range = DimensionRange::new(1u32, 10, 4);
        assert_eq!(range.values().unwrap(), vec![1, 5, 9]);
        assert_eq!(range.count().unwrap(), 3);
    }

    #[test]
    fn test_zero_step_is_fixed_at_low() {
        let range = DimensionRange::new(7u32, 100, 0);
        assert_eq!(range.values().unwrap(), vec![7]);
        assert_eq!(range.count().unwrap(), 1);
    }

    #[test]
    fn test_real_expansion_tolerates_rounding() {
        let range = DimensionRange::new(0.1f64, 1.0, 0.1);
        let values = range.values().unwrap();
        assert_eq!(values.len(), 10);
        assert_eq!(range.count().unwrap(), 10);
        assert_relative_eq!(values[2], 0.3);
        assert_relative_eq!(values[9], 1.0);
    }

    #[test]
    fn test_real_expansion_never_exceeds_high() {
        let range = DimensionRange::new(0.0f64, 1.0, 0.33333333334);
        let values = range.values().unwrap();
        assert_eq!(values.len(), 4);
        assert_relative_eq!(values[1], 0.33333333334);
        assert_relative_eq!(values[2], 0.66666666668);
        assert_eq!(values[3], 1.0);
        assert!(values.iter().all(|v| *v <= range.high));
    }

    #[test]
    fn test_validation() {
        assert!(DimensionRange::new(5u32, 1, 1).validate("redSize").is_err());
        assert!(DimensionRange::new(0.5f64, 0.1, -0.1).validate("redShotProb").is_err());
        assert!(DimensionRange::new(0.5f64, f64::NAN, 0.1).validate("redShotProb").is_err());
        // high below low is fine while the dimension is pinned
        assert!(DimensionRange::new(5u32, 1, 0).validate("redSize").is_ok());
    }

    #[test]
    fn test_huge_real_sweep_overflows() {
        let range = DimensionRange::new(0.0f64, 1.0, 1e-300);
        assert!(matches!(range.count(), Err(LanchesterError::SweepTooLarge)));
    }

    #[test]
    fn test_deserializes_from_triple() {
        let range: DimensionRange<u32> = serde_json::from_str("[2, 10, 2]").unwrap();
        assert_eq!(range, DimensionRange::new(2, 10, 2));
    }

    #[test]
    fn test_integer_sampling_is_inclusive() {
        let range = DimensionRange::new(5u32, 10, 3);
        let mut rng = SeededSource::new(42);
        let mut seen = [false; 6];
        for _ in 0..5000 {
            let v = range.sample(&mut rng).unwrap();
            assert!((5..=10).contains(&v));
            seen[(v - 5) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    proptest! {
        #[test]
        fn prop_integer_count_matches_length(low in 0u32..200, width in 0u32..200, step in 1u32..20) {
            let range = DimensionRange::new(low, low + width, step);
            let values = range.values().unwrap();
            prop_assert_eq!(values.len() as u64, range.count().unwrap());
            prop_assert!(values.iter().all(|v| *v >= low && *v <= low + width));
            prop_assert_eq!(values[0], low);
        }

        #[test]
        fn prop_real_count_matches_length(low in 0.0f64..1.0, steps in 0u32..40, step in 0.01f64..0.5) {
            let high = low + step * f64::from(steps);
            let range = DimensionRange::new(low, high, step);
            let values = range.values().unwrap();
            prop_assert_eq!(values.len() as u64, range.count().unwrap());
            prop_assert_eq!(values.len() as u32, steps + 1);
        }
    }
}

//! Common

use num_traits::Num;
use std::ops::Neg;

/// Use 64-bit precision for floating point numbers. The fitted tables are
/// compared against reference data with sums of squares well below `f32`
/// resolution.
pub type Float = f64;

/// PI (π)
pub const PI: Float = std::f64::consts::PI;

/// 1/PI (1/π)
pub const INV_PI: Float = 1.0 / PI;

/// PI/2 (π/2)
pub const PI_OVER_TWO: Float = PI * 0.5;

/// Returns the absolute value of a number.
///
/// * `n` - The number.
#[inline(always)]
pub fn abs<T>(n: T) -> T
where
    T: Num + Neg<Output = T> + PartialOrd + Copy,
{
    if n < T::zero() {
        -n
    } else {
        n
    }
}

/// Returns the maximum of 2 numbers.
///
/// * `a` - First number.
/// * `b` - Second number.
#[inline(always)]
pub fn max<T>(a: T, b: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if a > b {
        a
    } else {
        b
    }
}

/// Returns `n` evenly spaced values over the closed interval `[start, end]`.
/// A single value yields `[start]`.
///
/// * `start` - First value.
/// * `end`   - Last value.
/// * `n`     - Number of values.
pub fn linspace(start: Float, end: Float, n: usize) -> Vec<Float> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Float;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as Float })
                .collect()
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn max_abs() {
        assert_eq!(max(1, 2), 2);
        assert_eq!(max(0.01, 0.0), 0.01);
        assert_eq!(abs(-3.5), 3.5);
    }

    #[test]
    fn linspace_includes_both_ends() {
        let v = linspace(0.0, 1.0, 5);
        assert_eq!(v, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn linspace_last_value_is_exact() {
        let v = linspace(0.0, 1.0, 32);
        assert_eq!(v.len(), 32);
        assert_eq!(v[31], 1.0);
        assert!(approx_eq!(Float, v[1], 1.0 / 31.0, epsilon = 1e-15));
    }
}

//! Clamp

use num_traits::Num;

/// Clamps a value to the closed interval `[min, max]`.
///
/// * `x`   - The value to clamp.
/// * `min` - Lower bound.
/// * `max` - Upper bound.
#[inline(always)]
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Common geometry helpers

use super::*;

/// Dot product.
pub trait Dot<T> {
    /// Output type.
    type Output;

    /// Returns the dot product.
    ///
    /// * `other` - The other value.
    fn dot(&self, other: &T) -> Self::Output;
}

/// Returns the direction given by the spherical coordinates (θ, φ) where θ is
/// measured from the z-axis and φ from the x-axis in the xy-plane.
///
/// * `theta` - Polar angle θ in radians.
/// * `phi`   - Azimuthal angle φ in radians.
#[inline]
pub fn spherical_direction(theta: Float, phi: Float) -> Vector3f {
    let sin_theta = theta.sin();
    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), theta.cos())
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

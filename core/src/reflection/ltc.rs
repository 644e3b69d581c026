//! Linearly Transformed Cosine

use super::*;

/// A clamped cosine distribution transformed by a 3x3 matrix `M`. The lobe is
/// stored through its inverse transform `M⁻¹` which maps a direction back to
/// the cosine distribution:
///
/// ```text
///                   max(0, ŵ.z)    |det M⁻¹|
/// D(w) = magnitude * ----------- * ----------    ŵ = M⁻¹ w / |M⁻¹ w|
///                       π          |M⁻¹ w|³
/// ```
///
/// The lobe lives in the incident-aligned frame, so the incident direction
/// given to `eval()` is ignored.
#[derive(Copy, Clone, Debug)]
pub struct LtcBrdf {
    /// Scale applied to the normalized lobe.
    magnitude: Float,

    /// Inverse transform `M⁻¹`.
    inv_m: Matrix3x3,

    /// |det M⁻¹|, the constant part of the Jacobian.
    det_inv_m: Float,
}

impl LtcBrdf {
    /// Create a new `LtcBrdf`.
    ///
    /// * `magnitude` - Scale applied to the normalized lobe.
    /// * `inv_m`     - Inverse transform `M⁻¹`.
    pub fn new(magnitude: Float, inv_m: Matrix3x3) -> Self {
        Self {
            magnitude,
            inv_m,
            det_inv_m: abs(inv_m.determinant()),
        }
    }

    /// Returns the magnitude.
    pub fn magnitude(&self) -> Float {
        self.magnitude
    }

    /// Returns the inverse transform.
    pub fn inverse_transform(&self) -> &Matrix3x3 {
        &self.inv_m
    }
}

impl Brdf for LtcBrdf {
    /// Returns the value of the lobe in direction `wo`.
    ///
    /// * `_wi` - Incident direction (unused).
    /// * `wo`  - Outgoing direction.
    fn eval(&self, _wi: &Vector3f, wo: &Vector3f) -> Float {
        let w = &self.inv_m * *wo;
        let length = w.length();
        if length == 0.0 {
            return 0.0;
        }

        let d = max(0.0, w.z / length) * INV_PI;
        let jacobian = self.det_inv_m / (length * length * length);
        self.magnitude * d * jacobian
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

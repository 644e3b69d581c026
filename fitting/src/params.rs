//! LTC fit parameters

use sheen_core::geometry::*;
use sheen_core::pbrt::*;
use sheen_core::reflection::LtcBrdf;

/// The three free coefficients of an isotropic LTC lobe fitted in the
/// incident-aligned frame. The inverse transform is always
///
/// ```text
///        | a  0  b |
/// M⁻¹ =  | 0  a  0 |
///        | 0  0  1 |
/// ```
///
/// and `r` scales the normalized lobe.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LtcParams {
    /// Diagonal entries (0, 0) and (1, 1) of `M⁻¹`.
    pub a: Float,

    /// Entry (0, 2) of `M⁻¹`.
    pub b: Float,

    /// Magnitude.
    pub r: Float,
}

impl LtcParams {
    /// Initial guess at the start of every table row: an untransformed cosine
    /// lobe with unit magnitude.
    pub const INITIAL: LtcParams = LtcParams {
        a: 1.0,
        b: 0.0,
        r: 1.0,
    };

    /// Create a new `LtcParams`.
    ///
    /// * `a` - Diagonal entries of `M⁻¹`.
    /// * `b` - Entry (0, 2) of `M⁻¹`.
    /// * `r` - Magnitude.
    pub fn new(a: Float, b: Float, r: Float) -> Self {
        Self { a, b, r }
    }

    /// Returns the structured inverse transform `M⁻¹`.
    #[rustfmt::skip]
    pub fn inverse_transform(&self) -> Matrix3x3 {
        matrix3x3(
            self.a, 0.0,    self.b,
            0.0,    self.a, 0.0,
            0.0,    0.0,    1.0,
        )
    }

    /// Recover the parameters from an inverse transform and magnitude. Only
    /// the structured entries are read.
    ///
    /// * `inv_m`     - Inverse transform.
    /// * `magnitude` - Magnitude.
    pub fn from_inverse_transform(inv_m: &Matrix3x3, magnitude: Float) -> Self {
        Self::new(inv_m.m[0][0], inv_m.m[0][2], magnitude)
    }

    /// Returns the LTC lobe described by these parameters.
    pub fn to_ltc(&self) -> LtcBrdf {
        LtcBrdf::new(self.r, self.inverse_transform())
    }

    /// Returns the parameters as an array `[a, b, r]`.
    pub fn to_array(&self) -> [Float; 3] {
        [self.a, self.b, self.r]
    }
}

impl From<[Float; 3]> for LtcParams {
    /// Create `LtcParams` from an array `[a, b, r]`.
    ///
    /// * `p` - The array.
    fn from(p: [Float; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

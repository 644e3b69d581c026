//! 3x3 Matrix

use super::{Dot, Float, Vector3f};
use std::ops::{Add, Mul};

/// A 3x3 matrix containing Float values, stored row-major.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3x3 {
    /// Stores a 2-D array of Float
    pub m: [[Float; 3]; 3],
}

/// Zero matrix.
pub const ZERO_MATRIX3: Matrix3x3 = Matrix3x3 { m: [[0.0; 3]; 3] };

/// Identity matrix.
pub const IDENTITY_MATRIX3: Matrix3x3 = Matrix3x3 {
    m: [
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ],
};

/// Create a 3x3 matrix using the following order of the parameters:
///
/// * `t00`, `t01`, `t02` - Row 1
/// * `t10`, `t11`, `t12` - Row 2
/// * `t20`, `t21`, `t22` - Row 3
#[rustfmt::skip]
pub fn matrix3x3(
    t00: Float, t01: Float, t02: Float,
    t10: Float, t11: Float, t12: Float,
    t20: Float, t21: Float, t22: Float,
) -> Matrix3x3 {
    Matrix3x3 {
        m: [
            [t00, t01, t02],
            [t10, t11, t12],
            [t20, t21, t22],
        ],
    }
}

#[rustfmt::skip]
impl Matrix3x3 {
    /// Returns the outer product `u vᵀ`.
    ///
    /// * `u` - Column vector.
    /// * `v` - Row vector.
    pub fn outer(u: &Vector3f, v: &Vector3f) -> Matrix3x3 {
        matrix3x3(
            u.x * v.x, u.x * v.y, u.x * v.z,
            u.y * v.x, u.y * v.y, u.y * v.z,
            u.z * v.x, u.z * v.y, u.z * v.z,
        )
    }

    /// Returns the determinant.
    pub fn determinant(&self) -> Float {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns the inverse of the matrix computed from its adjugate, or `None`
    /// if the matrix is singular.
    pub fn inverse(&self) -> Option<Matrix3x3> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let m = &self.m;
        let inv_det = 1.0 / det;
        Some(matrix3x3(
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
        ))
    }

    /// Returns the row `i` as a vector.
    ///
    /// * `i` - Row index.
    pub fn row(&self, i: usize) -> Vector3f {
        Vector3f::new(self.m[i][0], self.m[i][1], self.m[i][2])
    }
}

impl Add for Matrix3x3 {
    type Output = Matrix3x3;

    /// Component-wise sum of two matrices.
    ///
    /// * `other` - The other matrix.
    fn add(self, other: Matrix3x3) -> Matrix3x3 {
        let mut r = ZERO_MATRIX3;
        for i in 0..3 {
            for j in 0..3 {
                r.m[i][j] = self.m[i][j] + other.m[i][j];
            }
        }
        r
    }
}

impl Mul<Float> for Matrix3x3 {
    type Output = Matrix3x3;

    /// Scale all entries.
    ///
    /// * `f` - The scaling factor.
    fn mul(self, f: Float) -> Matrix3x3 {
        let mut r = self;
        for row in r.m.iter_mut() {
            for v in row.iter_mut() {
                *v *= f;
            }
        }
        r
    }
}

impl Mul<Matrix3x3> for Matrix3x3 {
    type Output = Matrix3x3;

    /// Post-multiply the given matrix.
    ///
    /// * `m2` - The matrix to multiply with.
    fn mul(self, m2: Matrix3x3) -> Matrix3x3 {
        let mut r = ZERO_MATRIX3;
        for i in 0..3 {
            for j in 0..3 {
                r.m[i][j] =
                    self.m[i][0] * m2.m[0][j] + self.m[i][1] * m2.m[1][j] + self.m[i][2] * m2.m[2][j];
            }
        }
        r
    }
}

impl Mul<Vector3f> for &Matrix3x3 {
    type Output = Vector3f;

    /// Transform a column vector.
    ///
    /// * `v` - The vector.
    fn mul(self, v: Vector3f) -> Vector3f {
        Vector3f::new(self.row(0).dot(&v), self.row(1).dot(&v), self.row(2).dot(&v))
    }
}

impl Mul<Vector3f> for Matrix3x3 {
    type Output = Vector3f;

    /// Transform a column vector.
    ///
    /// * `v` - The vector.
    fn mul(self, v: Vector3f) -> Vector3f {
        &self * v
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn identity_leaves_vector_unchanged() {
        let v = Vector3f::new(1.0, -2.0, 3.0);
        assert_eq!(IDENTITY_MATRIX3 * v, v);
        assert_eq!(IDENTITY_MATRIX3.determinant(), 1.0);
    }

    #[test]
    fn zero_matrix_is_singular() {
        assert_eq!(ZERO_MATRIX3.determinant(), 0.0);
        assert!(ZERO_MATRIX3.inverse().is_none());
    }

    #[test]
    fn inverse_returns_identity_when_matrix_is_identity() {
        assert_eq!(IDENTITY_MATRIX3.inverse(), Some(IDENTITY_MATRIX3));
    }

    #[test]
    fn outer_product_of_axis_is_projector() {
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let p = Matrix3x3::outer(&z, &z);
        assert_eq!(p * Vector3f::new(4.0, 5.0, 6.0), Vector3f::new(0.0, 0.0, 6.0));
    }

    proptest! {
        #[test]
        fn determinant_is_multiplicative(
            a in -5.0..5.0f64, b in -5.0..5.0f64, c in -5.0..5.0f64,
            d in -5.0..5.0f64, e in -5.0..5.0f64, f in -5.0..5.0f64,
        ) {
            let m1 = matrix3x3(a, 0.0, b, 0.0, a, 0.0, c, 0.0, 1.0);
            let m2 = matrix3x3(d, e, 0.0, 0.0, f, 0.0, 0.0, 0.0, 1.0);
            prop_assert!(approx_eq!(
                Float,
                (m1 * m2).determinant(),
                m1.determinant() * m2.determinant(),
                epsilon = 1e-9
            ));
        }

        #[test]
        fn inverse_returns_matrix_when_matrix_is_non_singular(
            a in 0.1..10.0f64, b in -2.0..2.0f64, c in 0.1..10.0f64,
        ) {
            let mat = matrix3x3(a, 0.0, b, 0.0, c, 0.0, b, 0.0, a + 3.0);
            prop_assume!(mat.determinant().abs() > 1e-3);
            let inv = mat.inverse().unwrap();
            let prod = mat * inv;
            for i in 0..3 {
                for j in 0..3 {
                    prop_assert!(approx_eq!(
                        Float,
                        prod.m[i][j],
                        IDENTITY_MATRIX3.m[i][j],
                        epsilon = 1e-9
                    ));
                }
            }
        }
    }
}

//! SGGX Microflake Distribution

use super::*;

/// The SGGX microflake distribution is described by a symmetric positive
/// definite 3x3 matrix `S`. The projected area of the microflakes in direction
/// `w` is `σ(w) = sqrt(wᵀ S w)` and the distribution of normals is
///
/// ```text
///                        1
/// D(wm) = ---------------------------------
///          π sqrt(|S|) (wmᵀ S⁻¹ wm)²
/// ```
#[derive(Copy, Clone, Debug)]
pub struct SggxEllipsoid {
    /// The matrix `S`.
    s: Matrix3x3,

    /// Precomputed `S⁻¹`.
    s_inv: Matrix3x3,

    /// Precomputed sqrt(|S|).
    sqrt_det_s: Float,
}

impl SggxEllipsoid {
    /// Create a new `SggxEllipsoid` from its matrix. Returns an error if `S` is
    /// singular or not positive definite.
    ///
    /// * `s` - Symmetric positive definite matrix.
    pub fn new(s: Matrix3x3) -> Result<Self, String> {
        let det = s.determinant();
        let minor = s.m[0][0] * s.m[1][1] - s.m[0][1] * s.m[1][0];
        if det <= 0.0 || minor <= 0.0 || s.m[0][0] <= 0.0 {
            return Err(format!("SGGX matrix is not positive definite (det = {det})"));
        }
        let s_inv = s.inverse().ok_or_else(|| "SGGX matrix is singular".to_string())?;
        Ok(Self {
            s,
            s_inv,
            sqrt_det_s: det.sqrt(),
        })
    }

    /// Create the distribution of a surface-like (non-fiber) medium, where the
    /// flakes are oriented around the normal `n`:
    ///
    /// `S = n nᵀ + σ (I - n nᵀ)`
    ///
    /// * `n`     - Mean flake normal.
    /// * `sigma` - Projected area in the tangent plane relative to the normal
    ///             direction; this plays the role of α² in GGX.
    pub fn surface_like(n: &Vector3f, sigma: Float) -> Result<Self, String> {
        let n = n.normalize();
        let nn = Matrix3x3::outer(&n, &n);
        let tangent = IDENTITY_MATRIX3 + nn * -1.0;
        Self::new(nn + tangent * sigma)
    }

    /// Returns the projected area `σ(w)` of the microflakes in direction `w`.
    ///
    /// * `w` - A unit direction.
    pub fn projected_area(&self, w: &Vector3f) -> Float {
        max(0.0, w.dot(&(&self.s * *w))).sqrt()
    }

    /// Returns the density of microflake normals `D(wm)`.
    ///
    /// * `wm` - A unit flake normal.
    pub fn d(&self, wm: &Vector3f) -> Float {
        let q = wm.dot(&(&self.s_inv * *wm));
        if q <= 0.0 {
            return 0.0;
        }
        1.0 / (PI * self.sqrt_det_s * q * q)
    }

    /// Evaluates the specular microflake phase function
    /// `p(wi, wo) = D(wh) / (4 σ(wi))` with `wh` the half vector.
    ///
    /// * `wi` - Incident direction.
    /// * `wo` - Outgoing direction.
    pub fn eval_phase_specular(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        let wh = *wi + *wo;
        if wh.length_squared() == 0.0 {
            return 0.0;
        }
        let sigma_wi = self.projected_area(wi);
        if sigma_wi == 0.0 {
            return 0.0;
        }
        self.d(&wh.normalize()) / (4.0 * sigma_wi)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    const N_THETA: usize = 200;
    const N_PHI: usize = 400;

    /// Midpoint rule over the full sphere.
    fn integrate_sphere<F: Fn(&Vector3f) -> Float>(f: F) -> Float {
        let d_theta = PI / N_THETA as Float;
        let d_phi = 2.0 * PI / N_PHI as Float;
        let mut sum = 0.0;
        for j in 0..N_THETA {
            let theta = (j as Float + 0.5) * d_theta;
            for i in 0..N_PHI {
                let phi = (i as Float + 0.5) * d_phi;
                sum += f(&spherical_direction(theta, phi)) * theta.sin();
            }
        }
        sum * d_theta * d_phi
    }

    #[test]
    fn rejects_singular_matrix() {
        assert!(SggxEllipsoid::new(ZERO_MATRIX3).is_err());
        assert!(SggxEllipsoid::surface_like(&Vector3f::new(0.0, 0.0, 1.0), 0.0).is_err());
    }

    #[test]
    fn surface_like_projected_areas() {
        let sggx = SggxEllipsoid::surface_like(&Vector3f::new(0.0, 0.0, 1.0), 0.25).unwrap();
        let z = Vector3f::new(0.0, 0.0, 1.0);
        let x = Vector3f::new(1.0, 0.0, 0.0);
        assert!(approx_eq!(Float, sggx.projected_area(&z), 1.0, epsilon = 1e-12));
        assert!(approx_eq!(Float, sggx.projected_area(&x), 0.5, epsilon = 1e-12));
    }

    #[test]
    fn projected_area_matches_clamped_normal_integral() {
        let sggx = SggxEllipsoid::surface_like(&Vector3f::new(0.0, 0.0, 1.0), 0.5).unwrap();
        for w in [
            Vector3f::new(0.0, 0.0, 1.0),
            spherical_direction(0.7, 0.3),
            spherical_direction(1.4, 2.0),
        ] {
            let integral = integrate_sphere(|wm| max(0.0, w.dot(wm)) * sggx.d(wm));
            assert!(
                approx_eq!(Float, integral, sggx.projected_area(&w), epsilon = 5e-3),
                "{integral} vs {}",
                sggx.projected_area(&w)
            );
        }
    }

    #[test]
    fn specular_phase_function_is_normalized() {
        let sggx = SggxEllipsoid::surface_like(&Vector3f::new(0.0, 0.0, 1.0), 0.5).unwrap();
        for wi in [spherical_direction(0.2, 0.0), spherical_direction(1.1, 0.0)] {
            let integral = integrate_sphere(|wo| sggx.eval_phase_specular(&wi, wo));
            assert!(approx_eq!(Float, integral, 1.0, epsilon = 1e-2), "{integral}");
        }
    }
}

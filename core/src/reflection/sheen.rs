//! Volumetric Sheen

use super::*;

/// Density of the sheen layer.
const DENSITY: Float = 1.0;

/// Thickness of the sheen layer.
const THICKNESS: Float = 1.0;

/// Single scattering albedo of the fibers.
const SS_ALBEDO: Float = 1.0;

/// Analytic single scattering BRDF of a thin layer of SGGX microflakes on top
/// of a black base. This is the reference lobe that the sheen LTC tables
/// approximate.
#[derive(Copy, Clone, Debug)]
pub struct SingleLayerSggx {
    /// Roughness α in (0, 1].
    alpha: Float,

    /// Surface-like flake distribution with σ = α².
    sggx: SggxEllipsoid,
}

impl SingleLayerSggx {
    /// Create a new `SingleLayerSggx`. Returns an error if the roughness lies
    /// outside (0, 1].
    ///
    /// * `alpha` - Roughness.
    pub fn new(alpha: Float) -> Result<Self, String> {
        if !(alpha > 0.0 && alpha <= 1.0) {
            return Err(format!("Sheen roughness {alpha} is outside (0, 1]"));
        }

        // Reparameterize alpha -> SGGX flake cross section.
        let sigma = alpha * alpha;
        let sggx = SggxEllipsoid::surface_like(&Vector3f::new(0.0, 0.0, 1.0), sigma)?;
        Ok(Self { alpha, sggx })
    }

    /// Returns the roughness.
    pub fn alpha(&self) -> Float {
        self.alpha
    }
}

impl Brdf for SingleLayerSggx {
    /// Returns the single scattered radiance of the layer, including the
    /// outgoing cosine.
    ///
    /// * `wi` - Incident direction.
    /// * `wo` - Outgoing direction.
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Float {
        let cos_theta_i = cos_theta(wi);
        let cos_theta_o = cos_theta(wo);
        if cos_theta_i <= 0.0 || cos_theta_o < 0.0 {
            return 0.0;
        }

        let sigma_wi = self.sggx.projected_area(wi);
        let lambda_wi = sigma_wi / cos_theta_i;
        let lambda_wo = self.sggx.projected_area(wo) / cos_theta_o;

        // Attenuation through the layer along both directions.
        let tmp0 = DENSITY * (lambda_wi + lambda_wo);
        let tmp1 = 1.0 - (-THICKNESS * tmp0).exp();
        let tmp = tmp1 / (abs_cos_theta(wi) * tmp0);

        let sigma_t_along_wi = DENSITY * sigma_wi;
        let phase = self.sggx.eval_phase_specular(wi, wo);

        let value = SS_ALBEDO * phase * sigma_t_along_wi * tmp;

        // λ grows without bound at grazing angles.
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_roughness_out_of_range() {
        assert!(SingleLayerSggx::new(0.0).is_err());
        assert!(SingleLayerSggx::new(-0.5).is_err());
        assert!(SingleLayerSggx::new(1.01).is_err());
        assert!(SingleLayerSggx::new(Float::NAN).is_err());
        assert!(SingleLayerSggx::new(1.0).is_ok());
        assert!(SingleLayerSggx::new(0.01).is_ok());
    }

    #[test]
    fn zero_below_horizon() {
        let brdf = SingleLayerSggx::new(0.5).unwrap();
        let up = Vector3f::new(0.0, 0.0, 1.0);
        let down = Vector3f::new(0.0, 0.6, -0.8);
        assert_eq!(brdf.eval(&down, &up), 0.0);
        assert_eq!(brdf.eval(&up, &down), 0.0);
    }

    #[test]
    fn grazing_outgoing_direction_is_finite() {
        let brdf = SingleLayerSggx::new(0.3).unwrap();
        let wi = spherical_direction(0.4, 0.0);
        let wo = Vector3f::new(1.0, 0.0, 0.0);
        assert!(brdf.eval(&wi, &wo).is_finite());
    }

    #[test]
    fn vectorized_matches_scalar() {
        let brdf = SingleLayerSggx::new(0.7).unwrap();
        let theta_o = [0.1, 0.5, 1.2];
        let phi_o = [0.3, 2.0, 3.0];
        let values = brdf.eval_vectorized(0.6, 0.0, &theta_o, &phi_o);
        let wi = spherical_direction(0.6, 0.0);
        for k in 0..3 {
            let wo = spherical_direction(theta_o[k], phi_o[k]);
            assert_eq!(values[k], brdf.eval(&wi, &wo));
        }
    }

    proptest! {
        #[test]
        fn value_is_non_negative_and_finite(
            alpha in 0.01..1.0f64,
            theta_i in 0.0..1.56f64,
            theta_o in 0.0..1.56f64,
            phi_o in 0.0..3.14f64,
        ) {
            let brdf = SingleLayerSggx::new(alpha).unwrap();
            let v = brdf.eval(&spherical_direction(theta_i, 0.0), &spherical_direction(theta_o, phi_o));
            prop_assert!(v.is_finite());
            prop_assert!(v >= 0.0);
        }
    }
}

//! Reference BRDF providers

use crate::directions::DirectionSamples;
use sheen_core::pbrt::*;
use sheen_core::reflection::*;

/// Produces the reference BRDF samples a table entry is fitted to.
///
/// Implementations must return samples in the incident-aligned frame (the
/// incident direction lies in the xz-plane with φ = 0), since the LTC lobe is
/// evaluated in that frame. Providers are shared by the row workers and must
/// not keep mutable state between calls.
pub trait ReferenceProvider: Sync {
    /// Returns the reference values for the outgoing directions.
    ///
    /// * `alpha`      - Roughness.
    /// * `theta_i`    - Polar angle of the incident direction.
    /// * `phi_i`      - Azimuthal angle of the incident direction.
    /// * `directions` - Outgoing directions.
    fn eval_reference(
        &self,
        alpha: Float,
        theta_i: Float,
        phi_i: Float,
        directions: &DirectionSamples,
    ) -> Result<Vec<Float>, String>;
}

/// Single scattering from a volumetric SGGX sheen layer.
#[derive(Copy, Clone, Debug, Default)]
pub struct SheenReference;

impl ReferenceProvider for SheenReference {
    fn eval_reference(
        &self,
        alpha: Float,
        theta_i: Float,
        phi_i: Float,
        directions: &DirectionSamples,
    ) -> Result<Vec<Float>, String> {
        let brdf = SingleLayerSggx::new(alpha)?;
        Ok(brdf.eval_vectorized(theta_i, phi_i, directions.theta_o(), directions.phi_o()))
    }
}

/// A reference that is itself an LTC lobe, independent of the incident
/// direction. Fitting it must reproduce the lobe, so it serves to check the
/// fitting machinery.
#[derive(Copy, Clone, Debug)]
pub struct LtcReference {
    /// The lobe.
    ltc: LtcBrdf,
}

impl LtcReference {
    /// Create a new `LtcReference`.
    ///
    /// * `ltc` - The lobe.
    pub fn new(ltc: LtcBrdf) -> Self {
        Self { ltc }
    }
}

impl ReferenceProvider for LtcReference {
    fn eval_reference(
        &self,
        _alpha: Float,
        _theta_i: Float,
        _phi_i: Float,
        directions: &DirectionSamples,
    ) -> Result<Vec<Float>, String> {
        Ok(self
            .ltc
            .eval_vectorized(0.0, 0.0, directions.theta_o(), directions.phi_o()))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

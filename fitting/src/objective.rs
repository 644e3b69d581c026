//! Fitting objective

use crate::directions::DirectionSamples;
use crate::params::LtcParams;
use sheen_core::pbrt::*;
use sheen_core::reflection::Brdf;

/// Returns the unnormalized sum of squared differences between the LTC lobe
/// described by `params` and the reference BRDF samples. The lobe is evaluated
/// in the incident-aligned frame so the incident angles are both 0; the
/// reference samples must be taken in the same frame.
///
/// * `params`     - LTC coefficients.
/// * `directions` - Outgoing directions.
/// * `reference`  - Reference BRDF values in the order of `directions`.
pub fn objective(params: &LtcParams, directions: &DirectionSamples, reference: &[Float]) -> Float {
    debug_assert_eq!(reference.len(), directions.len());

    params
        .to_ltc()
        .eval_vectorized(0.0, 0.0, directions.theta_o(), directions.phi_o())
        .iter()
        .zip(reference.iter())
        .map(|(ltc, r)| (ltc - r) * (ltc - r))
        .sum()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

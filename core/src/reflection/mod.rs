//! Reflection models
//!
//! Only the lobes needed to fit and evaluate sheen are provided: the reference
//! single scattering SGGX layer and the linearly transformed cosine that
//! approximates it.

use crate::geometry::*;
use crate::pbrt::*;

mod common;
mod ltc;
mod sggx;
mod sheen;

// Re-export
pub use common::*;
pub use ltc::*;
pub use sggx::*;
pub use sheen::*;

/// Interface for isotropic BRDFs evaluated in the local shading frame where
/// the surface normal is the z-axis.
pub trait Brdf {
    /// Returns the value of the BRDF for the given pair of directions. Both
    /// directions point away from the surface.
    ///
    /// * `wi` - Incident direction.
    /// * `wo` - Outgoing direction.
    fn eval(&self, wi: &Vector3f, wo: &Vector3f) -> Float;

    /// Evaluates the BRDF for one incident direction and a set of outgoing
    /// directions given in spherical coordinates. The returned values follow
    /// the order of `theta_o` and `phi_o`.
    ///
    /// * `theta_i` - Polar angle of the incident direction.
    /// * `phi_i`   - Azimuthal angle of the incident direction.
    /// * `theta_o` - Polar angles of the outgoing directions.
    /// * `phi_o`   - Azimuthal angles of the outgoing directions.
    fn eval_vectorized(
        &self,
        theta_i: Float,
        phi_i: Float,
        theta_o: &[Float],
        phi_o: &[Float],
    ) -> Vec<Float> {
        debug_assert_eq!(theta_o.len(), phi_o.len());

        let wi = spherical_direction(theta_i, phi_i);
        theta_o
            .iter()
            .zip(phi_o.iter())
            .map(|(&theta, &phi)| self.eval(&wi, &spherical_direction(theta, phi)))
            .collect()
    }
}

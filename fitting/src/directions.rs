//! Outgoing direction samples

use itertools::iproduct;
use sheen_core::pbrt::*;

/// The fixed set of outgoing directions every objective evaluation compares
/// the LTC against the reference BRDF on. Directions are cell centred on a
/// regular (θ, φ) grid over θ ∈ (0, π/2) and φ ∈ (0, π); the lower hemisphere
/// is not needed for reflection and φ ∈ (π, 2π) mirrors (0, π) for isotropic
/// lobes with the incident direction in the xz-plane.
///
/// The samples are stored row-major with shape `(theta_res, phi_res)`, i.e.
/// element `j * phi_res + i` holds `(θ_j, φ_i)`.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectionSamples {
    /// Polar angles.
    theta_o: Vec<Float>,

    /// Azimuthal angles.
    phi_o: Vec<Float>,

    /// Polar resolution.
    theta_res: usize,

    /// Azimuthal resolution.
    phi_res: usize,
}

impl DirectionSamples {
    /// Create a new `DirectionSamples`.
    ///
    /// * `theta_res` - Number of polar angles.
    /// * `phi_res`   - Number of azimuthal angles.
    pub fn new(theta_res: usize, phi_res: usize) -> Result<Self, String> {
        if theta_res == 0 || phi_res == 0 {
            return Err(format!(
                "Invalid direction sample resolution {theta_res}x{phi_res}"
            ));
        }

        let phis: Vec<Float> = (0..phi_res)
            .map(|i| (i as Float + 0.5) / phi_res as Float * PI)
            .collect();
        let thetas: Vec<Float> = (0..theta_res)
            .map(|j| (j as Float + 0.5) / theta_res as Float * 0.5 * PI)
            .collect();

        let (theta_o, phi_o): (Vec<Float>, Vec<Float>) = iproduct!(thetas.iter(), phis.iter())
            .map(|(&theta, &phi)| (theta, phi))
            .unzip();

        Ok(Self {
            theta_o,
            phi_o,
            theta_res,
            phi_res,
        })
    }

    /// Returns the polar angles.
    pub fn theta_o(&self) -> &[Float] {
        &self.theta_o
    }

    /// Returns the azimuthal angles.
    pub fn phi_o(&self) -> &[Float] {
        &self.phi_o
    }

    /// Returns the shape `(theta_res, phi_res)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.theta_res, self.phi_res)
    }

    /// Returns the number of directions.
    pub fn len(&self) -> usize {
        self.theta_o.len()
    }

    /// Returns true if there are no directions. A successfully constructed
    /// set is never empty.
    pub fn is_empty(&self) -> bool {
        self.theta_o.is_empty()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

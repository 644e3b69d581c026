//! LTC lookup table

use crate::params::LtcParams;
use sheen_core::pbrt::*;
use std::slice::ChunksMut;

/// Number of coefficients stored per table entry.
pub const PARAMS_PER_ENTRY: usize = 3;

/// Dense table of LTC coefficients with shape `(mu_res, alpha_res, 3)` stored
/// row-major, so the entries of one incident angle cosine form a contiguous
/// row.
#[derive(Clone, Debug, PartialEq)]
pub struct LtcTable {
    /// Resolution along the incident angle cosine.
    mu_res: usize,

    /// Resolution along the roughness.
    alpha_res: usize,

    /// Coefficients.
    data: Vec<Float>,
}

impl LtcTable {
    /// Create a zero-initialized table.
    ///
    /// * `mu_res`    - Resolution along the incident angle cosine.
    /// * `alpha_res` - Resolution along the roughness.
    pub fn new(mu_res: usize, alpha_res: usize) -> Self {
        Self {
            mu_res,
            alpha_res,
            data: vec![0.0; mu_res * alpha_res * PARAMS_PER_ENTRY],
        }
    }

    /// Create a table from row-major data.
    ///
    /// * `mu_res`    - Resolution along the incident angle cosine.
    /// * `alpha_res` - Resolution along the roughness.
    /// * `data`      - Coefficients.
    pub fn from_data(mu_res: usize, alpha_res: usize, data: Vec<Float>) -> Result<Self, String> {
        let expected = mu_res * alpha_res * PARAMS_PER_ENTRY;
        if data.len() != expected {
            return Err(format!(
                "Table data has {} values but shape ({mu_res}, {alpha_res}, {PARAMS_PER_ENTRY}) needs {expected}",
                data.len()
            ));
        }
        Ok(Self { mu_res, alpha_res, data })
    }

    /// Returns the shape `(mu_res, alpha_res, 3)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.mu_res, self.alpha_res, PARAMS_PER_ENTRY)
    }

    /// Returns the resolution along the incident angle cosine.
    pub fn mu_res(&self) -> usize {
        self.mu_res
    }

    /// Returns the resolution along the roughness.
    pub fn alpha_res(&self) -> usize {
        self.alpha_res
    }

    /// Returns the raw row-major coefficients.
    pub fn data(&self) -> &[Float] {
        &self.data
    }

    /// Returns the coefficients of one entry.
    ///
    /// * `mu_idx`    - Incident angle cosine index.
    /// * `alpha_idx` - Roughness index.
    pub fn get(&self, mu_idx: usize, alpha_idx: usize) -> LtcParams {
        let offset = self.offset(mu_idx, alpha_idx);
        let p = &self.data[offset..offset + PARAMS_PER_ENTRY];
        LtcParams::new(p[0], p[1], p[2])
    }

    /// Stores the coefficients of one entry.
    ///
    /// * `mu_idx`    - Incident angle cosine index.
    /// * `alpha_idx` - Roughness index.
    /// * `params`    - Coefficients.
    pub fn set(&mut self, mu_idx: usize, alpha_idx: usize, params: &LtcParams) {
        let offset = self.offset(mu_idx, alpha_idx);
        self.data[offset..offset + PARAMS_PER_ENTRY].copy_from_slice(&params.to_array());
    }

    /// Returns disjoint mutable slices over the rows; one row holds all
    /// roughness entries of one incident angle cosine.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, Float> {
        self.data.chunks_mut(self.alpha_res * PARAMS_PER_ENTRY)
    }

    /// Returns the offset of an entry in the row-major data.
    ///
    /// * `mu_idx`    - Incident angle cosine index.
    /// * `alpha_idx` - Roughness index.
    #[inline]
    fn offset(&self, mu_idx: usize, alpha_idx: usize) -> usize {
        assert!(mu_idx < self.mu_res && alpha_idx < self.alpha_res);
        (mu_idx * self.alpha_res + alpha_idx) * PARAMS_PER_ENTRY
    }
}

/// Stores the coefficients of one roughness entry into a table row obtained
/// from `LtcTable::rows_mut()`.
///
/// * `row`       - Table row.
/// * `alpha_idx` - Roughness index.
/// * `params`    - Coefficients.
pub fn store_in_row(row: &mut [Float], alpha_idx: usize, params: &LtcParams) {
    let offset = alpha_idx * PARAMS_PER_ENTRY;
    row[offset..offset + PARAMS_PER_ENTRY].copy_from_slice(&params.to_array());
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Fit settings

use sheen_core::pbrt::*;

/// Settings for the per-entry simplex search and the row workers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FitSettings {
    /// Absolute convergence tolerance on vertices and objective values.
    pub tolerance: Float,

    /// Iteration cap per table entry.
    pub max_iters: usize,

    /// Offset of the initial simplex vertices from the initial guess.
    pub delta: Float,

    /// Number of worker threads fitting table rows. 0 is treated as 1 and
    /// counts above the number of logical CPUs are clamped.
    pub n_threads: usize,

    /// Show a progress bar.
    pub show_progress: bool,
}

impl Default for FitSettings {
    /// Returns the settings the published tables were fitted with.
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iters: 10000,
            delta: 0.05,
            n_threads: 1,
            show_progress: false,
        }
    }
}

impl FitSettings {
    /// Checks the settings before any fitting starts.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            return Err(format!("Invalid tolerance {}", self.tolerance));
        }
        if !(self.delta > 0.0 && self.delta.is_finite()) {
            return Err(format!("Invalid initial simplex offset {}", self.delta));
        }
        if self.max_iters == 0 {
            return Err("Invalid iteration cap 0".to_string());
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

//! Table axes

use sheen_core::pbrt::*;

/// Smallest value of an axis built with `GridAxis::clamped_linspace()`. It
/// keeps the reference BRDF away from the degenerate roughness 0 and the
/// grazing incident cosine 0.
pub const MIN_AXIS_VALUE: Float = 0.01;

/// An axis of the lookup table (incident angle cosines or roughness values).
/// Values lie in (0, 1] and are non-decreasing. Fine axes built with
/// `GridAxis::clamped_linspace()` repeat `MIN_AXIS_VALUE` at the low end.
#[derive(Clone, Debug, PartialEq)]
pub struct GridAxis {
    values: Vec<Float>,
}

impl GridAxis {
    /// Create an axis from explicit values.
    ///
    /// * `values` - Axis values.
    pub fn new(values: Vec<Float>) -> Result<Self, String> {
        if values.is_empty() {
            return Err("Table axis needs at least one value".to_string());
        }

        if let Some(v) = values.iter().find(|&&v| !(v > 0.0 && v <= 1.0)) {
            return Err(format!("Table axis value {v} is outside (0, 1]"));
        }

        if let Some(w) = values.windows(2).find(|w| w[0] > w[1]) {
            return Err(format!(
                "Table axis is decreasing ({} followed by {})",
                w[0], w[1]
            ));
        }

        Ok(Self { values })
    }

    /// Create an axis of `n` evenly spaced values over [0, 1] with the values
    /// below `MIN_AXIS_VALUE` raised to it.
    ///
    /// * `n` - Resolution.
    pub fn clamped_linspace(n: usize) -> Result<Self, String> {
        if n == 0 {
            return Err("Invalid table resolution 0".to_string());
        }

        let values = linspace(0.0, 1.0, n)
            .into_iter()
            .map(|v| max(MIN_AXIS_VALUE, v))
            .collect();
        Self::new(values)
    }

    /// Returns the values.
    pub fn values(&self) -> &[Float] {
        &self.values
    }

    /// Returns the resolution.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the axis has no values. A successfully constructed
    /// axis is never empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl std::ops::Index<usize> for GridAxis {
    type Output = Float;

    /// Returns the value at index `i`.
    ///
    /// * `i` - Index.
    fn index(&self, i: usize) -> &Float {
        &self.values[i]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

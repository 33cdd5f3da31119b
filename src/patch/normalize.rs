//! Validity masking and min/max normalization of a clipped window

use log::debug;
use ndarray::{Array2, Zip};
use std::fmt;

/// Minimum and maximum of the valid cells of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Maps a normalized value back to the raw scale
    pub fn denormalize(&self, value: f64) -> f64 {
        value * (self.max as f64 - self.min as f64) + self.min as f64
    }
}

impl fmt::Display for ValueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A window rescaled to `[0, 1]` with an explicit validity mask
///
/// Invalid cells hold 0.0 in `values`; they only become NaN when a patch is
/// written out.
#[derive(Debug, Clone)]
pub struct NormalizedGrid {
    pub values: Array2<f32>,
    pub valid: Array2<bool>,
    pub range: ValueRange,
}

impl NormalizedGrid {
    pub fn height(&self) -> usize {
        self.values.nrows()
    }

    pub fn width(&self) -> usize {
        self.values.ncols()
    }

    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }
}

/// Whether a raw reading counts as a measurement
///
/// Non-positive readings, NaN and the raster's nodata value are missing.
/// Masking nodata is stricter than the `value > 0` rule alone and changes
/// the output when a raster declares a positive nodata value.
pub fn is_valid(value: f32, nodata: Option<f32>) -> bool {
    value > 0.0 && Some(value) != nodata
}

/// Masks invalid readings and rescales the rest by the window's min and max
///
/// Returns `None` when the window has no valid cell. A window whose valid
/// cells all hold the same value normalizes to 0.0 everywhere, so
/// denormalizing still yields that value.
pub fn normalize(window: &Array2<f32>, nodata: Option<f32>) -> Option<NormalizedGrid> {
    let valid = window.mapv(|v| is_valid(v, nodata));

    let range = Zip::from(window).and(&valid).fold(None, |range: Option<ValueRange>, &v, &ok| {
        if !ok {
            return range;
        }
        Some(match range {
            Some(r) => ValueRange { min: r.min.min(v), max: r.max.max(v) },
            None => ValueRange { min: v, max: v },
        })
    })?;

    let span = range.span();
    let mut values = Array2::<f32>::zeros(window.raw_dim());
    Zip::from(&mut values).and(window).and(&valid).for_each(|out, &v, &ok| {
        if ok && span > 0.0 {
            *out = (v - range.min) / span;
        }
    });

    debug!("Normalized {}x{} window over range {}", window.nrows(), window.ncols(), range);
    Some(NormalizedGrid { values, valid, range })
}

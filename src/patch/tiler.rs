//! Tiling of a normalized grid into labelled patches

use log::{debug, trace};
use ndarray::{s, Array1, Array2, Array3, Axis};

use super::normalize::{NormalizedGrid, ValueRange};

/// Largest accepted patch side length
pub const MAX_PATCH_SIZE: usize = 65535;

/// Tiling and labelling parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchParams {
    /// Side length of a square patch in pixels
    pub patch_size: usize,
    /// Raw temperature a patch mean must exceed to be labelled 1
    pub threshold: f64,
    /// Largest share of invalid cells a kept patch may have
    pub max_invalid_fraction: f64,
}

impl Default for PatchParams {
    fn default() -> Self {
        PatchParams {
            patch_size: 128,
            threshold: 305.0,
            max_invalid_fraction: 0.3,
        }
    }
}

/// One kept tile
#[derive(Debug, Clone)]
pub struct Patch {
    /// Row of the tile's top-left cell in the window
    pub row: usize,
    /// Column of the tile's top-left cell in the window
    pub col: usize,
    /// Normalized values with invalid cells set to NaN
    pub values: Array2<f32>,
    pub invalid_fraction: f64,
    /// Mean of the valid normalized values
    pub mean: f64,
}

/// Label of a patch: 1 when its denormalized mean is strictly above `threshold`
pub fn label_for(mean: f64, range: &ValueRange, threshold: f64) -> i64 {
    (range.denormalize(mean) > threshold) as i64
}

/// Start offsets of candidate tiles along one dimension
///
/// The bound `dim - patch_size` is exclusive, so a tile that would end
/// exactly on the last row or column is not a candidate.
pub fn tile_starts(dim: usize, patch_size: usize) -> impl Iterator<Item = usize> {
    (0..dim.saturating_sub(patch_size)).step_by(patch_size.max(1))
}

/// Patches of one day with their labels, in row-major tile order
#[derive(Debug, Clone)]
pub struct PatchSet {
    patch_size: usize,
    patches: Vec<Patch>,
    labels: Vec<i64>,
}

impl PatchSet {
    pub fn new(patch_size: usize) -> Self {
        PatchSet { patch_size, patches: Vec::new(), labels: Vec::new() }
    }

    pub fn push(&mut self, patch: Patch, label: i64) {
        self.patches.push(patch);
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn patch_size(&self) -> usize {
        self.patch_size
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn labels(&self) -> &[i64] {
        &self.labels
    }

    /// Number of patches labelled 1
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    /// Patches stacked as `(N, P, P)` and labels as `(N,)`
    pub fn to_arrays(&self) -> (Array3<f32>, Array1<i64>) {
        let p = self.patch_size;
        let mut stacked = Array3::<f32>::zeros((self.patches.len(), p, p));
        for (mut slot, patch) in stacked.axis_iter_mut(Axis(0)).zip(&self.patches) {
            slot.assign(&patch.values);
        }
        (stacked, Array1::from(self.labels.clone()))
    }
}

/// Cuts `grid` into candidate tiles, drops mostly invalid ones and labels the rest
pub fn tile_grid(grid: &NormalizedGrid, params: &PatchParams) -> PatchSet {
    let p = params.patch_size;
    let cells = (p * p) as f64;
    let mut set = PatchSet::new(p);

    for row in tile_starts(grid.height(), p) {
        for col in tile_starts(grid.width(), p) {
            let values = grid.values.slice(s![row..row + p, col..col + p]);
            let valid = grid.valid.slice(s![row..row + p, col..col + p]);

            let valid_count = valid.iter().filter(|&&v| v).count();
            // A tile with no valid cell has no mean to label
            if valid_count == 0 {
                trace!("Skipping tile ({}, {}): no valid cells", row, col);
                continue;
            }
            let invalid_fraction = (p * p - valid_count) as f64 / cells;
            if invalid_fraction > params.max_invalid_fraction {
                trace!("Skipping tile ({}, {}): {:.3} invalid", row, col, invalid_fraction);
                continue;
            }

            let sum: f64 = values.iter().zip(valid.iter())
                .filter(|(_, ok)| **ok)
                .map(|(&v, _)| v as f64)
                .sum();
            let mean = sum / valid_count as f64;

            let mut patch_values = values.to_owned();
            patch_values.zip_mut_with(&valid, |v, &ok| {
                if !ok {
                    *v = f32::NAN;
                }
            });

            let label = label_for(mean, &grid.range, params.threshold);
            set.push(Patch { row, col, values: patch_values, invalid_fraction, mean }, label);
        }
    }

    debug!("Kept {} of the candidate {}x{} tiles", set.len(), p, p);
    set
}

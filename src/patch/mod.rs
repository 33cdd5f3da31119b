//! Normalization, tiling and labelling of a clipped window

mod normalize;
mod tiler;

pub use self::normalize::{is_valid, normalize, NormalizedGrid, ValueRange};
pub use self::tiler::{label_for, tile_grid, tile_starts, Patch, PatchParams, PatchSet, MAX_PATCH_SIZE};

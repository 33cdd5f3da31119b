//! Persistence of a day's patches and labels as `.npy` arrays

use log::debug;
use ndarray_npy::write_npy;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::PatchResult;
use crate::patch::PatchSet;

/// Writes `patches_day{d}.npy` and `labels_day{d}.npy` into one directory
pub struct PatchWriter {
    output_dir: PathBuf,
}

impl PatchWriter {
    /// Creates the output directory if it does not exist
    pub fn new(output_dir: &Path) -> PatchResult<Self> {
        fs::create_dir_all(output_dir)?;
        Ok(PatchWriter { output_dir: output_dir.to_path_buf() })
    }

    pub fn patches_path(&self, day: u32) -> PathBuf {
        self.output_dir.join(format!("patches_day{}.npy", day))
    }

    pub fn labels_path(&self, day: u32) -> PathBuf {
        self.output_dir.join(format!("labels_day{}.npy", day))
    }

    /// Writes patches as `<f4` `(N, P, P)` and labels as `<i8` `(N,)`
    pub fn write(&self, day: u32, patches: &PatchSet) -> PatchResult<()> {
        let (stacked, labels) = patches.to_arrays();

        let patches_path = self.patches_path(day);
        write_npy(&patches_path, &stacked)?;
        debug!("Wrote {:?} to {}", stacked.shape(), patches_path.display());

        let labels_path = self.labels_path(day);
        write_npy(&labels_path, &labels)?;
        debug!("Wrote {:?} to {}", labels.shape(), labels_path.display());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array3};
    use ndarray_npy::read_npy;

    #[test]
    fn empty_set_writes_zero_length_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PatchWriter::new(&dir.path().join("out")).unwrap();
        writer.write(205, &PatchSet::new(16)).unwrap();

        assert!(writer.patches_path(205).ends_with("patches_day205.npy"));
        let patches: Array3<f32> = read_npy(writer.patches_path(205)).unwrap();
        let labels: Array1<i64> = read_npy(writer.labels_path(205)).unwrap();
        assert_eq!(patches.shape(), &[0, 16, 16]);
        assert!(labels.is_empty());
    }
}

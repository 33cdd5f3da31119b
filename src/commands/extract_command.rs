//! Patch extraction command
//!
//! Runs the day pipeline over the configured days and reports what
//! happened to each of them.

use log::info;

use crate::commands::command_traits::Command;
use crate::errors::PatchResult;
use crate::pipeline::{DayPipeline, PipelineConfig};

/// Command for extracting patches and labels for every configured day
pub struct ExtractCommand {
    config: PipelineConfig,
}

impl ExtractCommand {
    pub fn new(config: PipelineConfig) -> Self {
        ExtractCommand { config }
    }
}

impl Command for ExtractCommand {
    fn execute(&self) -> PatchResult<()> {
        info!("Extracting {}x{} patches for days {:?}",
              self.config.params.patch_size, self.config.params.patch_size, self.config.days);
        info!("  Input: {}", self.config.data_dir.display());
        info!("  Output: {}", self.config.output_dir.display());
        info!("  Region: {}", self.config.bbox);
        info!("  Threshold: {} K", self.config.params.threshold);

        let pipeline = DayPipeline::new(self.config.clone())?;
        let summary = pipeline.run()?;

        info!("Summary:");
        for (day, outcome) in &summary.days {
            info!("  Day {}: {}", day, outcome);
        }
        Ok(())
    }
}

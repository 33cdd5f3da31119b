//! Sequential driver over the configured days

use log::{info, warn};
use std::fmt;

use crate::errors::PatchResult;
use crate::utils::progress::ProgressTracker;

use super::config::PipelineConfig;
use super::extractor::{DayExtraction, PatchExtractor};
use super::writer::PatchWriter;

/// What happened to one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    /// Arrays were written
    Saved { patches: usize, positives: usize },
    /// The input raster does not exist; nothing was written
    MissingInput,
    /// The clipped window had no valid pixel; nothing was written
    NoValidPixels,
}

impl fmt::Display for DayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayOutcome::Saved { patches, positives } => write!(f, "{} patches ({} positive)", patches, positives),
            DayOutcome::MissingInput => write!(f, "input missing"),
            DayOutcome::NoValidPixels => write!(f, "no valid pixels"),
        }
    }
}

/// Outcomes of a run, in day order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub days: Vec<(u32, DayOutcome)>,
}

impl RunSummary {
    pub fn outcome(&self, day: u32) -> Option<&DayOutcome> {
        self.days.iter().find(|(d, _)| *d == day).map(|(_, outcome)| outcome)
    }

    /// Patches written over all days
    pub fn total_patches(&self) -> usize {
        self.days.iter()
            .map(|(_, outcome)| match outcome {
                DayOutcome::Saved { patches, .. } => *patches,
                _ => 0,
            })
            .sum()
    }

    pub fn saved_days(&self) -> usize {
        self.days.iter().filter(|(_, o)| matches!(o, DayOutcome::Saved { .. })).count()
    }

    pub fn skipped_days(&self) -> usize {
        self.days.len() - self.saved_days()
    }
}

/// Runs the extraction for every configured day, one file at a time
pub struct DayPipeline {
    config: PipelineConfig,
    show_progress: bool,
}

impl DayPipeline {
    /// Validates `config` up front so a bad run fails before touching any file
    pub fn new(config: PipelineConfig) -> PatchResult<Self> {
        config.validate()?;
        Ok(DayPipeline { config, show_progress: true })
    }

    /// Enables or disables the progress bar
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes the days in order
    ///
    /// Missing inputs and windows without valid pixels skip their day.
    /// Any other error aborts the run.
    pub fn run(&self) -> PatchResult<RunSummary> {
        let writer = PatchWriter::new(&self.config.output_dir)?;
        let extractor = PatchExtractor::new(self.config.bbox, self.config.params);
        let total = self.config.days.len() as u64;
        let progress = if self.show_progress {
            ProgressTracker::new(total, "Extracting patches")
        } else {
            ProgressTracker::hidden(total)
        };

        let mut summary = RunSummary::default();
        for &day in &self.config.days {
            progress.start_day(day);
            let outcome = self.run_day(day, &extractor, &writer)?;
            summary.days.push((day, outcome));
            progress.day_done();
        }
        progress.finish();

        info!("Processed {} days: {} saved, {} skipped, {} patches in total",
              summary.days.len(), summary.saved_days(), summary.skipped_days(), summary.total_patches());
        Ok(summary)
    }

    fn run_day(&self, day: u32, extractor: &PatchExtractor, writer: &PatchWriter) -> PatchResult<DayOutcome> {
        let path = self.config.input_path(day);
        if !path.is_file() {
            warn!("File not found: {}", path.display());
            return Ok(DayOutcome::MissingInput);
        }

        match extractor.extract_file(&path)? {
            DayExtraction::NoValidPixels { window } => {
                warn!("Skipping day {}: no valid pixels in window {}", day, window);
                Ok(DayOutcome::NoValidPixels)
            }
            DayExtraction::Patches { patches, .. } => {
                writer.write(day, &patches)?;
                info!("Saved {} patches for day {}", patches.len(), day);
                Ok(DayOutcome::Saved { patches: patches.len(), positives: patches.positives() })
            }
        }
    }
}

//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod extract_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use extract_command::ExtractCommand;
pub use inspect_command::InspectCommand;

use clap::ArgMatches;
use std::path::PathBuf;

use crate::coordinate::BoundingBox;
use crate::errors::{PatchError, PatchResult};
use crate::pipeline::{parse_days, ConfigOverrides, PipelineConfig};

/// Factory for creating command instances based on CLI arguments
///
/// `--inspect FILE` selects the inspect command; anything else runs the
/// extraction.
#[derive(Default)]
pub struct LstpatchCommandFactory;

impl LstpatchCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        LstpatchCommandFactory
    }
}

impl CommandFactory for LstpatchCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> PatchResult<Box<dyn Command>> {
        let config = config_from_args(args)?;

        match args.get_one::<String>("inspect") {
            Some(file) => Ok(Box::new(InspectCommand::new(PathBuf::from(file), config))),
            None => Ok(Box::new(ExtractCommand::new(config))),
        }
    }
}

/// Builds the run configuration from `--config` and the override flags
pub fn config_from_args(args: &ArgMatches) -> PatchResult<PipelineConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => PipelineConfig::from_file(&PathBuf::from(path))?,
        None => PipelineConfig::default(),
    };

    let overrides = ConfigOverrides {
        data_dir: args.get_one::<String>("data-dir").map(PathBuf::from),
        output_dir: args.get_one::<String>("output-dir").map(PathBuf::from),
        bbox: args.get_one::<String>("bbox").map(|s| BoundingBox::from_string(s)).transpose()?,
        patch_size: parse_arg::<usize>(args, "patch-size")?,
        threshold: parse_arg::<f64>(args, "threshold")?,
        days: args.get_one::<String>("days").map(|s| parse_days(s)).transpose()?,
    };

    config.apply(overrides)?;
    Ok(config)
}

fn parse_arg<T: std::str::FromStr>(args: &ArgMatches, name: &str) -> PatchResult<Option<T>> {
    match args.get_one::<String>(name) {
        None => Ok(None),
        Some(value) => value.parse::<T>()
            .map(Some)
            .map_err(|_| PatchError::InvalidConfig(format!("Invalid value '{}' for --{}", value, name))),
    }
}

//! Run configuration
//!
//! Defaults reproduce the DC heat-island run. A TOML file can replace any
//! subset of them:
//!
//! ```toml
//! [paths]
//! data_dir = "../data/raw"
//! output_dir = "../data/processed"
//! input_pattern = "gf_Day2020_{day}.tif"
//!
//! [region]
//! west = -77.12
//! east = -76.90
//! south = 38.80
//! north = 39.00
//!
//! [patches]
//! size = 128
//! threshold = 305
//! max_invalid_fraction = 0.3
//!
//! [run]
//! days = [196, 197, 198, 200, 205]
//! ```

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::coordinate::BoundingBox;
use crate::errors::{PatchError, PatchResult};
use crate::patch::{PatchParams, MAX_PATCH_SIZE};

/// Placeholder replaced by the day number in `input_pattern`
pub const DAY_PLACEHOLDER: &str = "{day}";

/// Everything a run needs
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Input file name, with `{day}` standing for the day number
    pub input_pattern: String,
    pub bbox: BoundingBox,
    pub params: PatchParams,
    /// Days processed, in this order
    pub days: Vec<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data_dir: PathBuf::from("../data/raw"),
            output_dir: PathBuf::from("../data/processed"),
            input_pattern: "gf_Day2020_{day}.tif".to_string(),
            bbox: BoundingBox::default(),
            params: PatchParams::default(),
            days: vec![196, 197, 198, 200, 205],
        }
    }
}

/// Values given on the command line; each replaces the configured one
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub bbox: Option<BoundingBox>,
    pub patch_size: Option<usize>,
    pub threshold: Option<f64>,
    pub days: Option<Vec<u32>>,
}

impl PipelineConfig {
    /// Loads a TOML configuration file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> PatchResult<Self> {
        info!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses a TOML configuration; absent keys keep their defaults
    pub fn from_toml_str(content: &str) -> PatchResult<Self> {
        let toml_value: toml::Value = content.parse()
            .map_err(|e| PatchError::InvalidConfig(format!("Failed to parse TOML: {}", e)))?;

        let mut config = PipelineConfig::default();

        if let Some(paths) = table(&toml_value, "paths")? {
            if let Some(dir) = get_str(paths, "paths", "data_dir")? {
                config.data_dir = PathBuf::from(dir);
            }
            if let Some(dir) = get_str(paths, "paths", "output_dir")? {
                config.output_dir = PathBuf::from(dir);
            }
            if let Some(pattern) = get_str(paths, "paths", "input_pattern")? {
                config.input_pattern = pattern.to_string();
            }
        }

        if let Some(region) = table(&toml_value, "region")? {
            let bbox = &mut config.bbox;
            for (key, edge) in [("west", &mut bbox.west), ("east", &mut bbox.east),
                                ("south", &mut bbox.south), ("north", &mut bbox.north)] {
                if let Some(value) = get_f64(region, "region", key)? {
                    *edge = value;
                }
            }
        }

        if let Some(patches) = table(&toml_value, "patches")? {
            if let Some(size) = get_integer(patches, "patches", "size")? {
                config.params.patch_size = usize::try_from(size)
                    .map_err(|_| PatchError::InvalidConfig(format!("patches.size must be positive, got {}", size)))?;
            }
            if let Some(threshold) = get_f64(patches, "patches", "threshold")? {
                config.params.threshold = threshold;
            }
            if let Some(fraction) = get_f64(patches, "patches", "max_invalid_fraction")? {
                config.params.max_invalid_fraction = fraction;
            }
        }

        if let Some(run) = table(&toml_value, "run")? {
            if let Some(days) = run.get("days") {
                let days = days.as_array()
                    .ok_or_else(|| PatchError::InvalidConfig("run.days must be an array".to_string()))?;
                config.days = days.iter()
                    .map(|day| day.as_integer()
                        .and_then(|d| u32::try_from(d).ok())
                        .ok_or_else(|| PatchError::InvalidConfig(format!("Invalid day {} in run.days", day))))
                    .collect::<PatchResult<Vec<u32>>>()?;
            }
        }

        config.validate()?;
        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    /// Applies command line values on top of this configuration
    pub fn apply(&mut self, overrides: ConfigOverrides) -> PatchResult<()> {
        if let Some(dir) = overrides.data_dir {
            self.data_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(bbox) = overrides.bbox {
            self.bbox = bbox;
        }
        if let Some(size) = overrides.patch_size {
            self.params.patch_size = size;
        }
        if let Some(threshold) = overrides.threshold {
            self.params.threshold = threshold;
        }
        if let Some(days) = overrides.days {
            self.days = days;
        }
        self.validate()
    }

    /// Checks the invariants the pipeline relies on
    pub fn validate(&self) -> PatchResult<()> {
        self.bbox.validate()?;

        if self.params.patch_size == 0 {
            return Err(PatchError::InvalidConfig("Patch size must be at least 1".to_string()));
        }
        if self.params.patch_size > MAX_PATCH_SIZE {
            return Err(PatchError::InvalidConfig(format!(
                "Patch size {} exceeds {}", self.params.patch_size, MAX_PATCH_SIZE
            )));
        }
        if !self.params.threshold.is_finite() {
            return Err(PatchError::InvalidConfig(format!("Threshold {} is not finite", self.params.threshold)));
        }
        if !(0.0..=1.0).contains(&self.params.max_invalid_fraction) {
            return Err(PatchError::InvalidConfig(format!(
                "max_invalid_fraction {} is outside [0, 1]", self.params.max_invalid_fraction
            )));
        }
        if !self.input_pattern.contains(DAY_PLACEHOLDER) {
            return Err(PatchError::InvalidConfig(format!(
                "Input pattern '{}' has no {} placeholder", self.input_pattern, DAY_PLACEHOLDER
            )));
        }
        Ok(())
    }

    /// Raster file for `day`
    pub fn input_path(&self, day: u32) -> PathBuf {
        self.data_dir.join(self.input_pattern.replace(DAY_PLACEHOLDER, &day.to_string()))
    }
}

/// Parses a comma separated day list such as "196,197,200"
pub fn parse_days(list: &str) -> PatchResult<Vec<u32>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().map_err(|_| PatchError::InvalidConfig(format!("Invalid day '{}'", s))))
        .collect()
}

fn table<'a>(root: &'a toml::Value, name: &str) -> PatchResult<Option<&'a toml::value::Table>> {
    match root.get(name) {
        None => Ok(None),
        Some(value) => value.as_table()
            .map(Some)
            .ok_or_else(|| PatchError::InvalidConfig(format!("[{}] must be a table", name))),
    }
}

fn get_str<'a>(table: &'a toml::value::Table, section: &str, key: &str) -> PatchResult<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value.as_str()
            .map(Some)
            .ok_or_else(|| PatchError::InvalidConfig(format!("{}.{} must be a string", section, key))),
    }
}

fn get_integer(table: &toml::value::Table, section: &str, key: &str) -> PatchResult<Option<i64>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value.as_integer()
            .map(Some)
            .ok_or_else(|| PatchError::InvalidConfig(format!("{}.{} must be an integer", section, key))),
    }
}

/// Reads a number; integers are accepted where floats are expected
fn get_f64(table: &toml::value::Table, section: &str, key: &str) -> PatchResult<Option<f64>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Float(f)) => Ok(Some(*f)),
        Some(toml::Value::Integer(i)) => Ok(Some(*i as f64)),
        Some(_) => Err(PatchError::InvalidConfig(format!("{}.{} must be a number", section, key))),
    }
}

//! Command line definition

use clap::{Arg, ArgAction, Command as ClapCommand};

/// Name of the log file written next to the working directory
pub const LOG_FILE: &str = "lstpatch.log";

/// Builds the clap command for the `lstpatch` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("lstpatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Extract labelled land-surface-temperature patches from daily GeoTIFFs")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Directory holding the daily rasters")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .help("Directory receiving the .npy arrays")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("days")
                .long("days")
                .help("Comma separated day numbers, e.g. 196,197,198")
                .value_name("LIST")
                .required(false),
        )
        .arg(
            Arg::new("bbox")
                .long("bbox")
                .help("Region as west,east,south,north in raster coordinates")
                .value_name("BBOX")
                .allow_hyphen_values(true)
                .required(false),
        )
        .arg(
            Arg::new("patch-size")
                .long("patch-size")
                .help("Side length of a patch in pixels")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .help("Temperature (K) a patch mean must exceed to be labelled 1")
                .value_name("K")
                .required(false),
        )
        .arg(
            Arg::new("inspect")
                .long("inspect")
                .help("Describe one raster and its clip window instead of extracting")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug output")
                .action(ArgAction::SetTrue),
        )
}

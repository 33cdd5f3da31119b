//! Command pattern interfaces
//!
//! This module defines the core Command pattern interfaces
//! for the CLI application.

use crate::errors::PatchResult;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    fn execute(&self) -> PatchResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory {
    /// Create the Command selected by the CLI arguments
    fn create_command(&self, args: &clap::ArgMatches) -> PatchResult<Box<dyn Command>>;
}

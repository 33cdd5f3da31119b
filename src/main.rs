use std::path::Path;
use std::process;
use log::error;

use lstpatch::cli::{build_cli, LOG_FILE};
use lstpatch::utils::logger::Logger;
use lstpatch::commands::{CommandFactory, LstpatchCommandFactory};

fn main() {
    let matches = build_cli().get_matches();

    if let Err(e) = Logger::init_global_logger(Path::new(LOG_FILE), matches.get_flag("verbose")) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = LstpatchCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}

//! Logger setup for the `monitor` binary.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Where log records go. Terminal output always uses stderr so it never
/// interleaves with rendered pages on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogDestination {
    File,
    #[default]
    Terminal,
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, Self::Terminal | Self::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

/// Installs the global logger. A log file that cannot be created is reported
/// on stderr and skipped; the rest of the setup still applies.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_file: &Path) {
    let loggers = build_loggers(destination, level, log_file);
    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

fn build_loggers(
    destination: LogDestination,
    level: LevelFilter,
    log_file: &Path,
) -> Vec<Box<dyn SharedLogger>> {
    let config = record_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if destination.to_terminal() {
        loggers.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    if destination.to_file() {
        match File::create(log_file) {
            Ok(file) => loggers.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("Cannot write log file {}: {}", log_file.display(), err),
        }
    }
    loggers
}

fn record_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

//! Logger setup for `feed-gadget`.
//!
//! `--log` picks the sink (`file`, `terminal` or `both`) and `--verbose`
//! lowers the threshold from info to debug. The file sink truncates
//! `./gadget.log` on every run.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LOG_FILE: &str = "./gadget.log";

/// Value of the `--log` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogDestination {
    /// `./gadget.log` only; stdout stays free for the rendered page.
    File,
    /// The terminal only.
    Terminal,
    /// Terminal and `./gadget.log`.
    Both,
}

/// Installs the global logger for one run. A log file that cannot be
/// created falls back to terminal output with a warning on stderr.
pub fn initialize(destination: LogDestination, level: LevelFilter) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if destination != LogDestination::Terminal {
        match file_logger(Path::new(LOG_FILE), level, config.clone()) {
            Some(logger) => loggers.push(logger),
            None if destination == LogDestination::File => {
                loggers.push(terminal_logger(level, config.clone()));
            }
            None => {}
        }
    }
    if destination != LogDestination::File {
        loggers.push(terminal_logger(level, config));
    }

    let _ = CombinedLogger::init(loggers);
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn file_logger(path: &Path, level: LevelFilter, config: Config) -> Option<Box<WriteLogger<File>>> {
    match File::create(path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: cannot create log file {}: {}", path.display(), err);
            None
        }
    }
}

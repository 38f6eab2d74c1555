//! Logger setup
//!
//! The terminal belongs to the TUI, so log records go to a file. One-shot
//! subcommands also echo warnings to stderr.

use crate::error::{MedReportsError, Result};
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Default log location (`<data_local_dir>/medreports/medreports.log`)
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("medreports").join("medreports.log"))
}

pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Installs the global logger.
///
/// `log_path` receives every record at `level`; with `echo_to_stderr`
/// warnings and errors are also printed to the terminal.
pub fn init(log_path: Option<&Path>, level: LevelFilter, echo_to_stderr: bool) -> Result<()> {
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if let Some(path) = log_path {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        loggers.push(WriteLogger::new(level, config.clone(), file));
    }

    if echo_to_stderr {
        loggers.push(TermLogger::new(
            LevelFilter::Warn,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    CombinedLogger::init(loggers)
        .map_err(|e| MedReportsError::Config(format!("Failed to initialise logging: {}", e)))
}

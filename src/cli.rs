// CLI module for argument parsing and configuration

use crate::catalog::default_base_directory;
use crate::config::UserConfig;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Medical Reports Organizer - keep scanned reports sorted by specialty
///
/// Without a subcommand the interactive terminal UI starts.
#[derive(Parser, Debug, Clone)]
#[command(name = "medreports")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Folder holding one sub-folder per specialty
    ///
    /// Defaults to the configured location, then ~/MedicalReports.
    #[arg(short = 'b', long = "base-dir", global = true)]
    pub base_dir: Option<PathBuf>,

    /// Show the welcome screen even if it was dismissed before
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub show_welcome: bool,

    /// Write the log to this file instead of the default location
    #[arg(long = "log-file", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log debug messages
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Non-interactive operations on the catalog
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// List the known specialties
    Categories,
    /// List reports, optionally restricted to one specialty and a search text
    List {
        /// Only list this specialty
        #[arg(short = 'c', long = "category")]
        category: Option<String>,
        /// Case-insensitive substring of the file name
        #[arg(short = 's', long = "search", default_value = "")]
        search: String,
    },
    /// Copy report files into a specialty
    Import {
        /// Target specialty
        #[arg(short = 'c', long = "category")]
        category: String,
        /// Replace files that already exist in the specialty
        #[arg(long = "overwrite", action = ArgAction::SetTrue)]
        overwrite: bool,
        /// Files to import
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete a report from a specialty
    Delete {
        #[arg(short = 'c', long = "category")]
        category: String,
        /// File name inside the specialty folder
        file: String,
    },
    /// Add a new specialty
    AddCategory {
        name: String,
    },
    /// Open a report with the default application
    Open {
        #[arg(short = 'c', long = "category")]
        category: String,
        file: String,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if let Some(dir) = &self.base_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!("Path is not a directory: {}", dir.display()));
            }
        }

        if let Some(CliCommand::AddCategory { name }) = &self.command {
            if name.trim().is_empty() {
                return Err("Specialty name must not be empty".to_string());
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub base_dir: Option<PathBuf>,
    pub show_welcome: bool,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
    pub command: Option<CliCommand>,
}

impl AppConfig {
    /// Base directory: command line, then user config, then the home default
    pub fn resolve_base_dir(&self, user_config: &UserConfig) -> Option<PathBuf> {
        self.base_dir
            .clone()
            .or_else(|| user_config.base_directory.clone())
            .or_else(default_base_directory)
    }
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            base_dir: args.base_dir,
            show_welcome: args.show_welcome,
            log_file: args.log_file,
            verbose: args.verbose,
            command: args.command,
        }
    }
}

//! Error types shared by the catalog, the view and the application shell

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MedReportsError {
    /// The base directory or a category directory could not be created
    #[error("Failed to create directory {}: {source}", .path.display())]
    LayoutCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Specialty '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Invalid specialty name: '{0}'")]
    InvalidCategoryName(String),

    #[error("Unknown specialty: '{0}'")]
    UnknownCategory(String),

    #[error("Report '{filename}' not found in {category}")]
    NotFound { category: String, filename: String },

    #[error("Failed to import {}: {source}", .path.display())]
    Import {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to delete {}: {source}", .path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, MedReportsError>;

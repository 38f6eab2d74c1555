//! Medreports - organize scanned medical reports by specialty
//!
//! This crate provides the core of the Medical Reports Organizer: a
//! filesystem-backed catalog with one folder per specialty, a filtered view
//! over it and the command layer the terminal UI drives.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod debounce;
pub mod error;
pub mod file_opener;
pub mod logging;
pub mod tui;
pub mod view;

// Re-export primary types for convenience
pub use app::{App, Command, Notice};
pub use catalog::{
    default_base_directory, ensure_layout, Catalog, ImportOutcome, ImportReport, ReportEntry,
    RowKey, Scope, BUILTIN_CATEGORIES,
};
pub use config::UserConfig;
pub use debounce::Debouncer;
pub use error::{MedReportsError, Result};
pub use file_opener::open_file;
pub use view::{compute_view, ViewFilter};

//! Filesystem-backed catalog of report files grouped by medical specialty
//!
//! The on-disk layout is `<base>/<specialty>/<filename>`: one flat level per
//! specialty and no further nesting. The filesystem is the only source of
//! truth, so every listing goes straight to `read_dir`.

use crate::error::{MedReportsError, Result};
use chrono::{DateTime, Local};
use log::{debug, info, warn};
use std::fs::{self, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Name of the folder created under the user's home directory
pub const DEFAULT_FOLDER_NAME: &str = "MedicalReports";

/// Specialties created on first launch, in display order
pub const BUILTIN_CATEGORIES: [&str; 20] = [
    "Cardiology",
    "Dermatology",
    "Endocrinology",
    "Gastroenterology",
    "Hematology",
    "Immunology",
    "Nephrology",
    "Neurology",
    "Oncology",
    "Ophthalmology",
    "Orthopedics",
    "Otolaryngology",
    "Pediatrics",
    "Psychiatry",
    "Pulmonology",
    "Radiology",
    "Rheumatology",
    "Urology",
    "General Medicine",
    "Other",
];

/// Default base directory (`~/MedicalReports`)
pub fn default_base_directory() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_FOLDER_NAME))
}

/// Which part of the catalog a listing covers
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every known specialty, in catalog order
    #[default]
    All,
    /// A single specialty
    Category(String),
}

impl Scope {
    pub fn label(&self) -> &str {
        match self {
            Scope::All => "All",
            Scope::Category(name) => name,
        }
    }
}

/// Identity of a report row: the owning specialty and the file name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub category: String,
    pub filename: String,
}

impl RowKey {
    pub fn new(category: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            filename: filename.into(),
        }
    }
}

/// A report file as surfaced to the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub name: String,
    pub category: String,
    pub path: PathBuf,
    pub size: u64,
    pub created: DateTime<Local>,
}

impl ReportEntry {
    /// Builds an entry from a file inside a specialty directory.
    ///
    /// The timestamp is the filesystem birth time when the platform records
    /// one, otherwise the modification time.
    pub fn from_path(path: &Path, category: &str) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;
        let created = metadata.created().or_else(|_| metadata.modified())?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "non UTF-8 file name"))?
            .to_string();

        Ok(ReportEntry {
            path: path.to_path_buf(),
            name,
            category: category.to_string(),
            size: metadata.len(),
            created: created.into(),
        })
    }

    pub fn key(&self) -> RowKey {
        RowKey::new(self.category.clone(), self.name.clone())
    }
}

/// What happened to a single source file during an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Copied into a free slot
    Imported,
    /// Copied over an existing file after the caller agreed
    Replaced,
    /// A same-named file exists and the caller declined to overwrite it
    Skipped,
}

/// Per-file result of a batch import
#[derive(Debug)]
pub struct ImportReport {
    pub source: PathBuf,
    pub result: Result<ImportOutcome>,
}

/// Creates the base directory and one directory per category.
///
/// Already existing directories are left alone.
pub fn ensure_layout<S: AsRef<str>>(base_dir: &Path, categories: &[S]) -> Result<()> {
    create_dir(base_dir)?;
    for category in categories {
        create_dir(&base_dir.join(category.as_ref()))?;
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| MedReportsError::LayoutCreation {
        path: path.to_path_buf(),
        source,
    })
}

/// Rejects names that would escape the base directory or map to no directory
pub fn validate_category_name(name: &str) -> Result<()> {
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if invalid {
        return Err(MedReportsError::InvalidCategoryName(name.to_string()));
    }
    Ok(())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\', '\0'])
}

/// The set of known specialties and the directory tree that backs them
#[derive(Debug, Clone)]
pub struct Catalog {
    base_dir: PathBuf,
    categories: Vec<String>,
}

impl Catalog {
    /// Opens the catalog rooted at `base_dir`.
    ///
    /// Creates the layout for `builtin`, then registers any other specialty
    /// directories already present (sorted by name, after the built-ins) so
    /// that specialties added in earlier sessions come back.
    pub fn open<S: AsRef<str>>(base_dir: &Path, builtin: &[S]) -> Result<Self> {
        let mut catalog = Self::with_categories(
            base_dir,
            builtin.iter().map(|c| c.as_ref().to_string()).collect(),
        )?;

        let mut discovered = Vec::new();
        for entry in fs::read_dir(base_dir)?.flatten() {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') || catalog.contains(&name) {
                continue;
            }
            discovered.push(name);
        }
        discovered.sort();

        if !discovered.is_empty() {
            info!("Found {} additional specialties on disk", discovered.len());
        }
        catalog.categories.extend(discovered);
        Ok(catalog)
    }

    /// Builds a catalog for exactly `categories`, creating any missing directories
    pub fn with_categories(base_dir: &Path, categories: Vec<String>) -> Result<Self> {
        ensure_layout(base_dir, categories.as_slice())?;
        debug!(
            "Catalog layout ready at {} ({} specialties)",
            base_dir.display(),
            categories.len()
        );
        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            categories,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c == name)
    }

    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.base_dir.join(category)
    }

    pub fn file_path(&self, key: &RowKey) -> PathBuf {
        self.category_dir(&key.category).join(&key.filename)
    }

    fn require_known(&self, category: &str) -> Result<()> {
        if self.contains(category) {
            Ok(())
        } else {
            Err(MedReportsError::UnknownCategory(category.to_string()))
        }
    }

    /// Registers a new specialty and creates its directory.
    ///
    /// The name is only registered once its directory exists.
    pub fn add_category(&mut self, name: &str) -> Result<()> {
        validate_category_name(name)?;
        if self.contains(name) {
            return Err(MedReportsError::DuplicateCategory(name.to_string()));
        }

        create_dir(&self.category_dir(name))?;
        self.categories.push(name.to_string());
        info!("Added specialty '{}'", name);
        Ok(())
    }

    /// Where `source` would land when imported into `category`
    pub fn destination_for(&self, source: &Path, category: &str) -> Result<PathBuf> {
        self.require_known(category)?;
        let file_name = source.file_name().ok_or_else(|| MedReportsError::Import {
            path: source.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        })?;
        Ok(self.category_dir(category).join(file_name))
    }

    /// Whether importing `source` into `category` would replace an existing file
    pub fn would_overwrite(&self, source: &Path, category: &str) -> Result<bool> {
        Ok(self.destination_for(source, category)?.exists())
    }

    /// Copies one file into a specialty directory, keeping its name.
    ///
    /// When a same-named file exists the copy only happens if `overwrite`
    /// is set; otherwise the call returns [`ImportOutcome::Skipped`].
    /// Permissions and access/modification times are carried over.
    pub fn import_file(
        &self,
        source: &Path,
        category: &str,
        overwrite: bool,
    ) -> Result<ImportOutcome> {
        let destination = self.destination_for(source, category)?;
        let import_err = |source_err: io::Error| MedReportsError::Import {
            path: source.to_path_buf(),
            source: source_err,
        };

        let source_meta = fs::metadata(source).map_err(import_err)?;
        if !source_meta.is_file() {
            return Err(import_err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "source is not a regular file",
            )));
        }

        let exists = destination.exists();
        if exists {
            if !overwrite {
                info!(
                    "Skipped {}: already present in {}",
                    destination.display(),
                    category
                );
                return Ok(ImportOutcome::Skipped);
            }
            if is_same_file(source, &destination) {
                // Copying a file onto itself would truncate it
                return Ok(ImportOutcome::Skipped);
            }
        }

        fs::copy(source, &destination).map_err(import_err)?;
        preserve_times(&source_meta, &destination);

        info!("Imported {} into {}", source.display(), category);
        Ok(if exists {
            ImportOutcome::Replaced
        } else {
            ImportOutcome::Imported
        })
    }

    /// Imports several files, asking `confirm_overwrite` for each collision.
    ///
    /// Every source is handled on its own: a failure or a skip never stops
    /// the remaining files.
    pub fn import_files<F>(
        &self,
        sources: &[PathBuf],
        category: &str,
        mut confirm_overwrite: F,
    ) -> Vec<ImportReport>
    where
        F: FnMut(&Path) -> bool,
    {
        sources
            .iter()
            .map(|source| {
                let result = self.would_overwrite(source, category).and_then(|exists| {
                    let overwrite = exists && confirm_overwrite(source);
                    self.import_file(source, category, overwrite)
                });
                if let Err(e) = &result {
                    warn!("{}", e);
                }
                ImportReport {
                    source: source.clone(),
                    result,
                }
            })
            .collect()
    }

    /// Lists the regular files directly inside one specialty directory,
    /// sorted by file name. A missing directory yields an empty list.
    pub fn list_category(&self, category: &str) -> Vec<ReportEntry> {
        let dir = self.category_dir(category);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!("Cannot read {}: {}", dir.display(), e);
                return Vec::new();
            }
        };

        let mut files: Vec<ReportEntry> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| match ReportEntry::from_path(&path, category) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }

    /// Lists every file in `scope`: catalog order, then file name
    pub fn list_files(&self, scope: &Scope) -> Vec<ReportEntry> {
        match scope {
            Scope::All => self
                .categories
                .iter()
                .flat_map(|category| self.list_category(category))
                .collect(),
            Scope::Category(category) => self.list_category(category),
        }
    }

    /// Path of an existing report in a known specialty
    pub fn report_path(&self, category: &str, filename: &str) -> Result<PathBuf> {
        self.require_known(category)?;
        let path = self.category_dir(category).join(filename);
        if !is_plain_file_name(filename) || !path.is_file() {
            return Err(MedReportsError::NotFound {
                category: category.to_string(),
                filename: filename.to_string(),
            });
        }
        Ok(path)
    }

    /// Removes a report file from its specialty directory
    pub fn delete_file(&self, category: &str, filename: &str) -> Result<()> {
        let not_found = || MedReportsError::NotFound {
            category: category.to_string(),
            filename: filename.to_string(),
        };
        if !self.contains(category) || !is_plain_file_name(filename) {
            return Err(not_found());
        }

        let path = self.category_dir(category).join(filename);
        match fs::symlink_metadata(&path) {
            Ok(meta) if !meta.is_dir() => {}
            Ok(_) => return Err(not_found()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
            Err(source) => return Err(MedReportsError::Delete { path, source }),
        }

        fs::remove_file(&path).map_err(|source| MedReportsError::Delete {
            path: path.clone(),
            source,
        })?;
        info!("Deleted {}", path.display());
        Ok(())
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn preserve_times(source_meta: &fs::Metadata, destination: &Path) {
    let mut times = FileTimes::new();
    if let Ok(accessed) = source_meta.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = source_meta.modified() {
        times = times.set_modified(modified);
    }

    let result = OpenOptions::new()
        .write(true)
        .open(destination)
        .and_then(|file| file.set_times(times));
    if let Err(e) = result {
        debug!("Could not copy timestamps to {}: {}", destination.display(), e);
    }
}

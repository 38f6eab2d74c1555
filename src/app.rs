//! Application state and the commands the UI dispatches against it
//!
//! Every user action becomes a [`Command`]. [`App::dispatch`] runs it against
//! the catalog, records a [`Notice`] for the status line and recomputes the
//! visible rows. The UI never touches the catalog directly.

use crate::catalog::{Catalog, ImportOutcome, ReportEntry, RowKey, Scope};
use crate::error::MedReportsError;
use crate::view::{compute_filtered, ViewFilter};
use log::{info, warn};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// A discrete user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show all specialties or a single one
    SelectScope(Scope),
    /// Apply a (debounced) search text
    ApplySearch(String),
    /// Register a new specialty and select it
    AddCategory(String),
    /// Copy files into the selected specialty
    Import(Vec<PathBuf>),
    /// Answer the pending overwrite question
    ResolveConflict(bool),
    /// Remove the report identified by the key
    Delete(RowKey),
    /// Re-read the filesystem
    Refresh,
}

/// Message shown to the user after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Info(m) | Notice::Warning(m) | Notice::Error(m) => m,
        }
    }
}

/// Counts for the import batch currently in progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportTally {
    pub imported: usize,
    pub replaced: usize,
    pub skipped: usize,
    pub failures: Vec<String>,
}

impl ImportTally {
    fn record(&mut self, result: Result<ImportOutcome, MedReportsError>) {
        match result {
            Ok(ImportOutcome::Imported) => self.imported += 1,
            Ok(ImportOutcome::Replaced) => self.replaced += 1,
            Ok(ImportOutcome::Skipped) => self.skipped += 1,
            Err(e) => {
                warn!("{}", e);
                self.failures.push(e.to_string());
            }
        }
    }

    fn summary(&self) -> Notice {
        let copied = self.imported + self.replaced;
        let mut text = format!("Imported {} report(s)", copied);
        if self.skipped > 0 {
            text.push_str(&format!(", skipped {}", self.skipped));
        }
        match self.failures.first() {
            Some(first) => Notice::Error(format!(
                "{}, failed {}: {}",
                text,
                self.failures.len(),
                first
            )),
            None => Notice::Info(text),
        }
    }
}

/// Import batch waiting on the queue or on an overwrite decision
#[derive(Debug)]
struct ImportBatch {
    category: String,
    queue: VecDeque<PathBuf>,
    conflict: Option<PathBuf>,
    tally: ImportTally,
}

/// Owned application state: catalog, filter and the rows they produce
#[derive(Debug)]
pub struct App {
    catalog: Catalog,
    filter: ViewFilter,
    rows: Vec<ReportEntry>,
    selected: usize,
    import: Option<ImportBatch>,
    notice: Option<Notice>,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let mut app = Self {
            catalog,
            filter: ViewFilter::default(),
            rows: Vec::new(),
            selected: 0,
            import: None,
            notice: None,
        };
        app.refresh();
        app
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    pub fn rows(&self) -> &[ReportEntry] {
        &self.rows
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&ReportEntry> {
        self.rows.get(self.selected)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    /// Looks a row up by its identity
    pub fn row(&self, key: &RowKey) -> Option<&ReportEntry> {
        self.rows.iter().find(|row| row.key() == *key)
    }

    /// Source file waiting on an overwrite decision, with its target specialty
    pub fn pending_conflict(&self) -> Option<(&Path, &str)> {
        let batch = self.import.as_ref()?;
        let source = batch.conflict.as_deref()?;
        Some((source, batch.category.as_str()))
    }

    pub fn select_next(&mut self) {
        if self.selected < self.rows.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Scope after (or before) the current one: All, then each specialty
    pub fn adjacent_scope(&self, forward: bool) -> Scope {
        let categories = self.catalog.categories();
        if categories.is_empty() {
            return Scope::All;
        }
        // Position 0 is "All", specialty i sits at i + 1
        let slots = categories.len() + 1;
        let current = match &self.filter.scope {
            Scope::All => 0,
            Scope::Category(name) => categories
                .iter()
                .position(|c| c == name)
                .map_or(0, |i| i + 1),
        };
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        match next {
            0 => Scope::All,
            i => Scope::Category(categories[i - 1].clone()),
        }
    }

    /// Runs a command and recomputes the view
    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::SelectScope(scope) => self.select_scope(scope),
            Command::ApplySearch(text) => {
                self.filter.search = text.trim().to_string();
                self.refresh();
            }
            Command::AddCategory(name) => self.add_category(&name),
            Command::Import(sources) => self.start_import(sources),
            Command::ResolveConflict(overwrite) => self.resolve_conflict(overwrite),
            Command::Delete(key) => self.delete(&key),
            Command::Refresh => self.refresh(),
        }
    }

    fn select_scope(&mut self, scope: Scope) {
        if let Scope::Category(name) = &scope {
            if !self.catalog.contains(name) {
                self.notice = Some(Notice::Warning(format!("Unknown specialty: {}", name)));
                return;
            }
        }
        self.filter.scope = scope;
        self.selected = 0;
        self.refresh();
    }

    fn add_category(&mut self, name: &str) {
        match self.catalog.add_category(name) {
            Ok(()) => {
                self.notice = Some(Notice::Info(format!("Added specialty {}", name)));
                self.filter.scope = Scope::Category(name.to_string());
                self.selected = 0;
            }
            Err(MedReportsError::DuplicateCategory(_)) => {
                self.notice = Some(Notice::Warning("This specialty already exists!".to_string()));
            }
            Err(e) => {
                warn!("{}", e);
                self.notice = Some(Notice::Error(e.to_string()));
            }
        }
        self.refresh();
    }

    fn start_import(&mut self, sources: Vec<PathBuf>) {
        if self.import.is_some() {
            self.notice = Some(Notice::Warning(
                "An import is already waiting for confirmation".to_string(),
            ));
            return;
        }
        let Scope::Category(category) = &self.filter.scope else {
            self.notice = Some(Notice::Warning(
                "Select a specialty before importing".to_string(),
            ));
            return;
        };
        if sources.is_empty() {
            return;
        }

        info!("Importing {} file(s) into {}", sources.len(), category);
        self.import = Some(ImportBatch {
            category: category.clone(),
            queue: sources.into(),
            conflict: None,
            tally: ImportTally::default(),
        });
        self.advance_import();
    }

    fn resolve_conflict(&mut self, overwrite: bool) {
        let Some(batch) = self.import.as_mut() else {
            return;
        };
        let Some(source) = batch.conflict.take() else {
            return;
        };
        let result = self.catalog.import_file(&source, &batch.category, overwrite);
        batch.tally.record(result);
        self.refresh();
        self.advance_import();
    }

    /// Imports queued files until the queue drains or a collision needs an answer
    fn advance_import(&mut self) {
        let Some(batch) = self.import.as_mut() else {
            return;
        };

        while let Some(source) = batch.queue.pop_front() {
            match self.catalog.would_overwrite(&source, &batch.category) {
                Ok(true) => {
                    batch.conflict = Some(source);
                    return;
                }
                Ok(false) => {
                    let result = self.catalog.import_file(&source, &batch.category, false);
                    batch.tally.record(result);
                    self.rows = compute_filtered(&self.catalog, &self.filter);
                }
                Err(e) => batch.tally.record(Err(e)),
            }
        }

        if let Some(batch) = self.import.take() {
            self.notice = Some(batch.tally.summary());
        }
        self.refresh();
    }

    fn delete(&mut self, key: &RowKey) {
        match self.catalog.delete_file(&key.category, &key.filename) {
            Ok(()) => {
                self.notice = Some(Notice::Info("Report deleted successfully.".to_string()));
            }
            Err(e) => {
                warn!("{}", e);
                self.notice = Some(Notice::Error(format!("Failed to delete report: {}", e)));
            }
        }
        self.refresh();
    }

    /// Full recomputation of the visible rows, keeping the selected row when it survives
    pub fn refresh(&mut self) {
        let previous = self.selected_row().map(ReportEntry::key);
        self.rows = compute_filtered(&self.catalog, &self.filter);
        self.selected = previous
            .and_then(|key| self.rows.iter().position(|row| row.key() == key))
            .unwrap_or_else(|| self.selected.min(self.rows.len().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BUILTIN_CATEGORIES;
    use std::fs;
    use tempfile::TempDir;

    fn test_app() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let catalog = Catalog::open(&temp_dir.path().join("reports"), &BUILTIN_CATEGORIES).unwrap();
        (temp_dir, App::new(catalog))
    }

    fn source(temp: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let dir = temp.path().join("incoming");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn names(app: &App) -> Vec<String> {
        app.rows().iter().map(|r| r.name.clone()).collect()
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_new_app_shows_all_scope() {
            let (_temp, app) = test_app();
            assert_eq!(app.filter().scope, Scope::All);
            assert!(app.rows().is_empty());
        }

        #[test]
        fn test_search_recomputes_rows() {
            let (_temp, mut app) = test_app();
            let dir = app.catalog().category_dir("Radiology");
            fs::write(dir.join("chest_xray.pdf"), b"x").unwrap();
            fs::write(dir.join("knee_mri.pdf"), b"m").unwrap();
            app.dispatch(Command::Refresh);
            assert_eq!(app.rows().len(), 2);

            app.dispatch(Command::ApplySearch("  CHEST ".to_string()));

            assert_eq!(app.filter().search, "CHEST");
            assert_eq!(names(&app), vec!["chest_xray.pdf"]);
        }

        #[test]
        fn test_select_unknown_scope_is_rejected() {
            let (_temp, mut app) = test_app();

            app.dispatch(Command::SelectScope(Scope::Category("Astrology".into())));

            assert_eq!(app.filter().scope, Scope::All);
            assert!(matches!(app.notice(), Some(Notice::Warning(_))));
        }

        #[test]
        fn test_adjacent_scope_cycles_through_all() {
            let (_temp, mut app) = test_app();
            assert_eq!(
                app.adjacent_scope(true),
                Scope::Category("Cardiology".into())
            );
            assert_eq!(app.adjacent_scope(false), Scope::Category("Other".into()));

            app.dispatch(Command::SelectScope(Scope::Category("Other".into())));
            assert_eq!(app.adjacent_scope(true), Scope::All);
        }

        #[test]
        fn test_selection_follows_row_identity() {
            let (_temp, mut app) = test_app();
            let dir = app.catalog().category_dir("Oncology");
            fs::write(dir.join("b.pdf"), b"b").unwrap();
            fs::write(dir.join("c.pdf"), b"c").unwrap();
            app.dispatch(Command::Refresh);
            app.select_next();
            assert_eq!(app.selected_row().unwrap().name, "c.pdf");

            fs::write(dir.join("a.pdf"), b"a").unwrap();
            app.dispatch(Command::Refresh);

            assert_eq!(app.selected_row().unwrap().name, "c.pdf");
        }
    }

    mod category_tests {
        use super::*;

        #[test]
        fn test_add_category_selects_it() {
            let (_temp, mut app) = test_app();

            app.dispatch(Command::AddCategory("Sports Medicine".to_string()));

            assert_eq!(
                app.filter().scope,
                Scope::Category("Sports Medicine".into())
            );
            assert!(app.catalog().contains("Sports Medicine"));
            assert!(matches!(app.notice(), Some(Notice::Info(_))));
        }

        #[test]
        fn test_add_duplicate_warns() {
            let (_temp, mut app) = test_app();

            app.dispatch(Command::AddCategory("Urology".to_string()));

            assert_eq!(
                app.notice(),
                Some(&Notice::Warning("This specialty already exists!".to_string()))
            );
            assert_eq!(app.catalog().categories().len(), BUILTIN_CATEGORIES.len());
            assert_eq!(app.filter().scope, Scope::All);
        }
    }

    mod import_tests {
        use super::*;

        #[test]
        fn test_import_requires_a_specialty() {
            let (temp, mut app) = test_app();
            let file = source(&temp, "scan.pdf", b"scan");

            app.dispatch(Command::Import(vec![file]));

            assert!(matches!(app.notice(), Some(Notice::Warning(_))));
            assert!(app.rows().is_empty());
        }

        #[test]
        fn test_import_refreshes_view() {
            let (temp, mut app) = test_app();
            let file = source(&temp, "scan.pdf", b"scan");
            app.dispatch(Command::SelectScope(Scope::Category("Radiology".into())));

            app.dispatch(Command::Import(vec![file]));

            assert_eq!(names(&app), vec!["scan.pdf"]);
            assert_eq!(
                app.notice(),
                Some(&Notice::Info("Imported 1 report(s)".to_string()))
            );
        }

        #[test]
        fn test_collision_pauses_until_resolved() {
            let (temp, mut app) = test_app();
            app.dispatch(Command::SelectScope(Scope::Category("Cardiology".into())));
            let ecg = source(&temp, "ecg.pdf", b"old");
            app.dispatch(Command::Import(vec![ecg.clone()]));
            fs::write(&ecg, b"new").unwrap();
            let echo = source(&temp, "echo.pdf", b"echo");

            app.dispatch(Command::Import(vec![ecg.clone(), echo]));

            let (pending, category) = app.pending_conflict().unwrap();
            assert_eq!(pending, ecg.as_path());
            assert_eq!(category, "Cardiology");
            assert_eq!(names(&app), vec!["ecg.pdf"]);

            app.dispatch(Command::ResolveConflict(true));

            assert!(app.pending_conflict().is_none());
            assert_eq!(names(&app), vec!["ecg.pdf", "echo.pdf"]);
            let dest = app.catalog().category_dir("Cardiology").join("ecg.pdf");
            assert_eq!(fs::read(dest).unwrap(), b"new");
        }

        #[test]
        fn test_declined_overwrite_keeps_original() {
            let (temp, mut app) = test_app();
            app.dispatch(Command::SelectScope(Scope::Category("Cardiology".into())));
            let ecg = source(&temp, "ecg.pdf", b"old");
            app.dispatch(Command::Import(vec![ecg.clone()]));
            fs::write(&ecg, b"new").unwrap();

            app.dispatch(Command::Import(vec![ecg]));
            app.dispatch(Command::ResolveConflict(false));

            let dest = app.catalog().category_dir("Cardiology").join("ecg.pdf");
            assert_eq!(fs::read(dest).unwrap(), b"old");
            assert_eq!(
                app.notice(),
                Some(&Notice::Info("Imported 0 report(s), skipped 1".to_string()))
            );
        }

        #[test]
        fn test_failed_file_does_not_stop_batch() {
            let (temp, mut app) = test_app();
            app.dispatch(Command::SelectScope(Scope::Category("Neurology".into())));
            let missing = temp.path().join("missing.pdf");
            let eeg = source(&temp, "eeg.pdf", b"eeg");

            app.dispatch(Command::Import(vec![missing, eeg]));

            assert_eq!(names(&app), vec!["eeg.pdf"]);
            assert!(matches!(app.notice(), Some(Notice::Error(_))));
        }
    }

    mod delete_tests {
        use super::*;

        #[test]
        fn test_delete_by_key() {
            let (_temp, mut app) = test_app();
            fs::write(app.catalog().category_dir("Psychiatry").join("eval.pdf"), b"e").unwrap();
            app.dispatch(Command::Refresh);
            let key = app.selected_row().unwrap().key();

            app.dispatch(Command::Delete(key.clone()));

            assert!(app.row(&key).is_none());
            assert_eq!(
                app.notice(),
                Some(&Notice::Info("Report deleted successfully.".to_string()))
            );
        }

        #[test]
        fn test_delete_missing_reports_error() {
            let (_temp, mut app) = test_app();

            app.dispatch(Command::Delete(RowKey::new("Psychiatry", "ghost.pdf")));

            match app.notice() {
                Some(Notice::Error(message)) => assert!(message.contains("ghost.pdf")),
                other => panic!("unexpected notice: {:?}", other),
            }
        }
    }
}

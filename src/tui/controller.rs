//! Turns key events into [`Command`]s and drives the search debounce
//!
//! Everything here runs on the event loop thread; the debounce timer is just
//! a deadline that [`tick`] checks on each pass.

use super::input::{handle_confirm_input, handle_key_event, handle_text_input, KeyAction, TextInput};
use super::{PromptKind, ViewState};
use crate::app::{App, Command, Notice};
use crate::catalog::Scope;
use crate::debounce::{Debouncer, DEFAULT_SEARCH_DELAY};
use crossterm::event::KeyEvent;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Longest wait between event polls
const MAX_POLL: Duration = Duration::from_millis(100);

/// Side effects the event loop has to carry out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    None,
    Quit,
    /// Hand the file to the default application
    Open(PathBuf),
    /// The first-run screen was dismissed and should not come back
    WelcomeDismissed,
}

/// Transient UI state: current screen, text fields and the search timer
#[derive(Debug)]
pub struct UiState {
    pub view: ViewState,
    pub search_input: String,
    pub prompt_input: String,
    pub(crate) search: Debouncer<String>,
}

impl UiState {
    pub fn new(search_delay: Duration, show_welcome: bool) -> Self {
        Self {
            view: if show_welcome {
                ViewState::Welcome
            } else {
                ViewState::Browsing
            },
            search_input: String::new(),
            prompt_input: String::new(),
            search: Debouncer::new(search_delay),
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt_input.clear();
        self.view = ViewState::Prompt(kind);
    }

    /// Switches to the overwrite question whenever an import is waiting on one
    fn sync_with(&mut self, app: &App) {
        if app.pending_conflict().is_some() {
            self.view = ViewState::ConfirmOverwrite;
        } else if self.view == ViewState::ConfirmOverwrite {
            self.view = ViewState::Browsing;
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DELAY, false)
    }
}

/// Applies the pending search once its quiet period is over.
///
/// Returns true when the view was recomputed.
pub fn tick(ui: &mut UiState, app: &mut App, now: Instant) -> bool {
    match ui.search.poll(now) {
        Some(text) => {
            app.dispatch(Command::ApplySearch(text));
            true
        }
        None => false,
    }
}

/// How long the event loop may block waiting for input
pub fn poll_timeout(ui: &UiState, now: Instant) -> Duration {
    ui.search
        .remaining(now)
        .map_or(MAX_POLL, |remaining| remaining.min(MAX_POLL))
}

/// Splits an import prompt into paths.
///
/// Paths are separated by whitespace. Quotes (as added by drag and drop) and
/// backslash escapes keep spaces inside one path, and a leading `~/` expands
/// to the home directory.
pub fn parse_import_paths(input: &str) -> Vec<PathBuf> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, '\\') => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }

    words
        .into_iter()
        .filter(|word| !word.is_empty())
        .map(|word| expand_home(&word))
        .collect()
}

fn expand_home(word: &str) -> PathBuf {
    if let Some(rest) = word.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(word)
}

/// Handles one key press in the current screen
pub fn handle_key(ui: &mut UiState, app: &mut App, key: KeyEvent, now: Instant) -> UiEffect {
    let effect = match ui.view.clone() {
        ViewState::Welcome => {
            ui.view = ViewState::Browsing;
            UiEffect::WelcomeDismissed
        }
        ViewState::Help => {
            if matches!(
                handle_key_event(key),
                KeyAction::Help | KeyAction::Quit | KeyAction::None
            ) {
                ui.view = ViewState::Browsing;
            }
            UiEffect::None
        }
        ViewState::Searching => {
            handle_search_key(ui, app, key, now);
            UiEffect::None
        }
        ViewState::Prompt(kind) => {
            handle_prompt_key(ui, app, kind, key);
            UiEffect::None
        }
        ViewState::ConfirmDelete(row_key) => {
            match handle_confirm_input(key) {
                KeyAction::Confirm => {
                    app.dispatch(Command::Delete(row_key));
                    ui.view = ViewState::Browsing;
                }
                KeyAction::Cancel => ui.view = ViewState::Browsing,
                _ => {}
            }
            UiEffect::None
        }
        ViewState::ConfirmOverwrite => {
            match handle_confirm_input(key) {
                KeyAction::Confirm => app.dispatch(Command::ResolveConflict(true)),
                KeyAction::Cancel => app.dispatch(Command::ResolveConflict(false)),
                _ => {}
            }
            UiEffect::None
        }
        ViewState::Browsing => handle_browsing_key(ui, app, key),
    };

    ui.sync_with(app);
    effect
}

fn handle_browsing_key(ui: &mut UiState, app: &mut App, key: KeyEvent) -> UiEffect {
    match handle_key_event(key) {
        KeyAction::Quit => return UiEffect::Quit,
        KeyAction::Next => app.select_next(),
        KeyAction::Previous => app.select_previous(),
        KeyAction::NextScope => app.dispatch(Command::SelectScope(app.adjacent_scope(true))),
        KeyAction::PreviousScope => {
            app.dispatch(Command::SelectScope(app.adjacent_scope(false)))
        }
        KeyAction::Search => ui.view = ViewState::Searching,
        KeyAction::Import => {
            if app.filter().scope == Scope::All {
                app.set_notice(Notice::Warning(
                    "Select a specialty before importing".to_string(),
                ));
            } else {
                ui.open_prompt(PromptKind::ImportPath);
            }
        }
        KeyAction::AddCategory => ui.open_prompt(PromptKind::AddCategory),
        KeyAction::Delete => {
            if let Some(row) = app.selected_row() {
                ui.view = ViewState::ConfirmDelete(row.key());
            }
        }
        KeyAction::Open => {
            if let Some(row) = app.selected_row() {
                return UiEffect::Open(row.path.clone());
            }
        }
        KeyAction::Refresh => app.dispatch(Command::Refresh),
        KeyAction::Help => ui.view = ViewState::Help,
        KeyAction::Confirm | KeyAction::Cancel | KeyAction::None => {}
    }
    UiEffect::None
}

fn handle_search_key(ui: &mut UiState, app: &mut App, key: KeyEvent, now: Instant) {
    match handle_text_input(key) {
        TextInput::Insert(c) => {
            ui.search_input.push(c);
            ui.search.schedule(ui.search_input.clone(), now);
        }
        TextInput::Backspace => {
            if ui.search_input.pop().is_some() {
                ui.search.schedule(ui.search_input.clone(), now);
            }
        }
        TextInput::Submit => {
            // Enter applies right away instead of waiting out the timer
            ui.search.cancel();
            app.dispatch(Command::ApplySearch(ui.search_input.clone()));
            ui.view = ViewState::Browsing;
        }
        TextInput::Cancel => ui.view = ViewState::Browsing,
        TextInput::None => {}
    }
}

fn handle_prompt_key(ui: &mut UiState, app: &mut App, kind: PromptKind, key: KeyEvent) {
    match handle_text_input(key) {
        TextInput::Insert(c) => ui.prompt_input.push(c),
        TextInput::Backspace => {
            ui.prompt_input.pop();
        }
        TextInput::Submit => {
            ui.view = ViewState::Browsing;
            let input = std::mem::take(&mut ui.prompt_input);
            match kind {
                PromptKind::AddCategory => {
                    let name = input.trim();
                    if !name.is_empty() {
                        app.dispatch(Command::AddCategory(name.to_string()));
                    }
                }
                PromptKind::ImportPath => {
                    let paths = parse_import_paths(&input);
                    if !paths.is_empty() {
                        app.dispatch(Command::Import(paths));
                    }
                }
            }
        }
        TextInput::Cancel => {
            ui.prompt_input.clear();
            ui.view = ViewState::Browsing;
        }
        TextInput::None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, RowKey, BUILTIN_CATEGORIES};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::fs;
    use tempfile::TempDir;

    fn test_app() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let catalog = Catalog::open(&temp_dir.path().join("reports"), &BUILTIN_CATEGORIES).unwrap();
        (temp_dir, App::new(catalog))
    }

    fn press(ui: &mut UiState, app: &mut App, code: KeyCode, now: Instant) -> UiEffect {
        handle_key(ui, app, KeyEvent::new(code, KeyModifiers::NONE), now)
    }

    fn type_text(ui: &mut UiState, app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            press(ui, app, KeyCode::Char(c), now);
        }
    }

    mod search_tests {
        use super::*;

        #[test]
        fn test_typing_is_debounced() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            let start = Instant::now();
            let ms = Duration::from_millis;

            press(&mut ui, &mut app, KeyCode::Char('/'), start);
            press(&mut ui, &mut app, KeyCode::Char('a'), start);
            press(&mut ui, &mut app, KeyCode::Char('b'), start + ms(100));
            press(&mut ui, &mut app, KeyCode::Char('c'), start + ms(200));

            assert!(!tick(&mut ui, &mut app, start + ms(600)));
            assert_eq!(app.filter().search, "");
            assert!(tick(&mut ui, &mut app, start + ms(700)));
            assert_eq!(app.filter().search, "abc");
            assert!(!tick(&mut ui, &mut app, start + ms(1500)));
        }

        #[test]
        fn test_enter_applies_immediately() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            let now = Instant::now();

            press(&mut ui, &mut app, KeyCode::Char('/'), now);
            type_text(&mut ui, &mut app, "ecg", now);
            press(&mut ui, &mut app, KeyCode::Enter, now);

            assert_eq!(app.filter().search, "ecg");
            assert_eq!(ui.view, ViewState::Browsing);
            assert!(!tick(&mut ui, &mut app, now + Duration::from_secs(5)));
        }

        #[test]
        fn test_search_mode_captures_command_keys() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            let now = Instant::now();

            press(&mut ui, &mut app, KeyCode::Char('/'), now);
            let effect = press(&mut ui, &mut app, KeyCode::Char('q'), now);

            assert_eq!(effect, UiEffect::None);
            assert_eq!(ui.search_input, "q");
        }

        #[test]
        fn test_poll_timeout_shrinks_while_pending() {
            let mut ui = UiState::default();
            let now = Instant::now();
            assert_eq!(poll_timeout(&ui, now), MAX_POLL);

            ui.search.schedule("x".to_string(), now);

            assert_eq!(
                poll_timeout(&ui, now + Duration::from_millis(450)),
                Duration::from_millis(50)
            );
        }
    }

    mod action_tests {
        use super::*;

        #[test]
        fn test_quit() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            assert_eq!(
                press(&mut ui, &mut app, KeyCode::Char('q'), Instant::now()),
                UiEffect::Quit
            );
        }

        #[test]
        fn test_welcome_dismissed_by_any_key() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::new(DEFAULT_SEARCH_DELAY, true);

            let effect = press(&mut ui, &mut app, KeyCode::Char('q'), Instant::now());

            assert_eq!(effect, UiEffect::WelcomeDismissed);
            assert_eq!(ui.view, ViewState::Browsing);
        }

        #[test]
        fn test_import_in_all_scope_warns() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();

            press(&mut ui, &mut app, KeyCode::Char('i'), Instant::now());

            assert_eq!(ui.view, ViewState::Browsing);
            assert!(matches!(app.notice(), Some(Notice::Warning(_))));
        }

        #[test]
        fn test_import_prompt_and_overwrite_flow() {
            let (temp, mut app) = test_app();
            let mut ui = UiState::default();
            let now = Instant::now();
            let source = temp.path().join("scan.pdf");
            fs::write(&source, b"v1").unwrap();

            press(&mut ui, &mut app, KeyCode::Tab, now);
            assert_eq!(app.filter().scope, Scope::Category("Cardiology".into()));

            press(&mut ui, &mut app, KeyCode::Char('i'), now);
            type_text(&mut ui, &mut app, source.to_str().unwrap(), now);
            press(&mut ui, &mut app, KeyCode::Enter, now);
            assert_eq!(app.rows().len(), 1);
            assert_eq!(ui.view, ViewState::Browsing);

            fs::write(&source, b"v2").unwrap();
            press(&mut ui, &mut app, KeyCode::Char('i'), now);
            type_text(&mut ui, &mut app, source.to_str().unwrap(), now);
            press(&mut ui, &mut app, KeyCode::Enter, now);
            assert_eq!(ui.view, ViewState::ConfirmOverwrite);

            press(&mut ui, &mut app, KeyCode::Char('y'), now);

            assert_eq!(ui.view, ViewState::Browsing);
            let dest = app.catalog().category_dir("Cardiology").join("scan.pdf");
            assert_eq!(fs::read(dest).unwrap(), b"v2");
        }

        #[test]
        fn test_import_several_files_pauses_on_collision() {
            let (temp, mut app) = test_app();
            let mut ui = UiState::default();
            let now = Instant::now();
            let first = temp.path().join("ecg.pdf");
            let second = temp.path().join("echo scan.pdf");
            fs::write(&first, b"new ecg").unwrap();
            fs::write(&second, b"echo").unwrap();
            let existing = app.catalog().category_dir("Cardiology").join("ecg.pdf");
            fs::write(&existing, b"old ecg").unwrap();

            press(&mut ui, &mut app, KeyCode::Tab, now);
            press(&mut ui, &mut app, KeyCode::Char('i'), now);
            let input = format!("{} '{}'", first.display(), second.display());
            type_text(&mut ui, &mut app, &input, now);
            press(&mut ui, &mut app, KeyCode::Enter, now);
            assert_eq!(ui.view, ViewState::ConfirmOverwrite);

            press(&mut ui, &mut app, KeyCode::Char('n'), now);

            assert_eq!(ui.view, ViewState::Browsing);
            assert_eq!(fs::read(&existing).unwrap(), b"old ecg");
            let names: Vec<&str> = app.rows().iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["ecg.pdf", "echo scan.pdf"]);
        }

        #[test]
        fn test_delete_requires_confirmation() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            let now = Instant::now();
            fs::write(app.catalog().category_dir("Urology").join("u.pdf"), b"u").unwrap();
            app.dispatch(Command::Refresh);

            press(&mut ui, &mut app, KeyCode::Char('d'), now);
            assert_eq!(
                ui.view,
                ViewState::ConfirmDelete(RowKey::new("Urology", "u.pdf"))
            );
            press(&mut ui, &mut app, KeyCode::Char('n'), now);
            assert_eq!(app.rows().len(), 1);

            press(&mut ui, &mut app, KeyCode::Char('d'), now);
            press(&mut ui, &mut app, KeyCode::Char('y'), now);

            assert!(app.rows().is_empty());
            assert_eq!(ui.view, ViewState::Browsing);
        }

        #[test]
        fn test_open_returns_selected_path() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            let path = app.catalog().category_dir("Oncology").join("ct.pdf");
            fs::write(&path, b"ct").unwrap();
            app.dispatch(Command::Refresh);

            let effect = press(&mut ui, &mut app, KeyCode::Char('o'), Instant::now());

            assert_eq!(effect, UiEffect::Open(path));
        }

        #[test]
        fn test_add_category_prompt() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            let now = Instant::now();

            press(&mut ui, &mut app, KeyCode::Char('a'), now);
            type_text(&mut ui, &mut app, "  Allergy ", now);
            press(&mut ui, &mut app, KeyCode::Enter, now);

            assert!(app.catalog().contains("Allergy"));
            assert_eq!(app.filter().scope, Scope::Category("Allergy".into()));
        }

        #[test]
        fn test_prompt_cancel_discards_input() {
            let (_temp, mut app) = test_app();
            let mut ui = UiState::default();
            let now = Instant::now();

            press(&mut ui, &mut app, KeyCode::Char('a'), now);
            type_text(&mut ui, &mut app, "Allergy", now);
            press(&mut ui, &mut app, KeyCode::Esc, now);

            assert!(!app.catalog().contains("Allergy"));
            assert!(ui.prompt_input.is_empty());
        }
    }

    mod path_tests {
        use super::*;

        #[test]
        fn test_parse_single_path() {
            assert_eq!(parse_import_paths("  /a/b.pdf "), vec![PathBuf::from("/a/b.pdf")]);
            assert_eq!(
                parse_import_paths("'/a/my scan.pdf'"),
                vec![PathBuf::from("/a/my scan.pdf")]
            );
            assert_eq!(parse_import_paths("\"/a/c.png\""), vec![PathBuf::from("/a/c.png")]);
            assert!(parse_import_paths("   ").is_empty());
            assert!(parse_import_paths("''").is_empty());
        }

        #[test]
        fn test_parse_several_paths() {
            assert_eq!(
                parse_import_paths("/a/one.pdf  '/b/two scans.pdf' /c/my\\ x.png"),
                vec![
                    PathBuf::from("/a/one.pdf"),
                    PathBuf::from("/b/two scans.pdf"),
                    PathBuf::from("/c/my x.png"),
                ]
            );
        }

        #[test]
        fn test_parse_expands_home() {
            if let Some(home) = dirs::home_dir() {
                assert_eq!(
                    parse_import_paths("~/scans/x.pdf"),
                    vec![home.join("scans/x.pdf")]
                );
            }
        }
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Move to next report
    Next,
    /// Move to previous report
    Previous,
    /// Show the next specialty
    NextScope,
    /// Show the previous specialty
    PreviousScope,
    /// Focus the search box
    Search,
    /// Ask for a file to import
    Import,
    /// Ask for a new specialty name
    AddCategory,
    /// Delete the selected report
    Delete,
    /// Open the selected report
    Open,
    /// Re-read the report folders
    Refresh,
    /// Toggle help overlay
    Help,
    /// Confirm a pending question
    Confirm,
    /// Cancel a pending question
    Cancel,
    /// No action
    None,
}

/// Keystroke inside a text field (search box or prompt)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Insert(char),
    Backspace,
    Submit,
    Cancel,
    None,
}

/// Maps keyboard events to actions
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q, Esc or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Row navigation
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Previous,

        // Specialty selection
        (KeyCode::Tab, KeyModifiers::NONE) => KeyAction::NextScope,
        (KeyCode::BackTab, _) => KeyAction::PreviousScope,
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::NextScope,
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::PreviousScope,

        (KeyCode::Char('/'), KeyModifiers::NONE) => KeyAction::Search,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => KeyAction::Search,

        (KeyCode::Char('i'), KeyModifiers::NONE) => KeyAction::Import,
        (KeyCode::Char('a'), KeyModifiers::NONE) => KeyAction::AddCategory,
        (KeyCode::Char('d'), KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Delete, KeyModifiers::NONE) => KeyAction::Delete,
        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Refresh,

        // Help: ?
        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events to confirmation actions
/// Used for the delete and overwrite questions
pub fn handle_confirm_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Confirm: y
        (KeyCode::Char('y'), KeyModifiers::NONE) => KeyAction::Confirm,
        (KeyCode::Char('Y'), KeyModifiers::NONE | KeyModifiers::SHIFT) => KeyAction::Confirm,

        // Cancel: n, Esc or Enter (No is the default answer)
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('N'), KeyModifiers::NONE | KeyModifiers::SHIFT) => KeyAction::Cancel,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Cancel,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events inside a text field
pub fn handle_text_input(key: KeyEvent) -> TextInput {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => TextInput::Submit,
        (KeyCode::Esc, _) => TextInput::Cancel,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => TextInput::Cancel,
        (KeyCode::Backspace, _) => TextInput::Backspace,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => TextInput::Insert(c),
        _ => TextInput::None,
    }
}

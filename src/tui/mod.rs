// TUI module for rendering the terminal interface
pub mod colors;
pub mod controller;
pub mod helpers;
pub mod input;

// Re-exports
pub use colors::*;
pub use controller::{handle_key, poll_timeout, tick, UiEffect, UiState};
pub use helpers::{centered_rect, format_file_size, format_timestamp};
pub use input::{handle_confirm_input, handle_key_event, handle_text_input, KeyAction, TextInput};

use crate::app::{App, Notice};
use crate::catalog::{ReportEntry, RowKey};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use std::path::Path;

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main table view
    Browsing,
    /// Keystrokes go to the search box
    Searching,
    /// Single-line text prompt
    Prompt(PromptKind),
    /// Confirmation dialog before deleting a report
    ConfirmDelete(RowKey),
    /// Import collided with an existing file
    ConfirmOverwrite,
    /// Help overlay visible
    Help,
    /// Welcome screen shown on first launch
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    AddCategory,
    ImportPath,
}

impl PromptKind {
    fn title(self) -> &'static str {
        match self {
            PromptKind::AddCategory => " Add Specialty ",
            PromptKind::ImportPath => " Import Report ",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PromptKind::AddCategory => "Enter new medical specialty name:",
            PromptKind::ImportPath => "Report files to import (quote paths with spaces):",
        }
    }
}

/// Renders the whole screen, overlays included
pub fn render(frame: &mut Frame, app: &App, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Specialty + search
            Constraint::Min(0),    // Reports table
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app, ui);
    render_table(frame, chunks[1], app);
    render_status(frame, chunks[2], app.notice());
    render_footer(frame, chunks[3]);

    match &ui.view {
        ViewState::Help => render_help_overlay(frame),
        ViewState::Welcome => render_welcome_overlay(frame, app.catalog().base_dir()),
        ViewState::ConfirmDelete(key) => render_confirm_delete_overlay(frame, key),
        ViewState::ConfirmOverwrite => {
            if let Some((source, category)) = app.pending_conflict() {
                render_confirm_overwrite_overlay(frame, source, category);
            }
        }
        ViewState::Prompt(kind) => render_prompt_overlay(frame, *kind, &ui.prompt_input),
        ViewState::Browsing | ViewState::Searching => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let scope = Paragraph::new(Line::from(vec![
        Span::styled(" ◀ ", Style::default().fg(TEXT_SECONDARY)),
        Span::styled(
            app.filter().scope.label().to_string(),
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", Style::default().fg(TEXT_SECONDARY)),
    ]))
    .block(
        Block::default()
            .title(" Specialty ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );
    frame.render_widget(scope, chunks[0]);

    let searching = ui.view == ViewState::Searching;
    let search_line = if ui.search_input.is_empty() && !searching {
        Line::from(Span::styled(
            "Search reports...",
            Style::default()
                .fg(TEXT_SECONDARY)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        let mut spans = vec![Span::styled(
            ui.search_input.clone(),
            Style::default().fg(TEXT_PRIMARY),
        )];
        if searching {
            spans.push(Span::styled("▏", Style::default().fg(ACCENT_HIGHLIGHT)));
        }
        Line::from(spans)
    };
    let border = if searching {
        ACCENT_HIGHLIGHT
    } else {
        BORDER_COLOR
    };
    let search = Paragraph::new(search_line).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
    );
    frame.render_widget(search, chunks[1]);
}

fn report_row(entry: &ReportEntry) -> Row<'static> {
    Row::new(vec![
        Cell::from(entry.name.clone()),
        Cell::from(format_timestamp(&entry.created)),
        Cell::from(entry.category.clone()),
        Cell::from(format_file_size(entry.size)),
    ])
}

fn render_table(frame: &mut Frame, area: Rect, app: &App) {
    if app.rows().is_empty() {
        frame.render_widget(render_empty_state_widget(app), area);
        return;
    }

    let header = Row::new(vec!["Filename", "Date Added", "Specialty", "Size"]).style(
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = app.rows().iter().map(report_row).collect();
    let widths = [
        Constraint::Min(20),
        Constraint::Length(19),
        Constraint::Length(18),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(format!(" Reports ({}) ", app.rows().len())),
        )
        .style(Style::default().fg(TEXT_PRIMARY))
        .highlight_style(
            Style::default()
                .fg(BG_DARK)
                .bg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = TableState::default().with_selected(Some(app.selected_index()));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Creates an empty state widget for when no reports match
fn render_empty_state_widget(app: &App) -> Paragraph<'static> {
    let hint = if app.filter().search.is_empty() {
        "Press 'i' to import a report into the selected specialty."
    } else {
        "No file name contains the search text."
    };
    let lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "No Reports Found",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(TEXT_SECONDARY))),
    ];

    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR))
                .title(" Reports "),
        )
        .alignment(Alignment::Center)
}

fn render_status(frame: &mut Frame, area: Rect, notice: Option<&Notice>) {
    let Some(notice) = notice else {
        return;
    };
    let color = match notice {
        Notice::Info(_) => ACCENT_SECONDARY,
        Notice::Warning(_) => ACCENT_WARNING,
        Notice::Error(_) => ACCENT_PRIMARY,
    };
    let status = Paragraph::new(Span::styled(
        format!(" {}", notice.message()),
        Style::default().fg(color),
    ));
    frame.render_widget(status, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hint = |key: &'static str, label: &'static str| {
        [
            Span::styled(
                key,
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(TEXT_SECONDARY)),
        ]
    };
    let separator = || Span::raw("  │  ");

    let mut spans = Vec::new();
    for (i, (key, label)) in [
        ("/ ", "Search"),
        ("Tab ", "Specialty"),
        ("i ", "Import"),
        ("o ", "Open"),
        ("d ", "Delete"),
        ("a ", "Add"),
        ("? ", "Help"),
        ("q ", "Quit"),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            spans.push(separator());
        }
        spans.extend(hint(key, label));
    }

    let footer = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

fn overlay_block(title: &'static str, accent: ratatui::style::Color) -> Block<'static> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(BG_DARK))
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, help_area);

    let block = overlay_block(" Help ", ACCENT_HIGHLIGHT);
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |keys: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<12}", keys), Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw(text),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        entry("↑↓ / j k", "Select report"),
        entry("Tab / ←→", "Change specialty"),
        entry("/", "Search file names"),
        entry("i", "Import a report"),
        entry("o / Enter", "Open report"),
        entry("d / Del", "Delete report"),
        entry("a", "Add specialty"),
        entry("r", "Refresh"),
        entry("q / Esc", "Quit"),
        entry("?", "Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Left)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame, base_dir: &Path) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let welcome_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to Medical Reports Organizer!",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Scanned reports are kept in one folder per medical specialty:"),
        Line::from(Span::styled(
            format!("  {}", base_dir.display()),
            Style::default().fg(ACCENT_SECONDARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Pick a specialty with "),
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(", import with "),
            Span::styled("i", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" and search with "),
            Span::styled("/", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("."),
        ]),
        Line::from(vec![
            Span::raw("Imported files are copied; the originals stay where they are."),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to start...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(overlay_block(" Welcome ", ACCENT_HIGHLIGHT))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}

fn yes_no_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("[Y]", Style::default().fg(ACCENT_SECONDARY)),
        Span::raw("es     "),
        Span::styled("[N]", Style::default().fg(ACCENT_PRIMARY)),
        Span::raw("o  "),
        Span::styled("[Esc]", Style::default().fg(ACCENT_PRIMARY)),
    ])
}

/// Renders the confirmation dialog before a delete
pub fn render_confirm_delete_overlay(frame: &mut Frame, key: &RowKey) {
    let confirm_area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, confirm_area);

    let block = overlay_block(" Delete Report ", ACCENT_PRIMARY);
    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Are you sure you want to delete {}?", key.filename),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Specialty: ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw(key.category.clone()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "The file is removed permanently.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        yes_no_line(),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, inner);
}

/// Renders the overwrite question for an import collision
pub fn render_confirm_overwrite_overlay(frame: &mut Frame, source: &Path, category: &str) {
    let confirm_area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, confirm_area);

    let block = overlay_block(" File Exists ", ACCENT_WARNING);
    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("The file {} already exists in {}.", file_name, category),
            Style::default().fg(TEXT_PRIMARY),
        )),
        Line::from(Span::styled(
            "Overwrite?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        yes_no_line(),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, inner);
}

/// Renders a one-line text prompt
pub fn render_prompt_overlay(frame: &mut Frame, kind: PromptKind, input: &str) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = overlay_block(kind.title(), ACCENT_HIGHLIGHT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(kind.label(), Style::default().fg(TEXT_SECONDARY))),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(input.to_string(), Style::default().fg(TEXT_PRIMARY)),
            Span::styled("▏", Style::default().fg(ACCENT_HIGHLIGHT)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to confirm, Esc to cancel",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).style(Style::default().fg(TEXT_PRIMARY)),
        inner,
    );
}

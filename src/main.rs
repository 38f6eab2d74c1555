use medreports::cli::{AppConfig, Args, CliCommand};
use medreports::config::UserConfig;
use medreports::logging;
use medreports::tui::{self, handle_key, poll_timeout, tick, UiEffect, UiState};
use medreports::{
    compute_view, open_file, App, Catalog, ImportOutcome, MedReportsError, Scope,
    BUILTIN_CATEGORIES,
};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::time::Instant;

fn main() {
    // Parse command line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Convert to config
    let config: AppConfig = args.into();

    if let Err(e) = run(config) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: AppConfig) -> medreports::Result<()> {
    let log_path = config.log_file.clone().or_else(logging::default_log_path);
    if let Err(e) = logging::init(
        log_path.as_deref(),
        logging::level_for(config.verbose),
        config.command.is_some(),
    ) {
        eprintln!("Warning: {}", e);
    }

    // Load user configuration
    let mut user_config = UserConfig::load().unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load user config: {}", e);
        UserConfig::default()
    });

    let base_dir = config.resolve_base_dir(&user_config).ok_or_else(|| {
        MedReportsError::Config("Could not determine the home directory".to_string())
    })?;
    let catalog = Catalog::open(&base_dir, &BUILTIN_CATEGORIES)?;
    info!("Using report folder {}", base_dir.display());

    match config.command.clone() {
        Some(command) => run_command(catalog, command),
        None => run_tui(catalog, &config, &mut user_config),
    }
}

/// Runs one non-interactive subcommand
fn run_command(mut catalog: Catalog, command: CliCommand) -> medreports::Result<()> {
    match command {
        CliCommand::Categories => {
            for category in catalog.categories() {
                println!("{}", category);
            }
        }
        CliCommand::List { category, search } => {
            let scope = match category {
                Some(name) if !catalog.contains(&name) => {
                    return Err(MedReportsError::UnknownCategory(name));
                }
                Some(name) => Scope::Category(name),
                None => Scope::All,
            };
            for entry in compute_view(&catalog, &scope, &search) {
                println!(
                    "{}\t{}\t{}",
                    entry.name,
                    tui::format_timestamp(&entry.created),
                    entry.category
                );
            }
        }
        CliCommand::Import {
            category,
            overwrite,
            files,
        } => {
            let reports = catalog.import_files(&files, &category, |_| overwrite);
            let mut failed = 0;
            for report in &reports {
                match &report.result {
                    Ok(ImportOutcome::Imported) => println!("imported  {}", report.source.display()),
                    Ok(ImportOutcome::Replaced) => println!("replaced  {}", report.source.display()),
                    Ok(ImportOutcome::Skipped) => {
                        println!("skipped   {} (already exists)", report.source.display())
                    }
                    Err(e) => {
                        failed += 1;
                        eprintln!("failed    {}", e);
                    }
                }
            }
            if failed > 0 {
                std::process::exit(1);
            }
        }
        CliCommand::Delete { category, file } => {
            catalog.delete_file(&category, &file)?;
            println!("Report deleted successfully.");
        }
        CliCommand::AddCategory { name } => {
            catalog.add_category(name.trim())?;
            println!("Added specialty {}", name.trim());
        }
        CliCommand::Open { category, file } => {
            let path = catalog.report_path(&category, &file)?;
            open_file(&path)?;
        }
    }
    Ok(())
}

/// Runs the TUI application
fn run_tui(
    catalog: Catalog,
    config: &AppConfig,
    user_config: &mut UserConfig,
) -> medreports::Result<()> {
    let mut app = App::new(catalog);
    let show_welcome = config.show_welcome || !user_config.welcome_shown;
    let mut ui = UiState::new(user_config.search_delay(), show_welcome);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_loop(&mut terminal, &mut app, &mut ui, user_config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result.map_err(MedReportsError::from)
}

/// Main application loop
fn run_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    ui: &mut UiState,
    user_config: &mut UserConfig,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| tui::render(frame, app, ui))?;

        if event::poll(poll_timeout(ui, Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                match handle_key(ui, app, key, Instant::now()) {
                    UiEffect::Quit => break,
                    UiEffect::Open(path) => open_report(app, &path),
                    UiEffect::WelcomeDismissed => {
                        // Mark welcome as shown and persist
                        user_config.welcome_shown = true;
                        if let Err(e) = user_config.save() {
                            log::warn!("Failed to save user config: {}", e);
                        }
                    }
                    UiEffect::None => {}
                }
            }
        }

        // Fire the search once typing has paused
        tick(ui, app, Instant::now());
    }

    Ok(())
}

/// Opens a report without leaving the TUI; failures only reach the status line
fn open_report(app: &mut App, path: &Path) {
    if let Err(e) = open_file(path) {
        app.set_notice(medreports::Notice::Error(format!("Failed to open report: {}", e)));
    }
}

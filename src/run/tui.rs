use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::layout::Position;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::Database;
use crate::ui::app::{App, InputMode, Screen, EDIT_FIELDS, FORM_LABELS};
use crate::ui::commands;
use crate::ui::screens::gallery::lightbox_area;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &Database, config: &Config) -> Result<()> {
    let mut app = App::new(db, config);
    info!(
        expenses = app.expenses.len(),
        bills = app.bills.len(),
        "Launching TUI"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // 1 tab + 1 status + 1 cmd + 2 borders + 1 header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            app.frame_area = f.area();
            crate::ui::render::render(f, app);
        })?;

        let outcome = match event::read()? {
            Event::Key(key) => handle_key(key, app, db),
            Event::Mouse(mouse) => {
                handle_mouse(mouse, app);
                Ok(())
            }
            _ => Ok(()),
        };

        // Failed actions are reported, never fatal.
        if let Err(e) = outcome {
            warn!(error = %format!("{e:#}"), "Action failed");
            app.set_status(format!("Error: {e:#}"));
        }
    }
    Ok(())
}

fn handle_key(key: KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    if app.show_help {
        app.show_help = false;
        return Ok(());
    }
    if app.lightbox.is_open() {
        return handle_lightbox_input(key, app);
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_input(key, app, db),
        InputMode::Command => handle_command_input(key, app, db),
        InputMode::Search => {
            handle_search_input(key, app);
            Ok(())
        }
        InputMode::Form => handle_form_input(key, app, db),
        InputMode::Editing => handle_editing_input(key, app, db),
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.screen = Screen::Expenses;
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app);
            }
        }
        KeyCode::Char('1') => app.screen = Screen::Expenses,
        KeyCode::Char('2') => app.screen = Screen::Summary,
        KeyCode::Char('3') => app.screen = Screen::Bills,
        KeyCode::Tab => cycle_screen(app, 1),
        KeyCode::BackTab => cycle_screen(app, -1),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => {
            app.status_message.clear();
            if app.filter.is_active() {
                app.filter = Default::default();
                app.refresh();
            }
        }
        KeyCode::Char('a') => app.open_form(),
        KeyCode::Char('e') | KeyCode::Enter if app.screen == Screen::Expenses => app.begin_edit(),
        KeyCode::Char('D') if app.screen == Screen::Expenses => app.delete_selected_expense(db)?,
        KeyCode::Char('X') if app.screen == Screen::Expenses => app.export(None)?,
        KeyCode::Enter | KeyCode::Char('o') if app.screen == Screen::Bills => app.open_lightbox(),
        KeyCode::Char('D') if app.screen == Screen::Bills => app.delete_selected_bill(db)?,
        KeyCode::Char('d') if app.screen == Screen::Bills => app.download_selected_bill(None)?,
        KeyCode::Char('r') if app.screen == Screen::Bills => {
            if let Some(name) = app.selected_bill().map(|b| b.name.clone()) {
                app.input_mode = InputMode::Command;
                app.command_input = format!("rename-bill {name}");
            }
        }
        KeyCode::Char('u') if app.screen == Screen::Bills => {
            app.input_mode = InputMode::Command;
            app.command_input = "upload ".to_string();
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_search_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.set_search("");
        }
        KeyCode::Backspace => {
            // Live search: filter as you type
            let mut query = app.filter.query.clone();
            query.pop();
            app.set_search(&query);
        }
        KeyCode::Char(c) => {
            let query = format!("{}{c}", app.filter.query);
            app.set_search(&query);
        }
        _ => {}
    }
}

fn handle_form_input(key: KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => app.submit_form(db)?,
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(FORM_LABELS.len()),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(FORM_LABELS.len()),
        KeyCode::Backspace => app.form.pop(),
        KeyCode::Char(c) => app.form.push(c),
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(key: KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => app.commit_edit(db)?,
        KeyCode::Esc => {
            app.cancel_edit();
            app.set_status("Edit cancelled");
        }
        _ => {
            let Some(session) = app.edit.as_mut() else {
                app.input_mode = InputMode::Normal;
                return Ok(());
            };
            match key.code {
                KeyCode::Tab | KeyCode::Right => session.form.focus_next(EDIT_FIELDS),
                KeyCode::BackTab | KeyCode::Left => session.form.focus_prev(EDIT_FIELDS),
                KeyCode::Backspace => session.form.pop(),
                KeyCode::Char(c) => session.form.push(c),
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_lightbox_input(key: KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.lightbox.close(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => app.lightbox_next(),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.lightbox_prev(),
        KeyCode::Char('d') => app.download_selected_bill(None)?,
        _ => {}
    }
    Ok(())
}

fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if app.lightbox.is_open() => {
            let popup = lightbox_area(app.frame_area);
            if !popup.contains(Position::new(mouse.column, mouse.row)) {
                app.lightbox.close();
            }
        }
        MouseEventKind::ScrollDown if !app.lightbox.is_open() => handle_move_down(app),
        MouseEventKind::ScrollUp if !app.lightbox.is_open() => handle_move_up(app),
        _ => {}
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn cycle_screen(app: &mut App, delta: isize) {
    let screens = Screen::all();
    let len = screens.len() as isize;
    let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0) as isize;
    let next = (idx + delta).rem_euclid(len) as usize;
    app.screen = screens[next];
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Expenses => {
            let len = app.table.rows.len();
            scroll_down(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::Bills => {
            let len = app.bills.len();
            scroll_down(&mut app.bill_index, &mut app.bill_scroll, len, page);
        }
        Screen::Summary => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Bills => scroll_up(&mut app.bill_index, &mut app.bill_scroll),
        Screen::Summary => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Bills => scroll_to_top(&mut app.bill_index, &mut app.bill_scroll),
        Screen::Summary => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows.max(1);
    match app.screen {
        Screen::Expenses => {
            let len = app.table.rows.len();
            scroll_to_bottom(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::Bills => {
            let len = app.bills.len();
            scroll_to_bottom(&mut app.bill_index, &mut app.bill_scroll, len, page);
        }
        Screen::Summary => {}
    }
}

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use super::app::{App, InputMode, Screen};
use crate::db::Database;
use crate::run::expand_path;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &Database) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("quit", "Quit ExpenseTUI", cmd_quit, r);
    register_command!("x", "Go to Expenses", cmd_expenses, r);
    register_command!("expenses", "Go to Expenses", cmd_expenses, r);
    register_command!("summary", "Go to Summary", cmd_summary, r);
    register_command!("bills", "Go to Bills", cmd_bills, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "add",
        "Add expense (e.g. :add 2024-01-15 Food 120 lunch)",
        cmd_add,
        r
    );
    register_command!("a", "Add expense (opens form without args)", cmd_add, r);
    register_command!("edit", "Edit selected expense", cmd_edit, r);
    register_command!("delete", "Delete selected expense", cmd_delete, r);
    register_command!(
        "search",
        "Search expenses (e.g. :search fuel)",
        cmd_search,
        r
    );
    register_command!("s", "Search expenses (e.g. :s fuel)", cmd_search, r);
    register_command!(
        "category",
        "Filter by category (no args clears)",
        cmd_category,
        r
    );
    register_command!("c", "Filter by category", cmd_category, r);
    register_command!("clear", "Clear search and category filter", cmd_clear, r);
    register_command!(
        "export",
        "Export shown rows to expenses.csv (e.g. :export ~/out)",
        cmd_export,
        r
    );
    register_command!(
        "upload",
        "Upload bills (e.g. :upload ~/bill.pdf ~/receipt.png)",
        cmd_upload,
        r
    );
    register_command!("u", "Upload bills", cmd_upload, r);
    register_command!(
        "rename-bill",
        "Rename selected bill (e.g. :rename-bill March rent)",
        cmd_rename_bill,
        r
    );
    register_command!(
        "download-bill",
        "Save selected bill (e.g. :download-bill ~/Downloads)",
        cmd_download_bill,
        r
    );
    register_command!("delete-bill", "Delete selected bill", cmd_delete_bill, r);
    register_command!("view", "Open selected bill in the viewer", cmd_view, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, db)?;
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b): (Vec<char>, Vec<char>) = (a.chars().collect(), b.chars().collect());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_expenses(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    Ok(())
}

fn cmd_summary(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Summary;
    Ok(())
}

fn cmd_bills(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Bills;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

/// `:add` alone opens the form; with arguments it fills the form from
/// `<date> <category> <amount> [note...]` and submits it.
fn cmd_add(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.open_form();
    if args.is_empty() {
        return Ok(());
    }
    let mut parts = args.split_whitespace();
    for field in app.form.fields.iter_mut().take(3) {
        *field = parts.next().unwrap_or_default().to_string();
    }
    app.form.fields[3] = parts.collect::<Vec<_>>().join(" ");
    app.submit_form(db)?;
    if app.input_mode == InputMode::Form {
        // Validation failed: drop back to normal mode, keep the message.
        app.input_mode = InputMode::Normal;
    }
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.begin_edit();
    Ok(())
}

fn cmd_delete(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.delete_selected_expense(db)
}

fn cmd_search(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    app.set_search(args);
    app.set_status(format!("{} matches", app.table.rows.len()));
    Ok(())
}

fn cmd_category(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Expenses;
    if args.is_empty() {
        app.set_category_filter(None);
        app.set_status("Showing all categories");
    } else {
        app.set_category_filter(Some(args.to_string()));
        app.set_status(format!(
            "Category '{args}': {} rows",
            app.table.rows.len()
        ));
    }
    Ok(())
}

fn cmd_clear(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.filter = Default::default();
    app.refresh();
    app.set_status("Filters cleared");
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let dir = (!args.is_empty()).then(|| expand_path(args));
    app.export(dir.as_deref())
}

fn cmd_upload(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    let paths: Vec<PathBuf> = args.split_whitespace().map(expand_path).collect();
    if paths.is_empty() {
        app.set_status("Usage: :upload <file>...");
        return Ok(());
    }
    app.screen = Screen::Bills;
    app.upload_bills(db, &paths)?;
    Ok(())
}

fn cmd_rename_bill(args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :rename-bill <new name>");
        return Ok(());
    }
    app.rename_selected_bill(db, args)
}

fn cmd_download_bill(args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    let dir = (!args.is_empty()).then(|| expand_path(args));
    app.download_selected_bill(dir.as_deref())
}

fn cmd_delete_bill(_args: &str, app: &mut App, db: &Database) -> anyhow::Result<()> {
    app.delete_selected_bill(db)
}

fn cmd_view(_args: &str, app: &mut App, _db: &Database) -> anyhow::Result<()> {
    app.screen = Screen::Bills;
    app.open_lightbox();
    Ok(())
}

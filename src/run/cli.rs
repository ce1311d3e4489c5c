use anyhow::{Context, Result};
use std::path::PathBuf;

use super::expand_path;
use crate::config::Config;
use crate::db::Database;
use crate::gallery;
use crate::models::{BillAsset, ExpenseDraft, ExpenseRecord};
use crate::report::{
    by_category, by_month, export_csv, write_csv, Filter, TableView, AMOUNT_COLUMN,
    EXPORT_FILE_NAME,
};
use crate::store::Store;
use crate::ui::util::{format_amount, format_size, truncate};

const VALUE_FLAGS: [&str; 3] = ["--search", "--category", "--photo"];

pub(crate) fn as_cli(args: &[String], db: &Database, config: &Config) -> Result<()> {
    match args[1].as_str() {
        "add" => cli_add(&args[2..], db),
        "list" | "ls" => cli_list(&args[2..], db, config),
        "summary" | "s" => cli_summary(db, config),
        "export" => cli_export(&args[2..], db, config),
        "delete" => cli_delete(&args[2..], db),
        "upload" => cli_upload(&args[2..], db),
        "bills" => cli_bills(db),
        "rename-bill" => cli_rename_bill(&args[2..], db),
        "download-bill" => cli_download_bill(&args[2..], db, config),
        "delete-bill" => cli_delete_bill(&args[2..], db),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("expensetui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("ExpenseTUI - local-only personal expense tracker");
    println!();
    println!("Usage: expensetui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                                   Launch interactive TUI");
    println!("  add <date> <category> <amount> [note]    Add an expense (date as YYYY-MM-DD)");
    println!("    --photo <file>                         Attach an image");
    println!("  list                                     List expenses");
    println!("    --search <text> --category <name>      Only show matching rows");
    println!("  summary                                  Totals by category and month");
    println!("  export [dir|-]                           Write {EXPORT_FILE_NAME}, or print it with - (takes list filters)");
    println!("  delete <id>                              Delete an expense");
    println!("  upload <file>...                         Add images or PDFs to the bill gallery");
    println!("  bills                                    List stored bills");
    println!("  rename-bill <id> <name>                  Rename a bill");
    println!("  download-bill <id> [dir]                 Save a bill to disk");
    println!("  delete-bill <id>                         Delete a bill");
    println!("  --help, -h                               Show this help");
    println!("  --version, -V                            Show version");
    println!();
    println!("Environment: EXPENSETUI_DATA_DIR, EXPENSETUI_EXPORT_DIR, EXPENSETUI_CURRENCY, RUST_LOG");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Arguments that are neither a known flag nor a flag's value.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn filter_from(args: &[String]) -> Filter {
    Filter {
        query: flag_value(args, "--search").unwrap_or_default().to_string(),
        category: flag_value(args, "--category").map(str::to_string),
    }
}

fn parse_id(arg: Option<&str>, usage: &str) -> Result<i64> {
    let raw = arg.ok_or_else(|| anyhow::anyhow!("Usage: {usage}"))?;
    raw.parse()
        .with_context(|| format!("Invalid id '{raw}'"))
}

// ── Expenses ─────────────────────────────────────────────────

fn cli_add(args: &[String], db: &Database) -> Result<()> {
    let usage = "expensetui add <date> <category> <amount> [note...] [--photo <file>]";
    let pos = positional(args);
    if pos.len() < 3 {
        anyhow::bail!("Usage: {usage}");
    }
    let note = pos[3..].join(" ");
    let draft = ExpenseDraft::parse(pos[0], pos[1], pos[2], &note)?;
    let photo = flag_value(args, "--photo")
        .map(|p| gallery::photo_data_uri(&expand_path(p)))
        .transpose()?;

    let mut store = Store::<ExpenseRecord>::load(db);
    let record = ExpenseRecord::new(store.next_id(), draft, photo);
    let id = record.id;
    store.append(db, record)?;
    println!("Added expense {id}");
    Ok(())
}

fn cli_list(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let store = Store::<ExpenseRecord>::load(db);
    let filter = filter_from(args);
    let view = TableView::build(store.items(), &filter, &config.currency);

    if view.rows.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    println!(
        "{:<14} {:<10} {:<16} {:>14}  Note",
        "ID", "Date", "Category", "Amount"
    );
    println!("{}", "─".repeat(72));
    for row in &view.rows {
        let cells = row.data_cells();
        println!(
            "{:<14} {:<10} {:<16} {:>14}  {}",
            row.id,
            truncate(&cells[0], 10),
            truncate(&cells[1], 16),
            cells[AMOUNT_COLUMN],
            cells[3],
        );
    }
    if filter.is_active() {
        println!();
        println!(
            "{} of {} expenses ({})",
            view.rows.len(),
            view.total_records,
            filter.describe()
        );
    }
    Ok(())
}

fn cli_summary(db: &Database, config: &Config) -> Result<()> {
    let store = Store::<ExpenseRecord>::load(db);
    let records = store.items();
    let categories = by_category(records);
    let months = by_month(records);
    let currency = config.currency.as_str();

    println!("ExpenseTUI - {} expenses", records.len());
    println!("{}", "─".repeat(40));
    println!("  Total: {}", format_amount(categories.total(), currency));

    if !categories.is_empty() {
        println!();
        println!("By Category:");
        for (name, amount) in categories.entries() {
            println!("  {name:<24} {:>14}", format_amount(*amount, currency));
        }
    }
    if !months.is_empty() {
        println!();
        println!("By Month:");
        for (month, amount) in months.entries() {
            println!("  {month:<24} {:>14}", format_amount(*amount, currency));
        }
    }
    Ok(())
}

fn cli_export(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let store = Store::<ExpenseRecord>::load(db);
    let view = TableView::build(store.items(), &filter_from(args), &config.currency);
    let target = positional(args).first().copied();
    if target == Some("-") {
        print!("{}", export_csv(&view)?);
        return Ok(());
    }
    let dir = target
        .map(expand_path)
        .unwrap_or_else(|| config.export_dir.clone());

    let path = write_csv(&view, &dir)?;
    println!("Exported {} rows to {}", view.rows.len(), path.display());
    Ok(())
}

fn cli_delete(args: &[String], db: &Database) -> Result<()> {
    let id = parse_id(args.first().map(String::as_str), "expensetui delete <id>")?;
    let mut store = Store::<ExpenseRecord>::load(db);
    let removed = store.remove(db, id)?;
    println!("Deleted {} {} ({})", removed.category, removed.date, removed.id);
    Ok(())
}

// ── Bills ────────────────────────────────────────────────────

fn cli_upload(args: &[String], db: &Database) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("Usage: expensetui upload <file>...");
    }
    let paths: Vec<PathBuf> = args.iter().map(|a| expand_path(a)).collect();
    let mut store = Store::<BillAsset>::load(db);
    let report = gallery::upload(&mut store, db, &paths)?;

    for name in &report.added {
        println!("Uploaded {name}");
    }
    for (path, reason) in &report.skipped {
        eprintln!("Skipped {}: {reason}", path.display());
    }
    println!(
        "{} uploaded, {} skipped",
        report.added.len(),
        report.skipped.len()
    );
    Ok(())
}

fn cli_bills(db: &Database) -> Result<()> {
    let store = Store::<BillAsset>::load(db);
    if store.is_empty() {
        println!("No bills");
        return Ok(());
    }

    println!("{:<14} {:<32} {:<6} {:>10}", "ID", "Name", "Type", "Size");
    println!("{}", "─".repeat(65));
    for bill in store.items() {
        println!(
            "{:<14} {:<32} {:<6} {:>10}",
            bill.id,
            truncate(&bill.name, 32),
            if bill.is_pdf() { "PDF" } else { "Image" },
            format_size(bill.byte_len()),
        );
    }
    Ok(())
}

fn cli_rename_bill(args: &[String], db: &Database) -> Result<()> {
    let usage = "expensetui rename-bill <id> <name>";
    let id = parse_id(args.first().map(String::as_str), usage)?;
    let name = args.get(1..).unwrap_or_default().join(" ");
    let mut store = Store::<BillAsset>::load(db);
    gallery::rename(&mut store, db, id, &name)?;
    println!("Renamed bill {id} to {}", name.trim());
    Ok(())
}

fn cli_download_bill(args: &[String], db: &Database, config: &Config) -> Result<()> {
    let id = parse_id(
        args.first().map(String::as_str),
        "expensetui download-bill <id> [dir]",
    )?;
    let dir = args
        .get(1)
        .map(|d| expand_path(d))
        .unwrap_or_else(|| config.export_dir.clone());
    let store = Store::<BillAsset>::load(db);
    let bill = store
        .get(id)
        .ok_or_else(|| anyhow::anyhow!("No bill with id {id}"))?;
    let path = gallery::download(bill, &dir)?;
    println!("Saved {}", path.display());
    Ok(())
}

fn cli_delete_bill(args: &[String], db: &Database) -> Result<()> {
    let id = parse_id(args.first().map(String::as_str), "expensetui delete-bill <id>")?;
    let mut store = Store::<BillAsset>::load(db);
    let removed = gallery::delete(&mut store, db, id)?;
    println!("Deleted bill {}", removed.name);
    Ok(())
}

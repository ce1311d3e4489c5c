use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};

use super::table::{TableView, AMOUNT_COLUMN};

pub(crate) const EXPORT_FILE_NAME: &str = "expenses.csv";

/// Serialize the displayed table: header plus one line per visible row,
/// action columns dropped, amount cells reduced to `[0-9.-]`.
///
/// Fields are never quoted, so a comma inside a note or category shifts
/// the columns of that line.
pub(crate) fn export_csv(view: &TableView) -> Result<String> {
    let strip = Regex::new(r"[^0-9.\-]+").context("Invalid amount pattern")?;

    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());

    let width = view.header.len().saturating_sub(super::table::ACTION_COLUMNS);
    wtr.write_record(&view.header[..width])
        .context("Failed to write CSV header")?;

    for row in &view.rows {
        let fields: Vec<String> = row
            .data_cells()
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let text = cell.trim();
                if i == AMOUNT_COLUMN {
                    strip.replace_all(text, "").into_owned()
                } else {
                    text.to_string()
                }
            })
            .collect();
        wtr.write_record(&fields)
            .with_context(|| format!("Failed to write CSV row for record {}", row.id))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Write `expenses.csv` into `dir`, returning the file path.
pub(crate) fn write_csv(view: &TableView, dir: &Path) -> Result<PathBuf> {
    let csv = export_csv(view)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

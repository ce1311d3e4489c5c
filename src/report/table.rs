use super::filter::Filter;
use crate::models::ExpenseRecord;
use crate::ui::util::format_amount;

pub(crate) const COLUMNS: [&str; 5] = ["Date", "Category", "Amount", "Note", "Actions"];
pub(crate) const CATEGORY_COLUMN: usize = 1;
pub(crate) const AMOUNT_COLUMN: usize = 2;
/// Trailing columns that hold row actions rather than data.
pub(crate) const ACTION_COLUMNS: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableRow {
    pub(crate) id: i64,
    pub(crate) cells: Vec<String>,
}

impl TableRow {
    fn new(record: &ExpenseRecord, currency: &str) -> Self {
        let actions = if record.photo.is_some() {
            "e edit  D delete  [photo]"
        } else {
            "e edit  D delete"
        };
        Self {
            id: record.id,
            cells: vec![
                record.date.clone(),
                record.category.clone(),
                format_amount(record.amount, currency),
                record.note.clone(),
                actions.to_string(),
            ],
        }
    }

    /// Cells without the action columns.
    pub(crate) fn data_cells(&self) -> &[String] {
        let end = self.cells.len().saturating_sub(ACTION_COLUMNS);
        &self.cells[..end]
    }

    /// Visible row text, cells joined by tabs.
    pub(crate) fn text(&self) -> String {
        self.data_cells().join("\t")
    }
}

/// The rows currently shown, rebuilt from scratch on every change.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TableView {
    pub(crate) header: Vec<String>,
    pub(crate) rows: Vec<TableRow>,
    /// Size of the collection before filtering.
    pub(crate) total_records: usize,
}

impl TableView {
    pub(crate) fn build(records: &[ExpenseRecord], filter: &Filter, currency: &str) -> Self {
        let rows = records
            .iter()
            .map(|record| TableRow::new(record, currency))
            .filter(|row| filter.matches(row))
            .collect();
        Self {
            header: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
            total_records: records.len(),
        }
    }

    pub(crate) fn position_of(&self, id: i64) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }
}

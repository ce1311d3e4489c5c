use anyhow::Result;
use chrono::Local;
use ratatui::layout::Rect;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::Database;
use crate::gallery::{self, Lightbox, UploadReport};
use crate::models::{BillAsset, ExpenseDraft, ExpenseRecord};
use crate::report::{by_month, write_csv, Charts, Filter, TableView, Totals};
use crate::store::Store;
use crate::ui::util::scroll_into_view;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Expenses,
    Summary,
    Bills,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Expenses, Self::Summary, Self::Bills]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expenses => write!(f, "Expenses"),
            Self::Summary => write!(f, "Summary"),
            Self::Bills => write!(f, "Bills"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Search,
    Form,
    Editing,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Search => write!(f, "SEARCH"),
            Self::Form => write!(f, "ADD"),
            Self::Editing => write!(f, "EDIT"),
        }
    }
}

pub(crate) const FORM_LABELS: [&str; 5] = ["Date", "Category", "Amount", "Note", "Photo"];
const DATE: usize = 0;
const CATEGORY: usize = 1;
const AMOUNT: usize = 2;
const NOTE: usize = 3;
const PHOTO: usize = 4;

/// Text buffers for the add form and the inline row editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ExpenseForm {
    pub(crate) fields: [String; 5],
    pub(crate) focus: usize,
}

impl ExpenseForm {
    fn blank() -> Self {
        let mut form = Self::default();
        form.fields[DATE] = Local::now().format("%Y-%m-%d").to_string();
        form
    }

    fn from_record(record: &ExpenseRecord) -> Self {
        let mut form = Self::default();
        form.fields[DATE] = record.date.clone();
        form.fields[CATEGORY] = record.category.clone();
        form.fields[AMOUNT] = record.amount.to_string();
        form.fields[NOTE] = record.note.clone();
        form
    }

    fn draft(&self) -> Result<ExpenseDraft> {
        ExpenseDraft::parse(
            &self.fields[DATE],
            &self.fields[CATEGORY],
            &self.fields[AMOUNT],
            &self.fields[NOTE],
        )
    }

    fn photo_path(&self) -> Option<&str> {
        Some(self.fields[PHOTO].trim()).filter(|p| !p.is_empty())
    }

    /// Move focus forward, cycling through the first `count` fields.
    pub(crate) fn focus_next(&mut self, count: usize) {
        self.focus = (self.focus + 1) % count;
    }

    pub(crate) fn focus_prev(&mut self, count: usize) {
        self.focus = (self.focus + count - 1) % count;
    }

    pub(crate) fn push(&mut self, c: char) {
        self.fields[self.focus].push(c);
    }

    pub(crate) fn pop(&mut self) {
        self.fields[self.focus].pop();
    }
}

/// Fields the inline editor cycles through. The photo is not editable.
pub(crate) const EDIT_FIELDS: usize = 4;

/// The single row currently open for inline editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EditSession {
    pub(crate) id: i64,
    pub(crate) form: ExpenseForm,
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) currency: String,
    pub(crate) export_dir: PathBuf,

    pub(crate) expenses: Store<ExpenseRecord>,
    pub(crate) bills: Store<BillAsset>,

    // Derived views, rebuilt by `refresh`
    pub(crate) filter: Filter,
    pub(crate) table: TableView,
    pub(crate) charts: Charts,
    pub(crate) monthly: Totals,

    // Expenses
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) form: ExpenseForm,
    pub(crate) edit: Option<EditSession>,

    // Bills
    pub(crate) bill_index: usize,
    pub(crate) bill_scroll: usize,
    pub(crate) lightbox: Lightbox,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
    pub(crate) frame_area: Rect,
}

impl App {
    pub(crate) fn new(db: &Database, config: &Config) -> Self {
        let mut app = Self {
            running: true,
            screen: Screen::Expenses,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            currency: config.currency.clone(),
            export_dir: config.export_dir.clone(),

            expenses: Store::load(db),
            bills: Store::load(db),

            filter: Filter::default(),
            table: TableView::build(&[], &Filter::default(), &config.currency),
            charts: Charts::default(),
            monthly: Totals::default(),

            expense_index: 0,
            expense_scroll: 0,
            form: ExpenseForm::blank(),
            edit: None,

            bill_index: 0,
            bill_scroll: 0,
            lightbox: Lightbox::default(),

            visible_rows: 20,
            frame_area: Rect::default(),
        };
        app.refresh();
        app
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Rebuild the table, charts and monthly summary from the stores.
    pub(crate) fn refresh(&mut self) {
        let records = self.expenses.items();
        self.table = TableView::build(records, &self.filter, &self.currency);
        self.charts = Charts::build(records);
        self.monthly = by_month(records);

        let rows = self.table.rows.len();
        if self.expense_index >= rows {
            self.expense_index = rows.saturating_sub(1);
        }
        self.expense_scroll = self.expense_scroll.min(self.expense_index);

        let bills = self.bills.len();
        if self.bill_index >= bills {
            self.bill_index = bills.saturating_sub(1);
        }
        self.bill_scroll = self.bill_scroll.min(self.bill_index);
        self.lightbox.clamp(bills);
    }

    pub(crate) fn selected_expense_id(&self) -> Option<i64> {
        self.table.rows.get(self.expense_index).map(|row| row.id)
    }

    pub(crate) fn selected_bill(&self) -> Option<&BillAsset> {
        self.bills.items().get(self.bill_index)
    }

    // ── Filter ──────────────────────────────────────────────

    pub(crate) fn set_search(&mut self, query: &str) {
        self.filter.query = query.to_string();
        self.expense_index = 0;
        self.expense_scroll = 0;
        self.refresh();
    }

    pub(crate) fn set_category_filter(&mut self, category: Option<String>) {
        self.filter.category = category;
        self.expense_index = 0;
        self.expense_scroll = 0;
        self.refresh();
    }

    // ── Add form ────────────────────────────────────────────

    pub(crate) fn open_form(&mut self) {
        self.cancel_edit();
        self.form = ExpenseForm::blank();
        self.screen = Screen::Expenses;
        self.input_mode = InputMode::Form;
        self.status_message.clear();
    }

    /// Validate and append the form contents. Invalid input leaves the form
    /// open with the reason in the status line and the store untouched.
    pub(crate) fn submit_form(&mut self, db: &Database) -> Result<()> {
        let draft = match self.form.draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.set_status(format!("{e:#}"));
                return Ok(());
            }
        };
        let photo = match self.form.photo_path() {
            Some(path) => match gallery::photo_data_uri(&crate::run::expand_path(path)) {
                Ok(uri) => Some(uri),
                Err(e) => {
                    self.set_status(format!("{e:#}"));
                    return Ok(());
                }
            },
            None => None,
        };

        let record = ExpenseRecord::new(self.expenses.next_id(), draft, photo);
        let summary = format!("{} {}", record.category, record.date);
        self.expenses.append(db, record)?;
        self.refresh();
        self.form = ExpenseForm::blank();
        self.input_mode = InputMode::Normal;
        self.set_status(format!("Added {summary}"));
        Ok(())
    }

    pub(crate) fn close_form(&mut self) {
        self.input_mode = InputMode::Normal;
        self.set_status("Add cancelled");
    }

    // ── Inline edit ─────────────────────────────────────────

    /// Open the selected row in the editor. Any row already open is
    /// discarded first, so only one editor exists at a time.
    pub(crate) fn begin_edit(&mut self) {
        let Some(id) = self.selected_expense_id() else {
            return;
        };
        let Some(record) = self.expenses.get(id) else {
            return;
        };
        self.edit = Some(EditSession {
            id,
            form: ExpenseForm::from_record(record),
        });
        self.input_mode = InputMode::Editing;
        self.status_message.clear();
    }

    pub(crate) fn commit_edit(&mut self, db: &Database) -> Result<()> {
        let Some(session) = &self.edit else {
            return Ok(());
        };
        let id = session.id;
        let draft = match session.form.draft() {
            Ok(draft) => draft,
            Err(e) => {
                self.set_status(format!("{e:#}"));
                return Ok(());
            }
        };
        let current = self
            .expenses
            .get(id)
            .ok_or_else(|| anyhow::anyhow!("Record {id} no longer exists"))?;
        let updated = current.with_draft(draft);
        self.expenses.replace(db, id, updated)?;
        self.edit = None;
        self.input_mode = InputMode::Normal;
        self.refresh();
        if let Some(pos) = self.table.position_of(id) {
            self.expense_index = pos;
        }
        self.set_status("Saved");
        Ok(())
    }

    pub(crate) fn cancel_edit(&mut self) {
        if self.edit.take().is_some() {
            self.input_mode = InputMode::Normal;
        }
    }

    // ── Delete / export ─────────────────────────────────────

    pub(crate) fn delete_selected_expense(&mut self, db: &Database) -> Result<()> {
        let Some(id) = self.selected_expense_id() else {
            self.set_status("Nothing to delete");
            return Ok(());
        };
        if self.edit.as_ref().is_some_and(|e| e.id == id) {
            self.cancel_edit();
        }
        let removed = self.expenses.remove(db, id)?;
        self.refresh();
        self.set_status(format!("Deleted {} {}", removed.category, removed.date));
        Ok(())
    }

    pub(crate) fn export(&mut self, dir: Option<&Path>) -> Result<()> {
        let dir = dir.unwrap_or(self.export_dir.as_path()).to_path_buf();
        let path = write_csv(&self.table, &dir)?;
        self.set_status(format!(
            "Exported {} rows to {}",
            self.table.rows.len(),
            path.display()
        ));
        Ok(())
    }

    // ── Bills ───────────────────────────────────────────────

    pub(crate) fn upload_bills(&mut self, db: &Database, paths: &[PathBuf]) -> Result<UploadReport> {
        let report = gallery::upload(&mut self.bills, db, paths)?;
        self.refresh();
        let mut msg = format!("Uploaded {} bill(s)", report.added.len());
        if !report.skipped.is_empty() {
            let names: Vec<String> = report
                .skipped
                .iter()
                .map(|(path, reason)| format!("{}: {reason}", path.display()))
                .collect();
            msg.push_str(&format!(", skipped {}", names.join("; ")));
        }
        self.set_status(msg);
        Ok(report)
    }

    pub(crate) fn rename_selected_bill(&mut self, db: &Database, name: &str) -> Result<()> {
        let Some(id) = self.selected_bill().map(|b| b.id) else {
            self.set_status("No bill selected");
            return Ok(());
        };
        gallery::rename(&mut self.bills, db, id, name)?;
        self.set_status(format!("Renamed to {}", name.trim()));
        Ok(())
    }

    pub(crate) fn delete_selected_bill(&mut self, db: &Database) -> Result<()> {
        let Some(id) = self.selected_bill().map(|b| b.id) else {
            self.set_status("No bill selected");
            return Ok(());
        };
        let removed = gallery::delete(&mut self.bills, db, id)?;
        self.refresh();
        self.set_status(format!("Deleted {}", removed.name));
        Ok(())
    }

    pub(crate) fn download_selected_bill(&mut self, dir: Option<&Path>) -> Result<()> {
        let Some(asset) = self.selected_bill() else {
            self.set_status("No bill selected");
            return Ok(());
        };
        let dir = dir.unwrap_or(self.export_dir.as_path());
        let path = gallery::download(asset, dir)?;
        self.set_status(format!("Saved {}", path.display()));
        Ok(())
    }

    // ── Lightbox ────────────────────────────────────────────

    pub(crate) fn open_lightbox(&mut self) {
        self.lightbox.open(self.bill_index, self.bills.len());
    }

    pub(crate) fn lightbox_next(&mut self) {
        self.lightbox.next(self.bills.len());
        self.sync_bill_cursor();
    }

    pub(crate) fn lightbox_prev(&mut self) {
        self.lightbox.prev(self.bills.len());
        self.sync_bill_cursor();
    }

    fn sync_bill_cursor(&mut self) {
        if let Some(pos) = self.lightbox.position() {
            self.bill_index = pos;
            scroll_into_view(self.bill_index, &mut self.bill_scroll, self.visible_rows);
        }
    }
}

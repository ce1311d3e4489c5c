use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::report::AMOUNT_COLUMN;
use crate::ui::app::{App, ExpenseForm, EDIT_FIELDS, FORM_LABELS};
use crate::ui::theme;
use crate::ui::util::{centered_rect, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        "Expenses ({}/{}) {}",
        app.table.rows.len(),
        app.table.total_records,
        app.filter.describe()
    );

    if app.table.rows.is_empty() {
        let msg = if app.filter.is_active() {
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No expenses matching {}", app.filter.describe()),
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to clear the filter",
                    theme::dim_style(),
                )),
            ]
        } else {
            vec![
                Line::from(""),
                Line::from(Span::styled("No expenses yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press a to add one, or :add 2024-01-15 Food 120 lunch",
                    theme::dim_style(),
                )),
            ]
        };
        f.render_widget(Paragraph::new(msg).centered().block(theme::panel(title)), area);
        return;
    }

    let header_cells = app
        .table
        .header
        .iter()
        .map(|h| Cell::from(h.as_str()).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let editing = app.edit.as_ref();
    let rows: Vec<Row> = app
        .table
        .rows
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            if let Some(session) = editing.filter(|s| s.id == row.id) {
                return editor_row(&session.form);
            }

            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let cells = row.cells.iter().enumerate().map(|(col, text)| match col {
                AMOUNT_COLUMN if i != app.expense_index => {
                    Cell::from(Span::styled(text.as_str(), theme::amount_style()))
                }
                3 => Cell::from(truncate(text, 40)),
                _ => Cell::from(text.as_str()),
            });
            Row::new(cells).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Length(16),
        Constraint::Min(20),
        Constraint::Length(26),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(title));
    f.render_widget(table, area);
}

/// The row under edit: each cell shows its input buffer, the focused one
/// highlighted with a cursor mark.
fn editor_row(form: &ExpenseForm) -> Row<'static> {
    let mut cells: Vec<Cell> = form
        .fields
        .iter()
        .take(EDIT_FIELDS)
        .enumerate()
        .map(|(col, text)| {
            if col == form.focus {
                Cell::from(format!("{text}▏")).style(theme::editing_style())
            } else {
                Cell::from(text.clone()).style(Style::default().fg(theme::YELLOW))
            }
        })
        .collect();
    cells.push(Cell::from("Enter save  Esc cancel").style(theme::dim_style()));
    Row::new(cells)
}

/// Add-expense popup.
pub(crate) fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let label_width = FORM_LABELS.iter().map(|l| l.len()).max().unwrap_or(0) + 2;

    let mut lines = vec![Line::from("")];
    for (i, label) in FORM_LABELS.iter().enumerate() {
        let focused = i == app.form.focus;
        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {label:<w$}", w = label_width - 1), label_style),
            Span::styled(app.form.fields[i].as_str(), theme::normal_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Photo is an optional image path",
        theme::dim_style(),
    )));
    lines.push(Line::from(Span::styled(
        " Tab/Shift-Tab field   Enter save   Esc cancel",
        theme::dim_style(),
    )));

    let popup_area = centered_rect(area, 60, lines.len() as u16 + 2);
    f.render_widget(Clear, popup_area);
    f.render_widget(Paragraph::new(lines).block(theme::popup("Add Expense")), popup_area);

    let focus = app.form.focus;
    let typed = app.form.fields[focus].chars().count() as u16;
    let x = popup_area.x + 1 + label_width as u16 + typed;
    let y = popup_area.y + 2 + focus as u16;
    if x < popup_area.right().saturating_sub(1) && y < popup_area.bottom().saturating_sub(1) {
        f.set_cursor_position((x, y));
    }
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Cell, Paragraph, Row, Table},
    Frame,
};
use chrono::Local;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

const BAR_COLORS: [ratatui::style::Color; 6] = [
    theme::ACCENT,
    theme::GREEN,
    theme::YELLOW,
    theme::PEACH,
    theme::RED,
    theme::HEADER_FG,
];

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.charts.category.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Nothing to summarise yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add expenses on the Expenses tab (press 1, then a)",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(theme::panel("Summary"));
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    render_category_chart(f, top[0], app);
    render_monthly_table(f, top[1], app);
    render_monthly_chart(f, rows[1], app);
}

/// Category distribution as horizontal bars, each labelled with its amount
/// and share of the total.
fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let data = &app.charts.category;
    let shares = data.shares();
    let label_width = data
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(14);

    let bars: Vec<Bar> = data
        .labels
        .iter()
        .zip(&data.values)
        .zip(&shares)
        .enumerate()
        .map(|(i, ((label, value), share))| {
            let color = BAR_COLORS[i % BAR_COLORS.len()];
            Bar::default()
                .value(bar_value(*value))
                .label(Line::from(format!(
                    "{:<w$}",
                    truncate(label, label_width),
                    w = label_width
                )))
                .text_value(format!(
                    "{} ({share:.1}%)",
                    format_amount(*value, &app.currency)
                ))
                .style(Style::default().fg(color))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(theme::panel(format!(
            "By Category  total {}",
            format_amount(data.total(), &app.currency)
        )))
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0);
    f.render_widget(chart, area);
}

fn render_monthly_table(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(
        ["Month", "Total"]
            .iter()
            .map(|h| Cell::from(*h).style(theme::header_style())),
    );

    let mut rows: Vec<Row> = app
        .monthly
        .entries()
        .iter()
        .enumerate()
        .map(|(i, (month, amount))| {
            let style = if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(month.as_str()),
                Cell::from(Span::styled(
                    format_amount(*amount, &app.currency),
                    theme::amount_style(),
                )),
            ])
            .style(style)
        })
        .collect();
    rows.push(
        Row::new(vec![
            Cell::from("All"),
            Cell::from(format_amount(app.monthly.total(), &app.currency)),
        ])
        .style(theme::normal_style().add_modifier(Modifier::BOLD)),
    );

    let table = Table::new(rows, [Constraint::Min(10), Constraint::Length(16)])
        .header(header)
        .block(theme::panel(monthly_title(app)));
    f.render_widget(table, area);
}

fn monthly_title(app: &App) -> String {
    let this_month = Local::now().format("%Y-%m").to_string();
    match app.monthly.get(&this_month) {
        Some(amount) => format!(
            "Monthly  {this_month}: {}",
            format_amount(amount, &app.currency)
        ),
        None => format!("Monthly ({} records)", app.expenses.len()),
    }
}

/// Monthly totals as vertical bars, in the order months were first seen.
fn render_monthly_chart(f: &mut Frame, area: Rect, app: &App) {
    let data = &app.charts.monthly;
    let bars: Vec<Bar> = data
        .labels
        .iter()
        .zip(&data.values)
        .map(|(label, value)| {
            Bar::default()
                .value(bar_value(*value))
                .label(Line::from(label.as_str()))
                .text_value(compact_amount(*value))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::ACCENT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(theme::panel("By Month"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2);
    f.render_widget(chart, area);
}

fn bar_value(amount: Decimal) -> u64 {
    amount.round().to_u64().unwrap_or(0)
}

/// Short bar caption: `950`, `12.3k`, `4.5M`.
fn compact_amount(amount: Decimal) -> String {
    let v = amount.to_f64().unwrap_or(0.0);
    if v >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{:.1}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}

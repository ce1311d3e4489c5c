use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::models::BillAsset;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{centered_rect, format_size, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.bills.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No bills stored", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Press u or run :upload <file>... to add images or PDFs",
                theme::dim_style(),
            )),
        ];
        f.render_widget(
            Paragraph::new(msg).centered().block(theme::panel("Bills (0)")),
            area,
        );
        return;
    }

    let header_cells = ["#", "Name", "Type", "Size"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .bills
        .items()
        .iter()
        .enumerate()
        .skip(app.bill_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, bill)| {
            let style = if i == app.bill_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(truncate(&bill.name, 48)),
                Cell::from(kind_span(bill)),
                Cell::from(format_size(bill.byte_len())),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(theme::panel(format!("Bills ({})", app.bills.len())));
    f.render_widget(table, area);
}

fn kind_span(bill: &BillAsset) -> Span<'static> {
    if bill.is_pdf() {
        Span::styled("PDF", Style::default().fg(theme::RED))
    } else if bill.is_image() {
        Span::styled("Image", Style::default().fg(theme::GREEN))
    } else {
        Span::styled("File", theme::dim_style())
    }
}

/// Where the viewer popup sits. Clicks outside it close the viewer.
pub(crate) fn lightbox_area(frame: Rect) -> Rect {
    centered_rect(frame, frame.width * 7 / 10, frame.height * 6 / 10)
}

pub(crate) fn render_lightbox(f: &mut Frame, app: &App) {
    let Some(pos) = app.lightbox.position() else {
        return;
    };
    let Some(bill) = app.bills.items().get(pos) else {
        return;
    };

    let preview = if bill.is_pdf() {
        Line::from(Span::styled(
            "[ PDF document ]",
            Style::default()
                .fg(theme::RED)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            "[ Image ]",
            Style::default()
                .fg(theme::GREEN)
                .add_modifier(Modifier::BOLD),
        ))
    };

    let lines = vec![
        Line::from(""),
        preview,
        Line::from(""),
        Line::from(vec![
            Span::styled(" Type  ", theme::dim_style()),
            Span::styled(bill.mime_type().to_string(), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled(" Size  ", theme::dim_style()),
            Span::styled(format_size(bill.byte_len()), theme::normal_style()),
        ]),
        Line::from(vec![
            Span::styled(" Id    ", theme::dim_style()),
            Span::styled(bill.id.to_string(), theme::normal_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press d to save it and open it in your viewer",
            theme::dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "←/→ prev/next   d download   Esc close   click outside to close",
            theme::dim_style(),
        )),
    ];

    let area = lightbox_area(app.frame_area);
    let title = format!(
        "{} ({}/{})",
        truncate(&bill.name, area.width.saturating_sub(12) as usize),
        pos + 1,
        app.bills.len()
    );
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .centered()
            .wrap(Wrap { trim: true })
            .block(theme::popup(title)),
        area,
    );
}

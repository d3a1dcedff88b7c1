//! Daily summary table, warnings panel and the "no valid data" notice.

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use compare_core::formatting::{format_date, format_measurement, pluralize};
use compare_core::models::{DailySummary, DatasetWarning};

use crate::themes::Theme;

/// Widest the label column is allowed to grow.
const MAX_LABEL_WIDTH: usize = 24;

const HEADERS: [&str; 8] = [
    "Date", "Label", "Temp Max", "Temp Min", "Temp Avg", "Hum Max", "Hum Min", "Hum Avg",
];

/// Truncate `s` to at most `max_width` terminal columns, marking the cut
/// with an ellipsis.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Column width for the label column: the widest label, clamped to
/// `5..=MAX_LABEL_WIDTH`.
pub fn label_column_width(rows: &[DailySummary]) -> usize {
    rows.iter()
        .map(|r| r.label.width())
        .max()
        .unwrap_or(0)
        .clamp(5, MAX_LABEL_WIDTH)
}

/// Render the unified table starting at row `offset`.
pub fn render_summary_table(
    frame: &mut Frame,
    area: Rect,
    rows: &[DailySummary],
    offset: usize,
    theme: &Theme,
) {
    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h).style(theme.table_header)))
        .height(1);

    let label_width = label_column_width(rows);
    let start = offset.min(rows.len().saturating_sub(1));

    let data_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .skip(start)
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            Row::new(vec![
                Cell::from(format_date(row.date)),
                Cell::from(truncate_to_width(&row.label, label_width)),
                Cell::from(format_measurement(row.temp_max, 1)),
                Cell::from(format_measurement(row.temp_min, 1)),
                Cell::from(format_measurement(row.temp_avg, 1)),
                Cell::from(format_measurement(row.hum_max, 1)),
                Cell::from(format_measurement(row.hum_min, 1)),
                Cell::from(format_measurement(row.hum_avg, 1)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Length(label_width as u16),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
    ];

    let title = format!(
        " Daily Summary ({}, {}) ",
        pluralize(rows.len(), "row"),
        if rows.is_empty() {
            "none shown".to_string()
        } else {
            format!("from #{}", start + 1)
        }
    );

    let table = Table::new(data_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(title, theme.header)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render the list of datasets that were skipped.
pub fn render_warnings(frame: &mut Frame, area: Rect, warnings: &[DatasetWarning], theme: &Theme) {
    let mut text = vec![Line::from("")];
    if warnings.is_empty() {
        text.push(Line::from(Span::styled(
            "All datasets were loaded.",
            theme.info,
        )));
    } else {
        text.extend(warnings.iter().map(|w| {
            Line::from(vec![
                Span::styled("⚠ ", theme.warning),
                Span::styled(w.label.clone(), theme.bold),
                Span::styled(": ", theme.label),
                Span::styled(w.reason.clone(), theme.text),
            ])
        }));
    }

    let title = format!(" Skipped Datasets ({}) ", warnings.len());
    frame.render_widget(
        Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border)
                    .title(Span::styled(title, theme.header)),
            ),
        area,
    );
}

/// Render the notice shown instead of charts when no dataset produced any
/// daily summaries.
pub fn render_no_data(frame: &mut Frame, area: Rect, warnings: &[DatasetWarning], theme: &Theme) {
    let mut text = vec![
        Line::from(""),
        Line::from(Span::styled("No valid data", theme.error)),
        Line::from(""),
        Line::from(Span::styled(
            "None of the given datasets produced a daily summary.",
            theme.dim,
        )),
    ];
    if !warnings.is_empty() {
        text.push(Line::from(""));
        text.extend(
            warnings
                .iter()
                .map(|w| Line::from(Span::styled(format!("  {}", w), theme.label))),
        );
    }
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press 'q' or Ctrl+C to exit",
        theme.dim,
    )));

    frame.render_widget(
        Paragraph::new(Text::from(text))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.table_border)
                    .title(Span::styled(" Sensor Compare ", theme.header)),
            ),
        area,
    );
}

// ── Tests ──────────────────────────────────────────────────────────────────────
